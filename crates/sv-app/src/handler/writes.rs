//! Confirmations, write requests and their replies

use sv_core::prelude::*;
use sv_core::ViewId;
use sv_net::api::{
    delete_patient_path, reset_password_path, UPDATE_EMAIL_PATH, UPDATE_ROLE_PATH,
};
use sv_net::{EmailUpdate, Mutation, RoleUpdate};

use super::{navigation, UpdateAction, UpdateResult};
use crate::features::{users, FeatureController};
use crate::message::{FetchFailure, Message};
use crate::state::AppState;
use crate::writes::{PendingConfirm, PendingWrite, WriteKind, WriteOutcome};

/// Start a write unless another one is still in flight
pub(crate) fn begin(state: &mut AppState, kind: WriteKind, mutation: Mutation) -> UpdateResult {
    if let Some(active) = &state.writing {
        state.notice = Some(format!("Still waiting for {}", active));
        return UpdateResult::none();
    }

    let generation = match &state.feature {
        Some(feature) => feature.generation(),
        None => state.router.generation(),
    };
    let write = PendingWrite {
        generation,
        kind,
        mutation,
    };

    debug!("Submitting {}", write);
    state.notice = Some(write.kind.progress());
    state.writing = Some(write.clone());
    UpdateResult::action(UpdateAction::Submit(write))
}

pub(crate) fn handle_delete_current(state: &mut AppState) -> UpdateResult {
    let current = state.current();
    let entity = match (&current.view, &current.entity) {
        (ViewId::Details, Some(id)) => Some(id.clone()),
        _ => None,
    };
    if let Some(entity) = entity {
        state.confirm = Some(PendingConfirm::DeletePatient(entity));
        state.notice = None;
    }
    UpdateResult::none()
}

pub(crate) fn handle_confirm(state: &mut AppState) -> UpdateResult {
    match state.confirm.take() {
        Some(PendingConfirm::DeletePatient(entity)) => {
            let mutation = Mutation::delete(delete_patient_path(&entity));
            begin(state, WriteKind::DeletePatient(entity), mutation)
        }
        Some(PendingConfirm::ResetPassword { user_id, .. }) => begin(
            state,
            WriteKind::ResetPassword { user_id },
            Mutation::post(reset_password_path(user_id)),
        ),
        None => UpdateResult::none(),
    }
}

pub(crate) fn handle_submit_form(state: &mut AppState) -> UpdateResult {
    let submission = match &state.feature {
        Some(FeatureController::Form(form)) => form.submission(),
        _ => Err("No form is open".to_string()),
    };
    match submission {
        Ok((kind, mutation)) => begin(state, kind, mutation),
        Err(message) => {
            state.notice = Some(message);
            UpdateResult::none()
        }
    }
}

pub(crate) fn handle_set_field(state: &mut AppState, name: &str, value: &str) -> UpdateResult {
    state.notice = match state.feature.as_mut() {
        Some(FeatureController::Form(form)) => {
            if form.set(name, value) {
                None
            } else {
                Some(format!("Unknown field '{}'", name))
            }
        }
        _ => Some("No form is open".to_string()),
    };
    UpdateResult::none()
}

/// Look up a user of the open user manager, or explain why not
fn user_name(state: &AppState, user_id: i64) -> std::result::Result<String, String> {
    match &state.feature {
        Some(FeatureController::Users(manager)) => manager
            .user(user_id)
            .map(|user| user.name.clone())
            .ok_or_else(|| format!("User {} not found.", user_id)),
        _ => Err("Open the user manager first".to_string()),
    }
}

pub(crate) fn handle_update_role(
    state: &mut AppState,
    user_id: i64,
    role: String,
) -> UpdateResult {
    let checked = user_name(state, user_id).and_then(|_| {
        if users::is_assignable(&role) {
            Ok(())
        } else {
            Err("Invalid role specified.".to_string())
        }
    });
    let mutation = checked.and_then(|_| {
        let body = RoleUpdate {
            user_id,
            role: role.clone(),
        };
        Mutation::patch_json(UPDATE_ROLE_PATH, &body).map_err(|e| e.to_string())
    });

    match mutation {
        Ok(mutation) => begin(state, WriteKind::UpdateRole { user_id, role }, mutation),
        Err(message) => {
            state.notice = Some(message);
            UpdateResult::none()
        }
    }
}

pub(crate) fn handle_update_email(
    state: &mut AppState,
    user_id: i64,
    email: String,
) -> UpdateResult {
    let email = email.trim().to_string();
    let checked = user_name(state, user_id).and_then(|_| {
        if email.contains('@') {
            Ok(())
        } else {
            Err("Invalid email.".to_string())
        }
    });
    let mutation = checked.and_then(|_| {
        let body = EmailUpdate {
            user_id,
            email: email.clone(),
        };
        Mutation::patch_json(UPDATE_EMAIL_PATH, &body).map_err(|e| e.to_string())
    });

    match mutation {
        Ok(mutation) => begin(state, WriteKind::UpdateEmail { user_id, email }, mutation),
        Err(message) => {
            state.notice = Some(message);
            UpdateResult::none()
        }
    }
}

pub(crate) fn handle_password_reset(state: &mut AppState, user_id: i64) -> UpdateResult {
    match user_name(state, user_id) {
        Ok(name) => {
            state.confirm = Some(PendingConfirm::ResetPassword { user_id, name });
            state.notice = None;
        }
        Err(message) => state.notice = Some(message),
    }
    UpdateResult::none()
}

pub(crate) fn handle_write_finished(
    state: &mut AppState,
    write: PendingWrite,
    result: std::result::Result<serde_json::Value, FetchFailure>,
) -> UpdateResult {
    if state.writing.as_ref() == Some(&write) {
        state.writing = None;
    }

    let outcome = WriteOutcome::from_result(&write.kind, result);
    if outcome.success {
        info!("{} succeeded", write);
    } else {
        warn!("{} failed: {}", write, outcome.notice);
    }
    state.notice = Some(outcome.notice.clone());

    if let WriteKind::DeletePatient(entity) = &write.kind {
        if outcome.success && state.current().entity.as_ref() == Some(entity) {
            return UpdateResult::message(Message::navigate(ViewId::List.as_str()));
        }
        return UpdateResult::none();
    }

    let path = match state.feature.as_mut() {
        Some(feature) if feature.generation() == write.generation => {
            feature.apply_write(&write.kind, &outcome)
        }
        _ => {
            debug!("View of {} is gone; reply only sets the status", write);
            None
        }
    };
    navigation::feature_request(state, path)
}
