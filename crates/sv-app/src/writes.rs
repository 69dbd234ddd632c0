//! Write requests: what they are for and how their replies read
//!
//! Every request that changes server state is a [`PendingWrite`]. The update
//! loop allows one at a time; its reply comes back as
//! `Message::WriteFinished` and is decoded here into a [`WriteOutcome`]
//! before the view that asked for it gets to update itself.

use std::fmt;

use serde_json::Value;
use sv_core::EntityId;
use sv_net::{Mutation, MutationReply, PasswordResetReply, PredictionReply};

use crate::message::FetchFailure;
use crate::shell::ErrorPanel;

/// Purpose of a write; decides how its reply is applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteKind {
    DeletePatient(EntityId),
    /// Risk prediction from the add or edit form; saves the record too
    Predict,
    UpdateRole { user_id: i64, role: String },
    UpdateEmail { user_id: i64, email: String },
    ResetPassword { user_id: i64 },
    UpdateProfile,
    ChangePassword,
}

impl WriteKind {
    /// Status line while the request is in flight
    pub fn progress(&self) -> String {
        match self {
            WriteKind::DeletePatient(id) => format!("Deleting {}...", id),
            WriteKind::Predict => "Calculating stroke risk...".to_string(),
            WriteKind::UpdateRole { user_id, role } => {
                format!("Changing role of user {} to {}...", user_id, role)
            }
            WriteKind::UpdateEmail { user_id, .. } => {
                format!("Updating email of user {}...", user_id)
            }
            WriteKind::ResetPassword { user_id } => {
                format!("Resetting password of user {}...", user_id)
            }
            WriteKind::UpdateProfile => "Saving profile...".to_string(),
            WriteKind::ChangePassword => "Changing password...".to_string(),
        }
    }

    fn done(&self) -> String {
        match self {
            WriteKind::DeletePatient(id) => format!("Deleted patient {}", id),
            WriteKind::Predict => "Patient data saved successfully".to_string(),
            WriteKind::UpdateRole { .. } => "User role updated.".to_string(),
            WriteKind::UpdateEmail { .. } => "User email updated.".to_string(),
            WriteKind::ResetPassword { user_id } => {
                format!("New password generated for user {}", user_id)
            }
            WriteKind::UpdateProfile => "Profile updated successfully.".to_string(),
            WriteKind::ChangePassword => "Password changed successfully.".to_string(),
        }
    }

    fn refused(&self) -> &'static str {
        match self {
            WriteKind::DeletePatient(_) => "Delete was refused",
            WriteKind::Predict => "Prediction was refused",
            _ => "The change was refused",
        }
    }
}

/// A write request together with the navigation that issued it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    /// Generation of the view that asked; replies for another view only
    /// set the status line
    pub generation: u64,
    pub kind: WriteKind,
    pub mutation: Mutation,
}

impl fmt::Display for PendingWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.mutation.fmt(f)
    }
}

/// Action waiting for a yes/no answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingConfirm {
    DeletePatient(EntityId),
    ResetPassword { user_id: i64, name: String },
}

impl PendingConfirm {
    pub fn prompt(&self) -> String {
        match self {
            PendingConfirm::DeletePatient(id) => format!("Delete patient {}?", id),
            PendingConfirm::ResetPassword { name, .. } => {
                format!("Reset the password of {}?", name)
            }
        }
    }
}

/// Decoded reply of a write
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutcome {
    pub success: bool,
    /// Line for the status bar
    pub notice: String,
    /// Reply body, `Null` when the request failed
    pub body: Value,
}

impl WriteOutcome {
    pub fn from_result(kind: &WriteKind, result: Result<Value, FetchFailure>) -> Self {
        let body = match result {
            Ok(body) => body,
            Err(failure) => {
                return Self {
                    success: false,
                    notice: failure_notice(&failure),
                    body: Value::Null,
                }
            }
        };

        let (success, message) = match kind {
            WriteKind::Predict => match serde_json::from_value::<PredictionReply>(body.clone()) {
                Ok(reply) if reply.success => (true, Some(prediction_notice(&reply))),
                Ok(reply) => (false, reply.message),
                Err(e) => return Self::malformed(e),
            },
            WriteKind::ResetPassword { user_id } => {
                match serde_json::from_value::<PasswordResetReply>(body.clone()) {
                    Ok(PasswordResetReply {
                        success: true,
                        new_password: Some(password),
                        ..
                    }) => (
                        true,
                        Some(format!("New password for user {}: {}", user_id, password)),
                    ),
                    Ok(reply) => (reply.success, reply.message),
                    Err(e) => return Self::malformed(e),
                }
            }
            WriteKind::DeletePatient(_) => {
                match serde_json::from_value::<MutationReply>(body.clone()) {
                    Ok(reply) if reply.success => (true, None),
                    Ok(reply) => (false, reply.message),
                    Err(e) => return Self::malformed(e),
                }
            }
            _ => match serde_json::from_value::<MutationReply>(body.clone()) {
                Ok(reply) => (reply.success, reply.message),
                Err(e) => return Self::malformed(e),
            },
        };

        let notice = match (success, message) {
            (_, Some(message)) if !message.is_empty() => message,
            (true, _) => kind.done(),
            (false, _) => kind.refused().to_string(),
        };

        Self {
            success,
            notice,
            body,
        }
    }

    fn malformed(err: serde_json::Error) -> Self {
        Self {
            success: false,
            notice: format!("Unexpected reply: {}", err),
            body: Value::Null,
        }
    }
}

/// Status line for a failed write
///
/// Validation errors carry the server's message; access, sign-in and
/// connection problems read like the error panel.
pub fn failure_notice(failure: &FetchFailure) -> String {
    match failure.status {
        Some(400..=402 | 404..=499) => failure.message.clone(),
        _ => ErrorPanel::from_failure(failure).to_string(),
    }
}

fn prediction_notice(reply: &PredictionReply) -> String {
    let risk = reply
        .risk
        .map(|risk| format!("{:.1}%", risk))
        .unwrap_or_else(|| "N/A".to_string());
    let level = reply.risk_level.as_deref().unwrap_or("Unknown");
    match (&reply.name, &reply.patient_id) {
        (Some(name), Some(id)) => {
            format!("Stroke risk {} ({}) for {} [{}]", risk, level, name, id)
        }
        _ => format!("Stroke risk {} ({})", risk, level),
    }
}
