//! Text input, row activation and patient search

use sv_core::prelude::*;
use sv_core::ViewId;

use super::{navigation, UpdateAction, UpdateResult};
use crate::features::FeatureController;
use crate::message::{FetchFailure, Message};
use crate::search::SuggestionRequest;
use crate::state::AppState;
use crate::text_edit::{EditTarget, TextEdit};

pub(crate) fn suggestion_request(request: Option<SuggestionRequest>) -> UpdateResult {
    match request {
        Some(SuggestionRequest { seq, path }) => {
            UpdateResult::action(UpdateAction::FetchSuggestions { seq, path })
        }
        None => UpdateResult::none(),
    }
}

/// Close the shell back to search, then process `then`
///
/// `None` when search is already showing.
fn via_search(state: &mut AppState, then: Message) -> Option<UpdateResult> {
    if state.shows_search() {
        return None;
    }
    let outcome = state.router.navigate(ViewId::Search.as_str(), None);
    let mut result = navigation::apply_outcome(state, outcome);
    result.message = Some(then);
    Some(result)
}

fn open_patient(patient_id: &str) -> UpdateResult {
    UpdateResult::message(Message::navigate_to(ViewId::Details.as_str(), patient_id))
}

fn open_suggestion(state: &AppState) -> UpdateResult {
    match state.search.selected() {
        Some(suggestion) => open_patient(&suggestion.patient_id),
        None => UpdateResult::none(),
    }
}

pub(crate) fn handle_start_search(state: &mut AppState) -> UpdateResult {
    if let Some(result) = via_search(state, Message::StartSearch) {
        return result;
    }
    state.editing = Some(TextEdit::new(EditTarget::SearchQuery, state.search.query()));
    UpdateResult::none()
}

pub(crate) fn handle_search_for(state: &mut AppState, query: String) -> UpdateResult {
    if let Some(result) = via_search(state, Message::SearchFor(query.clone())) {
        return result;
    }
    suggestion_request(state.search.set_query(&query))
}

pub(crate) fn handle_suggestions_loaded(
    state: &mut AppState,
    seq: u64,
    path: String,
    result: std::result::Result<serde_json::Value, FetchFailure>,
) -> UpdateResult {
    state.search.apply(seq, &path, result);
    UpdateResult::none()
}

/// Enter on the highlighted row
pub(crate) fn handle_open_selected(state: &mut AppState) -> UpdateResult {
    if state.feature.is_none() && state.shows_search() {
        return open_suggestion(state);
    }

    let edit = match &state.feature {
        Some(FeatureController::PatientList(list)) => {
            return match list.selected_row() {
                Some(row) => open_patient(&row.patient_id),
                None => UpdateResult::none(),
            };
        }
        Some(FeatureController::Users(manager)) => manager
            .selected_user()
            .map(|user| TextEdit::new(EditTarget::UserEmail(user.id), user.email.clone())),
        Some(FeatureController::Form(form)) => form.selected_field().map(|field| {
            TextEdit::new(EditTarget::Field(form.selected()), field.value.clone())
                .secret(field.secret)
        }),
        _ => None,
    };

    if let Some(edit) = edit {
        trace!("Editing {:?}", edit.target);
        state.editing = Some(edit);
        state.notice = None;
    }
    UpdateResult::none()
}

pub(crate) fn handle_input_char(state: &mut AppState, c: char) -> UpdateResult {
    edit_buffer(state, |edit| edit.push(c))
}

pub(crate) fn handle_input_backspace(state: &mut AppState) -> UpdateResult {
    edit_buffer(state, TextEdit::pop)
}

/// Change the buffer; the search query follows every change
fn edit_buffer(state: &mut AppState, change: impl FnOnce(&mut TextEdit)) -> UpdateResult {
    let Some(edit) = state.editing.as_mut() else {
        return UpdateResult::none();
    };
    change(edit);

    if edit.target == EditTarget::SearchQuery {
        let query = edit.buffer.clone();
        return suggestion_request(state.search.set_query(&query));
    }
    UpdateResult::none()
}

pub(crate) fn handle_input_commit(state: &mut AppState) -> UpdateResult {
    let Some(edit) = state.editing.take() else {
        return UpdateResult::none();
    };

    match edit.target {
        EditTarget::SearchQuery => open_suggestion(state),
        EditTarget::Field(index) => {
            if let Some(FeatureController::Form(form)) = state.feature.as_mut() {
                form.set_value(index, edit.buffer);
            }
            UpdateResult::none()
        }
        EditTarget::UserEmail(user_id) => UpdateResult::message(Message::UpdateUserEmail {
            user_id,
            email: edit.buffer,
        }),
    }
}

pub(crate) fn handle_input_cancel(state: &mut AppState) -> UpdateResult {
    state.editing = None;
    UpdateResult::none()
}
