//! Main update function - handles state transitions (TEA pattern)

use sv_core::ViewId;

use crate::features::FeatureController;
use crate::message::Message;
use crate::state::{AppPhase, AppState};

use super::{input, keys::handle_key, navigation, writes, UpdateResult};

/// Lines moved by PageUp/PageDown
const PAGE_LINES: usize = 10;

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Quit => {
            state.phase = AppPhase::Quitting;
            UpdateResult::none()
        }

        Message::Key(key) => match handle_key(state, key) {
            Some(msg) => UpdateResult::message(msg),
            None => UpdateResult::none(),
        },

        Message::Tick => UpdateResult::none(),

        // ─────────────────────────────────────────────────────────
        // Navigation
        // ─────────────────────────────────────────────────────────
        Message::Start => {
            let outcome = state.router.start();
            navigation::apply_outcome(state, outcome)
        }

        Message::Navigate { view, entity } => {
            let outcome = state.router.navigate(&view, entity.as_deref());
            navigation::apply_outcome(state, outcome)
        }

        Message::NavigateHash(hash) => {
            let outcome = state.router.navigate_hash(&hash);
            navigation::apply_outcome(state, outcome)
        }

        Message::Back => {
            let outcome = state.router.back();
            navigation::apply_outcome(state, outcome)
        }

        Message::Reload => {
            let outcome = state.router.reload();
            navigation::apply_outcome(state, outcome)
        }

        Message::FragmentLoaded {
            generation,
            target,
            result,
        } => navigation::handle_fragment_loaded(state, generation, target, result),

        Message::CloseFinished { generation } => {
            navigation::handle_close_finished(state, generation)
        }

        // ─────────────────────────────────────────────────────────
        // Feature Modules
        // ─────────────────────────────────────────────────────────
        Message::FeatureData {
            generation,
            path,
            result,
        } => navigation::handle_feature_data(state, generation, path, result),

        Message::LoadMore => {
            if state.feature.is_none() && state.shows_search() {
                return input::suggestion_request(state.search.load_more());
            }
            let path = state.feature.as_mut().and_then(FeatureController::load_more);
            navigation::feature_request(state, path)
        }

        Message::OpenSelected => input::handle_open_selected(state),

        Message::EditCurrent => {
            let current = state.current();
            match (&current.view, &current.entity) {
                (ViewId::Details, Some(id)) => UpdateResult::message(Message::navigate_to(
                    ViewId::Edit.as_str(),
                    id.as_str(),
                )),
                _ => UpdateResult::none(),
            }
        }

        // ─────────────────────────────────────────────────────────
        // Writes
        // ─────────────────────────────────────────────────────────
        Message::DeleteCurrent => writes::handle_delete_current(state),

        Message::Confirm => writes::handle_confirm(state),

        Message::CancelConfirm => {
            state.confirm = None;
            UpdateResult::none()
        }

        Message::SetField { name, value } => writes::handle_set_field(state, &name, &value),

        Message::SubmitForm => writes::handle_submit_form(state),

        Message::UpdateUserRole { user_id, role } => {
            writes::handle_update_role(state, user_id, role)
        }

        Message::UpdateUserEmail { user_id, email } => {
            writes::handle_update_email(state, user_id, email)
        }

        Message::RequestPasswordReset { user_id } => {
            writes::handle_password_reset(state, user_id)
        }

        Message::WriteFinished { write, result } => {
            writes::handle_write_finished(state, write, result)
        }

        // ─────────────────────────────────────────────────────────
        // Patient Search and Text Input
        // ─────────────────────────────────────────────────────────
        Message::StartSearch => input::handle_start_search(state),

        Message::SearchFor(query) => input::handle_search_for(state, query),

        Message::SuggestionsLoaded { seq, path, result } => {
            input::handle_suggestions_loaded(state, seq, path, result)
        }

        Message::InputChar(c) => input::handle_input_char(state, c),

        Message::InputBackspace => input::handle_input_backspace(state),

        Message::InputCommit => input::handle_input_commit(state),

        Message::InputCancel => input::handle_input_cancel(state),

        // ─────────────────────────────────────────────────────────
        // Scroll Messages
        // ─────────────────────────────────────────────────────────
        Message::ScrollUp => {
            let moved = state
                .feature
                .as_mut()
                .is_some_and(FeatureController::select_prev);
            if !moved {
                if state.has_suggestions() {
                    state.search.select_prev();
                } else {
                    state.scroll = state.scroll.saturating_sub(1);
                }
            }
            UpdateResult::none()
        }

        Message::ScrollDown => {
            let on_search = state.has_suggestions();
            match state.feature.as_mut() {
                Some(FeatureController::PatientList(list)) => {
                    let path = list.select_next();
                    navigation::feature_request(state, path)
                }
                Some(FeatureController::Users(manager)) => {
                    manager.select_next();
                    UpdateResult::none()
                }
                Some(FeatureController::Form(form)) => {
                    form.select_next();
                    UpdateResult::none()
                }
                None if on_search => input::suggestion_request(state.search.select_next()),
                _ => {
                    state.scroll = state.scroll.saturating_add(1);
                    UpdateResult::none()
                }
            }
        }

        Message::PageUp => {
            state.scroll = state.scroll.saturating_sub(PAGE_LINES);
            UpdateResult::none()
        }

        Message::PageDown => {
            state.scroll = state.scroll.saturating_add(PAGE_LINES);
            UpdateResult::none()
        }

        Message::ScrollToTop => {
            state.scroll = 0;
            UpdateResult::none()
        }
    }
}
