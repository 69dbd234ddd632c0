//! Key event handlers

use crate::features::{users, FeatureController};
use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::AppState;

/// Convert key events to messages
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    if state.confirm.is_some() {
        return handle_key_confirm(key);
    }
    if state.editing.is_some() {
        return handle_key_editing(key);
    }
    handle_key_feature(state, &key).or_else(|| handle_key_normal(key))
}

/// Handle key events while an action is awaiting confirmation
fn handle_key_confirm(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('y' | 'Y') => Some(Message::Confirm),
        InputKey::Char('n' | 'N') | InputKey::Esc => Some(Message::CancelConfirm),
        InputKey::CharCtrl('c') => Some(Message::Quit),
        _ => None,
    }
}

/// Handle key events while text is being typed
fn handle_key_editing(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char(c) => Some(Message::InputChar(c)),
        InputKey::Backspace => Some(Message::InputBackspace),
        InputKey::Enter => Some(Message::InputCommit),
        InputKey::Esc => Some(Message::InputCancel),
        InputKey::Up => Some(Message::ScrollUp),
        InputKey::Down => Some(Message::ScrollDown),
        InputKey::CharCtrl('c') => Some(Message::Quit),
        _ => None,
    }
}

/// Keys that only mean something in one view
fn handle_key_feature(state: &AppState, key: &InputKey) -> Option<Message> {
    match (state.feature.as_ref()?, key) {
        (FeatureController::Users(manager), InputKey::Char('o')) => {
            manager.selected_user().map(|user| Message::UpdateUserRole {
                user_id: user.id,
                role: users::next_role(&user.role).to_string(),
            })
        }
        (FeatureController::Users(manager), InputKey::Char('w')) => manager
            .selected_user()
            .map(|user| Message::RequestPasswordReset { user_id: user.id }),
        (FeatureController::Form(_), InputKey::Char('p')) => Some(Message::SubmitForm),
        _ => None,
    }
}

fn handle_key_normal(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('q') | InputKey::CharCtrl('c') => Some(Message::Quit),

        // Header back/close control
        InputKey::Esc | InputKey::Backspace | InputKey::Char('b') => Some(Message::Back),

        // Views
        InputKey::Char('/') => Some(Message::StartSearch),
        InputKey::Char('s') => Some(Message::navigate("search")),
        InputKey::Char('l') => Some(Message::navigate("list")),
        InputKey::Char('a') => Some(Message::navigate("add")),
        InputKey::Char('d') => Some(Message::navigate("dashboard")),
        InputKey::Char('g') => Some(Message::navigate("settings")),
        InputKey::Char('u') => Some(Message::navigate("users")),
        InputKey::Char('v') => Some(Message::navigate("activity")),
        InputKey::Char('c') => Some(Message::navigate("changelog")),

        // Record actions
        InputKey::Enter => Some(Message::OpenSelected),
        InputKey::Char('e') => Some(Message::EditCurrent),
        InputKey::Char('x') => Some(Message::DeleteCurrent),
        InputKey::Char('r') => Some(Message::Reload),
        InputKey::Char('m') | InputKey::End => Some(Message::LoadMore),

        // Scrolling
        InputKey::Char('k') | InputKey::Up => Some(Message::ScrollUp),
        InputKey::Char('j') | InputKey::Down => Some(Message::ScrollDown),
        InputKey::PageUp => Some(Message::PageUp),
        InputKey::PageDown => Some(Message::PageDown),
        InputKey::Home => Some(Message::ScrollToTop),

        _ => None,
    }
}
