//! Stdin command language of the headless runner
//!
//! One command per line:
//!
//! | Command | Effect |
//! |---|---|
//! | `#/<view>[/<id>]` | navigate by hash |
//! | `<view> [<id>]` | navigate by view token |
//! | `back`, `b` | header back control |
//! | `reload`, `r` | re-fetch the current view |
//! | `more`, `m` | next page of the patient list |
//! | `up`, `down` | move the list selection |
//! | `open` | open the selected patient |
//! | `edit` | edit the patient being viewed |
//! | `delete` | delete the patient being viewed, after `yes` |
//! | `yes`, `no` | answer a pending confirmation |
//! | `find <query>` | search patients by name or id |
//! | `set <field> <value>` | fill in a field of the open form |
//! | `submit` | send the open form |
//! | `role <user id> <role>` | change a staff role |
//! | `email <user id> <email>` | change a staff email |
//! | `reset <user id>` | reset a staff password, after `yes` |
//! | `quit`, `q` | exit |

use sv_app::message::Message;
use tracing::warn;

/// Parse one stdin line; `None` for blank lines
pub fn parse_command(line: &str) -> Option<Message> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if line.starts_with('#') {
        return Some(Message::NavigateHash(line.to_string()));
    }

    let message = match line {
        "q" | "quit" => Message::Quit,
        "b" | "back" => Message::Back,
        "r" | "reload" => Message::Reload,
        "m" | "more" => Message::LoadMore,
        "up" => Message::ScrollUp,
        "down" => Message::ScrollDown,
        "open" => Message::OpenSelected,
        "edit" => Message::EditCurrent,
        "delete" => Message::DeleteCurrent,
        "submit" => Message::SubmitForm,
        "y" | "yes" => Message::Confirm,
        "n" | "no" => Message::CancelConfirm,
        _ => return parse_with_arguments(line),
    };
    Some(message)
}

/// Commands that take arguments, and plain view tokens
fn parse_with_arguments(line: &str) -> Option<Message> {
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word {
        "find" => Some(Message::SearchFor(rest.to_string())),
        "set" => {
            let (name, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            Some(Message::SetField {
                name: name.to_string(),
                value: value.trim().to_string(),
            })
        }
        "role" | "email" | "reset" => {
            let (id, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let Ok(user_id) = id.parse::<i64>() else {
                warn!("'{}' needs a numeric user id, got {:?}", word, id);
                return None;
            };
            let value = value.trim().to_string();
            Some(match word {
                "role" => Message::UpdateUserRole {
                    user_id,
                    role: value,
                },
                "email" => Message::UpdateUserEmail {
                    user_id,
                    email: value,
                },
                _ => Message::RequestPasswordReset { user_id },
            })
        }
        view if rest.is_empty() => Some(Message::navigate(view)),
        view => {
            let entity = rest.split_whitespace().next().unwrap_or(rest);
            Some(Message::navigate_to(view, entity))
        }
    }
}
