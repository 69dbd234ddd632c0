//! Message types for the application (TEA pattern)

use sv_core::{Error, NavTarget};

use crate::input_key::InputKey;
use crate::writes::PendingWrite;

/// Cloneable summary of a failed request
///
/// Messages must be `Clone`, which `sv_core::Error` is not; the status code
/// is all the error panel needs beyond the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// HTTP status, or `None` for transport failures
    pub status: Option<u16>,
    pub message: String,
}

impl From<&Error> for FetchFailure {
    fn from(err: &Error) -> Self {
        Self {
            status: err.status(),
            message: err.to_string(),
        }
    }
}

impl From<Error> for FetchFailure {
    fn from(err: Error) -> Self {
        Self::from(&err)
    }
}

/// All possible messages in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from the terminal
    Key(InputKey),

    /// Periodic tick from the event loop
    Tick,

    /// Exit the application
    Quit,

    /// Navigate to the startup target
    Start,

    // ─────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────
    /// Navigate by raw view token and optional entity id
    Navigate {
        view: String,
        entity: Option<String>,
    },

    /// Navigate to a URL hash such as `#/details/P-1`
    NavigateHash(String),

    /// Activate the header back control
    Back,

    /// Re-request the current view
    Reload,

    /// A fragment request finished
    FragmentLoaded {
        generation: u64,
        target: NavTarget,
        result: Result<String, FetchFailure>,
    },

    /// The shell close transition elapsed
    CloseFinished { generation: u64 },

    // ─────────────────────────────────────────────────────────
    // Feature Modules
    // ─────────────────────────────────────────────────────────
    /// A feature controller's JSON request finished
    FeatureData {
        generation: u64,
        path: String,
        result: Result<serde_json::Value, FetchFailure>,
    },

    /// Request the next page of the patient list
    LoadMore,

    /// Act on the highlighted row: open a patient, or edit a field or email
    OpenSelected,

    /// Edit the record currently shown
    EditCurrent,

    /// Ask to delete the record currently shown
    DeleteCurrent,

    /// Answer yes to the pending confirmation
    Confirm,

    /// Answer no to the pending confirmation
    CancelConfirm,

    /// Set a field of the open form by name
    SetField { name: String, value: String },

    /// Submit the open form
    SubmitForm,

    /// Give a staff account another role
    UpdateUserRole { user_id: i64, role: String },

    /// Give a staff account another email address
    UpdateUserEmail { user_id: i64, email: String },

    /// Ask to replace a staff account's password with a generated one
    RequestPasswordReset { user_id: i64 },

    /// A write request finished
    WriteFinished {
        write: PendingWrite,
        result: Result<serde_json::Value, FetchFailure>,
    },

    // ─────────────────────────────────────────────────────────
    // Patient Search
    // ─────────────────────────────────────────────────────────
    /// Show search and start typing a query
    StartSearch,

    /// Show search with `query` as the query
    SearchFor(String),

    /// A page of search suggestions arrived
    SuggestionsLoaded {
        seq: u64,
        path: String,
        result: Result<serde_json::Value, FetchFailure>,
    },

    // ─────────────────────────────────────────────────────────
    // Text Input
    // ─────────────────────────────────────────────────────────
    InputChar(char),
    InputBackspace,
    InputCommit,
    InputCancel,

    // ─────────────────────────────────────────────────────────
    // Scrolling
    // ─────────────────────────────────────────────────────────
    ScrollUp,
    ScrollDown,
    ScrollToTop,
    PageUp,
    PageDown,
}

impl Message {
    /// Shorthand for a `Navigate` message without an entity
    pub fn navigate(view: impl Into<String>) -> Self {
        Message::Navigate {
            view: view.into(),
            entity: None,
        }
    }

    /// Shorthand for a `Navigate` message with an entity
    pub fn navigate_to(view: impl Into<String>, entity: impl Into<String>) -> Self {
        Message::Navigate {
            view: view.into(),
            entity: Some(entity.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failure_from_error() {
        let denied = FetchFailure::from(Error::http(403, "http://x/settings/view"));
        assert_eq!(denied.status, Some(403));

        let missing = FetchFailure::from(Error::not_found("http://x/nope"));
        assert_eq!(missing.status, Some(404));

        let offline = FetchFailure::from(Error::network("connection refused"));
        assert_eq!(offline.status, None);
        assert!(offline.message.contains("connection refused"));
    }

    #[test]
    fn test_navigate_shorthands() {
        assert!(matches!(
            Message::navigate("list"),
            Message::Navigate { ref view, entity: None } if view == "list"
        ));
        assert!(matches!(
            Message::navigate_to("details", "P-1"),
            Message::Navigate { entity: Some(ref id), .. } if id == "P-1"
        ));
    }
}
