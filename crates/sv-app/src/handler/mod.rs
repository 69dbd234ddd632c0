//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `keys`: Key event handlers
//! - `navigation`: Router outcomes and fragment results
//! - `writes`: Confirmations, write requests and their replies
//! - `input`: Text input and patient search

pub(crate) mod input;
pub(crate) mod keys;
pub(crate) mod navigation;
pub(crate) mod update;
pub(crate) mod writes;


use std::time::Duration;

use sv_core::NavTarget;

use crate::message::Message;
use crate::writes::PendingWrite;

// Re-export main entry point
pub use update::update;

#[cfg(test)]
pub(crate) use keys::handle_key;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// Fetch a view fragment; reply with `Message::FragmentLoaded`
    FetchFragment {
        generation: u64,
        target: NavTarget,
        path: String,
    },

    /// Wait out the close transition; reply with `Message::CloseFinished`
    CompleteClose { generation: u64, after: Duration },

    /// Fetch JSON for a feature controller; reply with `Message::FeatureData`
    FetchFeatureData { generation: u64, path: String },

    /// Fetch a page of search suggestions; reply with
    /// `Message::SuggestionsLoaded`
    FetchSuggestions { seq: u64, path: String },

    /// Send a write request; reply with `Message::WriteFinished`
    Submit(PendingWrite),
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}
