//! Domain events emitted by the Engine for external consumers
//!
//! Events are broadcast after each message processing cycle via
//! `Engine::subscribe()`. The headless runner turns them into NDJSON.

use sv_core::{NavTarget, ViewId};

use crate::shell::BackControl;

/// Observable navigation and feature events
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A navigation was accepted and its fragment requested
    NavigationStarted {
        generation: u64,
        hash: String,
        target: NavTarget,
    },

    /// A fragment was injected into the content region
    FragmentRendered {
        generation: u64,
        target: NavTarget,
        title: &'static str,
        back: BackControl,
        bytes: usize,
    },

    /// An error panel replaced the content
    ErrorRendered {
        generation: u64,
        target: NavTarget,
        status: Option<u16>,
        title: String,
        message: String,
    },

    /// The close transition finished; search is showing
    ShellClosed { generation: u64 },

    /// A feature controller finished loading its data
    FeatureLoaded { view: ViewId, lines: Vec<String> },

    /// Patient search suggestions arrived
    SearchResults { query: String, lines: Vec<String> },

    /// A status line was set
    Notice { message: String },
}
