//! Headless mode - NDJSON event output for scripted runs
//!
//! Instead of drawing a terminal UI, the headless runner reads navigation
//! commands from stdin and writes one JSON object per engine event to stdout.
//! Every event has an "event" field naming its type.
//!
//! # Example Output
//!
//! ```json
//! {"event":"navigation_started","generation":1,"hash":"#/list","view":"list","entity":null,"timestamp":1704700001000}
//! {"event":"fragment_rendered","generation":1,"hash":"#/list","title":"Patient Records","back":"close","bytes":2048,"timestamp":1704700001200}
//! {"event":"settled","hash":"#/list","view":"list","idle":true,"timestamp":1704700001400}
//! ```

pub mod commands;
pub mod runner;

use chrono::Utc;
use serde::Serialize;
use std::io::{self, Write};
use sv_app::{BackControl, EngineEvent};
use sv_core::ViewId;
use tracing::error;

/// Events emitted in headless mode
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// A navigation was accepted
    NavigationStarted {
        generation: u64,
        hash: String,
        view: ViewId,
        entity: Option<String>,
        timestamp: i64,
    },

    /// A fragment was rendered; `back` is "close" or the view Back returns to
    FragmentRendered {
        generation: u64,
        hash: String,
        title: String,
        back: String,
        bytes: usize,
        timestamp: i64,
    },

    /// An error panel was rendered in place of the fragment
    ErrorRendered {
        generation: u64,
        hash: String,
        status: Option<u16>,
        title: String,
        message: String,
        timestamp: i64,
    },

    /// The shell closed; the search page is showing
    ShellClosed { generation: u64, timestamp: i64 },

    /// A view's data finished loading
    FeatureLoaded {
        view: ViewId,
        lines: Vec<String>,
        timestamp: i64,
    },

    /// Patient search suggestions for a query
    SearchResults {
        query: String,
        lines: Vec<String>,
        timestamp: i64,
    },

    /// Status line text
    Notice { message: String, timestamp: i64 },

    /// A command finished processing
    Settled {
        hash: String,
        view: ViewId,
        idle: bool,
        timestamp: i64,
    },

    /// Error outside the normal rendering path
    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Emit this event to stdout as one JSON line
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }
        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    /// Current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    pub fn settled(hash: &str, view: ViewId, idle: bool) -> Self {
        Self::Settled {
            hash: hash.to_string(),
            view,
            idle,
            timestamp: Self::now(),
        }
    }

    pub fn error(message: impl Into<String>, fatal: bool) -> Self {
        Self::Error {
            message: message.into(),
            fatal,
            timestamp: Self::now(),
        }
    }
}

fn back_label(back: BackControl) -> String {
    match back {
        BackControl::Close => "close".to_string(),
        BackControl::Back(view) => view.as_str().to_string(),
    }
}

impl From<EngineEvent> for HeadlessEvent {
    fn from(event: EngineEvent) -> Self {
        let timestamp = Self::now();
        match event {
            EngineEvent::NavigationStarted {
                generation,
                hash,
                target,
            } => Self::NavigationStarted {
                generation,
                hash,
                view: target.view,
                entity: target.entity.map(|id| id.as_str().to_string()),
                timestamp,
            },
            EngineEvent::FragmentRendered {
                generation,
                target,
                title,
                back,
                bytes,
            } => Self::FragmentRendered {
                generation,
                hash: target.to_hash(),
                title: title.to_string(),
                back: back_label(back),
                bytes,
                timestamp,
            },
            EngineEvent::ErrorRendered {
                generation,
                target,
                status,
                title,
                message,
            } => Self::ErrorRendered {
                generation,
                hash: target.to_hash(),
                status,
                title,
                message,
                timestamp,
            },
            EngineEvent::ShellClosed { generation } => Self::ShellClosed {
                generation,
                timestamp,
            },
            EngineEvent::FeatureLoaded { view, lines } => Self::FeatureLoaded {
                view,
                lines,
                timestamp,
            },
            EngineEvent::SearchResults { query, lines } => Self::SearchResults {
                query,
                lines,
                timestamp,
            },
            EngineEvent::Notice { message } => Self::Notice { message, timestamp },
        }
    }
}
