//! Configuration types for the StrokeVision shell
//!
//! Defines:
//! - `Settings` - Application settings (`.svshell/config.toml`)
//! - `ServerSettings` - Where and how to reach the web application
//! - `UiSettings` - Shell presentation options

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Application settings (.svshell/config.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

/// Server connection settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerSettings {
    /// Origin of the web application, e.g. `https://strokevision.example.org`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Initial anti-forgery token; refreshed from fragments at runtime
    #[serde(default)]
    pub csrf_token: Option<String>,

    /// Session cookie of a signed-in user, as `name=value`
    #[serde(default)]
    pub session_cookie: Option<String>,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            csrf_token: None,
            session_cookie: None,
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl ServerSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_request_timeout_ms() -> u64 {
    15_000
}

/// Shell presentation settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UiSettings {
    /// Length of the shell close animation in milliseconds
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,

    /// Hash to open at startup when none is given on the command line
    #[serde(default)]
    pub initial_hash: Option<String>,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            transition_ms: default_transition_ms(),
            initial_hash: None,
        }
    }
}

impl UiSettings {
    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}

fn default_transition_ms() -> u64 {
    300
}
