//! sv-app - Application state and orchestration for the StrokeVision shell
//!
//! This crate implements the TEA (The Elm Architecture) pattern for state
//! management: the view router and shell, the post-render hook registry with
//! its feature controllers, configuration loading, and the Engine that runs
//! network work in background tasks.

pub mod actions;
pub mod config;
pub mod engine;
pub mod engine_event;
pub mod features;
pub mod handler;
pub mod hooks;
pub mod input_key;
pub mod message;
pub mod process;
pub mod router;
pub mod search;
pub mod shell;
pub mod signals;
pub mod state;
pub mod text_edit;
pub mod writes;

// Re-export primary types
pub use engine::Engine;
pub use engine_event::EngineEvent;
pub use handler::{UpdateAction, UpdateResult};
pub use hooks::{HookRegistry, PostRenderHook, RenderContext};
pub use input_key::InputKey;
pub use message::{FetchFailure, Message};
pub use router::{NavOutcome, NavigationState, Router};
pub use shell::{
    BackControl, ContentBody, ContentRegion, ErrorPanel, Header, HeaderState, Shell, ShellPhase,
};
pub use search::{PatientSearch, QueryKind};
pub use state::{AppPhase, AppState};
pub use text_edit::{EditTarget, TextEdit};
pub use writes::{PendingConfirm, PendingWrite, WriteKind, WriteOutcome};
