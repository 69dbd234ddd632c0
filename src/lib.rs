//! StrokeVision shell library
//!
//! The binary's headless mode lives here so integration tests can drive it;
//! the navigation core is in `sv-app` and the terminal UI in `sv-tui`.

pub mod headless;

// Re-export main entry points
pub use headless::runner::run_headless;
pub use sv_tui::run;
