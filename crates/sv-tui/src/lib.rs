//! sv-tui - Terminal UI for the StrokeVision shell
//!
//! This crate provides the ratatui-based terminal interface. It drives an
//! Engine from sv-app and adds terminal rendering, key polling and the
//! widgets for the shell header, the content region and the status line.

pub mod event;
pub mod fragment_text;
pub mod layout;
pub mod render;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod widgets;

#[cfg(test)]
pub mod test_utils;

// Re-export main entry point
pub use runner::run;
