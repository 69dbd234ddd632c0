//! Widget components for the shell

mod content;
mod header;
mod status_bar;

pub use content::{content_lines, ContentView};
pub use header::ShellHeader;
pub use status_bar::StatusBar;
