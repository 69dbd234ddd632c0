//! Configuration file parsing for the StrokeVision shell
//!
//! Supports `.svshell/config.toml` in the working directory, falling back to
//! the user config directory.

pub mod settings;
pub mod types;

pub use settings::{init_config_dir, load_settings, load_settings_file, save_settings};
pub use types::*;
