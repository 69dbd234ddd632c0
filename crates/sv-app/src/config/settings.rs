//! Settings loader for .svshell/config.toml

use super::types::Settings;
use std::path::{Path, PathBuf};
use sv_core::prelude::*;

const CONFIG_FILENAME: &str = "config.toml";
const SVSHELL_DIR: &str = ".svshell";
const GLOBAL_DIR: &str = "strokevision-shell";

/// Load settings for a working directory
///
/// Looks for `<dir>/.svshell/config.toml`, then the user config directory
/// (`~/.config/strokevision-shell/config.toml`). Missing or invalid files
/// yield defaults.
pub fn load_settings(dir: &Path) -> Settings {
    let local = dir.join(SVSHELL_DIR).join(CONFIG_FILENAME);
    if local.exists() {
        return load_settings_file(&local);
    }

    match global_config_path() {
        Some(global) if global.exists() => load_settings_file(&global),
        _ => {
            debug!("No config file at {:?}, using defaults", local);
            Settings::default()
        }
    }
}

/// Load settings from an explicit file path
pub fn load_settings_file(config_path: &Path) -> Settings {
    match std::fs::read_to_string(config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Write settings to `<dir>/.svshell/config.toml`
pub fn save_settings(dir: &Path, settings: &Settings) -> Result<()> {
    let svshell_dir = dir.join(SVSHELL_DIR);
    std::fs::create_dir_all(&svshell_dir)
        .map_err(|e| Error::config(format!("Failed to create .svshell dir: {}", e)))?;

    let content = toml::to_string_pretty(settings)
        .map_err(|e| Error::config(format!("Failed to serialize settings: {}", e)))?;

    let config_path = svshell_dir.join(CONFIG_FILENAME);
    std::fs::write(&config_path, content)
        .with_context(|| format!("Failed to write {:?}", config_path))?;
    Ok(())
}

/// Create a commented default config in `<dir>/.svshell/` if none exists
pub fn init_config_dir(dir: &Path) -> Result<()> {
    let svshell_dir = dir.join(SVSHELL_DIR);

    if !svshell_dir.exists() {
        std::fs::create_dir_all(&svshell_dir)
            .map_err(|e| Error::config(format!("Failed to create .svshell dir: {}", e)))?;
    }

    let config_path = svshell_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        let default_content = r##"# StrokeVision shell configuration

[server]
# Origin of the StrokeVision web application
base_url = "http://127.0.0.1:5000"
# Per-request timeout
request_timeout_ms = 15000
# Session cookie copied from a signed-in browser, e.g. "session=..."
# session_cookie = "session=..."

[ui]
# Shell close animation length
transition_ms = 300
# View to open at startup, e.g. "#/list"
# initial_hash = "#/dashboard"
"##;
        std::fs::write(&config_path, default_content)
            .with_context(|| format!("Failed to write {:?}", config_path))?;
        info!("Created default config at {:?}", config_path);
    }

    Ok(())
}

fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(GLOBAL_DIR).join(CONFIG_FILENAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_settings_custom() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join(".svshell");
        std::fs::create_dir_all(&dir).unwrap();

        let config = r##"
[server]
base_url = "https://sv.example.org"
request_timeout_ms = 2000

[ui]
transition_ms = 150
initial_hash = "#/dashboard"
"##;
        std::fs::write(dir.join("config.toml"), config).unwrap();

        let settings = load_settings(temp.path());

        assert_eq!(settings.server.base_url, "https://sv.example.org");
        assert_eq!(settings.server.request_timeout_ms, 2000);
        assert_eq!(settings.ui.transition_ms, 150);
        assert_eq!(settings.ui.initial_hash.as_deref(), Some("#/dashboard"));
    }

    #[test]
    fn test_load_settings_invalid_toml() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.toml");

        std::fs::write(&path, "not valid toml {{{{").unwrap();

        // Should return defaults
        let settings = load_settings_file(&path);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_settings_missing_file() {
        let temp = tempdir().unwrap();
        let settings = load_settings_file(&temp.path().join("absent.toml"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let temp = tempdir().unwrap();
        let mut settings = Settings::default();
        settings.server.base_url = "http://10.0.0.5:8080".to_string();
        settings.ui.transition_ms = 0;

        save_settings(temp.path(), &settings).unwrap();

        assert_eq!(load_settings(temp.path()), settings);
    }

    #[test]
    fn test_save_reports_unwritable_config() {
        let temp = tempdir().unwrap();
        // A directory where the file should go makes the write fail
        std::fs::create_dir_all(temp.path().join(".svshell/config.toml")).unwrap();

        let err = save_settings(temp.path(), &Settings::default()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_init_config_dir() {
        let temp = tempdir().unwrap();

        init_config_dir(temp.path()).unwrap();

        assert!(temp.path().join(".svshell/config.toml").exists());

        // Content should be valid TOML
        let content = std::fs::read_to_string(temp.path().join(".svshell/config.toml")).unwrap();
        let settings: Settings = toml::from_str(&content).expect("Default config should be valid TOML");
        assert_eq!(settings, Settings::default());
    }
}
