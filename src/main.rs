//! StrokeVision shell - terminal client for the StrokeVision clinical web app
//!
//! This is the binary entry point. All logic lives in the libraries.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use sv_app::config::{self, Settings};
use sv_net::FetchClient;

/// StrokeVision shell - browse the StrokeVision web app from a terminal
#[derive(Parser, Debug)]
#[command(name = "svshell")]
#[command(about = "Terminal client for the StrokeVision clinical web app", long_about = None)]
struct Args {
    /// Origin of the web application (overrides the config file)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// View to open at startup, e.g. '#/list' or '#/details/P-123'
    #[arg(long, value_name = "HASH")]
    hash: Option<String>,

    /// Run in headless mode (NDJSON output, commands on stdin)
    #[arg(long)]
    headless: bool,

    /// Explicit config file instead of .svshell/config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write a default .svshell/config.toml and exit
    #[arg(long)]
    init: bool,
}

fn load_settings(args: &Args, cwd: &std::path::Path) -> Settings {
    let mut settings = match &args.config {
        Some(path) => config::load_settings_file(path),
        None => config::load_settings(cwd),
    };
    if let Some(base_url) = &args.base_url {
        settings.server.base_url = base_url.clone();
    }
    settings
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    if args.init {
        config::init_config_dir(&cwd).wrap_err("Failed to create .svshell/config.toml")?;
        eprintln!("Config written to {}", cwd.join(".svshell/config.toml").display());
        return Ok(());
    }

    // stdout carries NDJSON in headless mode, the TUI owns the terminal otherwise
    if args.headless {
        sv_core::logging::init_stderr();
    } else {
        sv_core::logging::init().wrap_err("Failed to initialize logging")?;
    }

    let settings = load_settings(&args, &cwd);
    let source = FetchClient::new(&settings.server.base_url, settings.server.request_timeout())
        .wrap_err_with(|| format!("Invalid server URL {:?}", settings.server.base_url))?
        .with_csrf_token(settings.server.csrf_token.clone())
        .with_session_cookie(settings.server.session_cookie.as_deref());

    let hash = args.hash.as_deref();
    if args.headless {
        strokevision_shell::run_headless(settings, hash, source).await?;
    } else {
        strokevision_shell::run(settings, hash, source).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_flags() {
        let args = Args::try_parse_from([
            "svshell",
            "--base-url",
            "https://sv.example.org",
            "--hash",
            "#/details/P-1",
            "--headless",
        ])
        .unwrap();

        assert_eq!(args.base_url.as_deref(), Some("https://sv.example.org"));
        assert_eq!(args.hash.as_deref(), Some("#/details/P-1"));
        assert!(args.headless);
        assert!(!args.init);
    }

    #[test]
    fn test_base_url_flag_overrides_config() {
        let temp = tempfile::tempdir().unwrap();
        let args = Args::try_parse_from(["svshell", "--base-url", "http://10.1.1.1:5000"]).unwrap();

        let settings = load_settings(&args, temp.path());
        assert_eq!(settings.server.base_url, "http://10.1.1.1:5000");
    }
}
