//! Activity and change log viewers

use sv_core::ViewId;
use sv_net::api::{ACTIVITY_LOG_PATH, CHANGE_LOG_PATH};
use sv_net::LogRecord;
use tracing::warn;

use super::{decode, fragment_present, FeatureController, InFlight};
use crate::hooks::{PostRenderHook, RenderContext};
use crate::message::FetchFailure;

/// Which log a viewer shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    /// Security events (logins, access failures)
    Activity,
    /// Patient data changes
    Changelog,
}

impl LogKind {
    pub fn view(&self) -> ViewId {
        match self {
            LogKind::Activity => ViewId::Activity,
            LogKind::Changelog => ViewId::Changelog,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            LogKind::Activity => ACTIVITY_LOG_PATH,
            LogKind::Changelog => CHANGE_LOG_PATH,
        }
    }
}

#[derive(Debug)]
pub struct LogsHook(pub LogKind);

impl PostRenderHook for LogsHook {
    fn name(&self) -> &str {
        match self.0 {
            LogKind::Activity => "activity-log",
            LogKind::Changelog => "change-log",
        }
    }

    fn on_render(&self, ctx: &RenderContext) -> Option<FeatureController> {
        fragment_present(ctx)
            .then(|| FeatureController::Logs(LogViewer::new(self.0, ctx.generation)))
    }
}

/// Label for the server's 0-4 priority scale; out-of-range levels read as info
pub fn level_label(level: i64) -> &'static str {
    match level {
        0 => "DEBUG",
        2 => "WARN",
        3 => "ERROR",
        4 => "CRIT",
        _ => "INFO",
    }
}

#[derive(Debug, Clone)]
pub struct LogViewer {
    kind: LogKind,
    generation: u64,
    records: Vec<LogRecord>,
    in_flight: InFlight,
    error: Option<String>,
}

impl LogViewer {
    pub fn new(kind: LogKind, generation: u64) -> Self {
        Self {
            kind,
            generation,
            records: Vec::new(),
            in_flight: InFlight::default(),
            error: None,
        }
    }

    pub fn kind(&self) -> LogKind {
        self.kind
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn start(&mut self) -> Option<String> {
        if self.in_flight.is_active() {
            return None;
        }
        Some(self.in_flight.begin(self.kind.path().to_string()))
    }

    pub fn apply(&mut self, path: &str, result: Result<serde_json::Value, FetchFailure>) {
        if !self.in_flight.finish(path) {
            return;
        }

        match result.and_then(|value| decode::<Vec<LogRecord>>(path, value)) {
            Ok(records) => {
                self.records = records;
                self.error = None;
            }
            Err(failure) => {
                warn!("Loading {} failed: {}", path, failure.message);
                self.error = Some(failure.message);
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_active()
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn lines(&self) -> Vec<String> {
        if let Some(error) = &self.error {
            return vec![format!("! {}", error)];
        }
        if self.is_loading() {
            return vec!["Loading log...".to_string()];
        }
        if self.records.is_empty() {
            return vec!["No entries".to_string()];
        }

        self.records
            .iter()
            .map(|r| {
                let who = match (&r.user_name, &r.user_role) {
                    (Some(name), Some(role)) => format!("{} ({})", name, role),
                    (Some(name), None) => name.clone(),
                    _ => "anonymous".to_string(),
                };
                format!(
                    "{:<19} {:<5} {:<24} {:<15} {}",
                    r.timestamp.get(..19).unwrap_or(&r.timestamp),
                    level_label(r.log_level),
                    who,
                    r.client_ip.as_deref().unwrap_or("-"),
                    r.info
                )
            })
            .collect()
    }
}
