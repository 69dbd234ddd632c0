//! Per-view feature controllers
//!
//! A controller is created by its view's post-render hook each time that
//! view's fragment is injected, so no state leaks between navigations. JSON
//! requests are tagged with the controller's generation and results for an
//! older generation are dropped by the update loop.

pub mod dashboard;
pub mod form;
pub mod logs;
pub mod patient_list;
pub mod users;

use sv_core::ViewId;

use crate::hooks::{HookRegistry, RenderContext};
use crate::message::FetchFailure;
use crate::shell::ContentBody;
use crate::writes::{WriteKind, WriteOutcome};

pub use dashboard::{Dashboard, DashboardHook};
pub use form::{FormController, FormField, FormHook, FormKind};
pub use logs::{LogKind, LogViewer, LogsHook};
pub use patient_list::{PatientList, PatientListHook};
pub use users::{UserManager, UsersHook};

/// Register the hooks of every built-in feature module
pub fn register_defaults(registry: &mut HookRegistry) {
    registry.register(ViewId::List, Box::new(PatientListHook));
    registry.register(ViewId::Dashboard, Box::new(DashboardHook));
    registry.register(ViewId::Activity, Box::new(LogsHook(LogKind::Activity)));
    registry.register(ViewId::Changelog, Box::new(LogsHook(LogKind::Changelog)));
    registry.register(ViewId::Users, Box::new(UsersHook));
    registry.register(ViewId::Add, Box::new(FormHook));
    registry.register(ViewId::Edit, Box::new(FormHook));
    registry.register(ViewId::Settings, Box::new(FormHook));
}

/// `true` when the content region holds the fragment the hook was called for
pub(crate) fn fragment_present(ctx: &RenderContext) -> bool {
    ctx.region.with(|body| match body {
        ContentBody::Fragment { target, .. } => *target == ctx.target,
        _ => false,
    })
}

/// One outstanding JSON request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct InFlight(Option<String>);

impl InFlight {
    pub(crate) fn begin(&mut self, path: String) -> String {
        self.0 = Some(path.clone());
        path
    }

    /// Finish the request for `path`; `false` if it was not the one in flight
    pub(crate) fn finish(&mut self, path: &str) -> bool {
        if self.0.as_deref() == Some(path) {
            self.0 = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.0.is_some()
    }
}

/// Live state of the view currently shown
#[derive(Debug, Clone)]
pub enum FeatureController {
    PatientList(PatientList),
    Dashboard(Dashboard),
    Logs(LogViewer),
    Users(UserManager),
    Form(FormController),
}

impl FeatureController {
    pub fn view(&self) -> ViewId {
        match self {
            FeatureController::PatientList(_) => ViewId::List,
            FeatureController::Dashboard(_) => ViewId::Dashboard,
            FeatureController::Logs(logs) => logs.kind().view(),
            FeatureController::Users(_) => ViewId::Users,
            FeatureController::Form(c) => c.view(),
        }
    }

    /// Generation of the navigation that created this controller
    pub fn generation(&self) -> u64 {
        match self {
            FeatureController::PatientList(c) => c.generation(),
            FeatureController::Dashboard(c) => c.generation(),
            FeatureController::Logs(c) => c.generation(),
            FeatureController::Users(c) => c.generation(),
            FeatureController::Form(c) => c.generation(),
        }
    }

    /// Initial data request, issued right after the hook ran
    pub fn start(&mut self) -> Option<String> {
        match self {
            FeatureController::PatientList(c) => c.start(),
            FeatureController::Dashboard(c) => c.start(),
            FeatureController::Logs(c) => c.start(),
            FeatureController::Users(c) => c.start(),
            FeatureController::Form(c) => c.start(),
        }
    }

    /// Next page, for views that page
    pub fn load_more(&mut self) -> Option<String> {
        match self {
            FeatureController::PatientList(c) => c.load_more(),
            _ => None,
        }
    }

    pub fn apply(&mut self, path: &str, result: Result<serde_json::Value, FetchFailure>) {
        match self {
            FeatureController::PatientList(c) => c.apply(path, result),
            FeatureController::Dashboard(c) => c.apply(path, result),
            FeatureController::Logs(c) => c.apply(path, result),
            FeatureController::Users(c) => c.apply(path, result),
            FeatureController::Form(c) => c.apply(path, result),
        }
    }

    /// Take in the reply of a write this view issued
    ///
    /// Returns a data request when the view has to reload.
    pub fn apply_write(&mut self, kind: &WriteKind, outcome: &WriteOutcome) -> Option<String> {
        match self {
            FeatureController::Users(c) => c.apply_write(kind, outcome),
            FeatureController::Form(c) => {
                c.apply_write(kind, outcome);
                None
            }
            _ => None,
        }
    }

    /// Move the highlight up, for views that have one
    pub fn select_prev(&mut self) -> bool {
        match self {
            FeatureController::PatientList(c) => c.select_prev(),
            FeatureController::Users(c) => c.select_prev(),
            FeatureController::Form(c) => c.select_prev(),
            _ => return false,
        }
        true
    }

    pub fn is_loading(&self) -> bool {
        match self {
            FeatureController::PatientList(c) => c.is_loading(),
            FeatureController::Dashboard(c) => c.is_loading(),
            FeatureController::Logs(c) => c.is_loading(),
            FeatureController::Users(c) => c.is_loading(),
            FeatureController::Form(_) => false,
        }
    }

    /// Plain-text rendering of the controller's data
    pub fn lines(&self) -> Vec<String> {
        match self {
            FeatureController::PatientList(c) => c.lines(),
            FeatureController::Dashboard(c) => c.lines(),
            FeatureController::Logs(c) => c.lines(),
            FeatureController::Users(c) => c.lines(),
            FeatureController::Form(c) => c.lines(),
        }
    }
}

/// Decode a JSON payload, turning a shape mismatch into a failure
pub(crate) fn decode<T: serde::de::DeserializeOwned>(
    path: &str,
    value: serde_json::Value,
) -> Result<T, FetchFailure> {
    serde_json::from_value(value).map_err(|e| FetchFailure {
        status: None,
        message: format!("Unexpected response from {}: {}", path, e),
    })
}
