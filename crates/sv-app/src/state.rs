//! Application state (Model in TEA pattern)

use sv_core::{NavTarget, ViewId};

use crate::config::Settings;
use crate::features::{self, FeatureController};
use crate::hooks::HookRegistry;
use crate::router::Router;
use crate::search::PatientSearch;
use crate::shell::ShellPhase;
use crate::text_edit::{EditTarget, TextEdit};
use crate::writes::{PendingConfirm, PendingWrite};

/// Lifecycle of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    Running,
    Quitting,
}

/// Complete application state
#[derive(Debug)]
pub struct AppState {
    pub phase: AppPhase,

    pub settings: Settings,

    /// Navigation state machine; owns the shell
    pub router: Router,

    /// Post-render hooks, keyed by view
    pub hooks: HookRegistry,

    /// Controller of the view currently shown, if it has one
    pub feature: Option<FeatureController>,

    /// Vertical scroll offset of the content region
    pub scroll: usize,

    /// Patient search; kept across navigations
    pub search: PatientSearch,

    /// Text input in progress
    pub editing: Option<TextEdit>,

    /// Action awaiting a yes/no answer
    pub confirm: Option<PendingConfirm>,

    /// Write request in flight; one at a time
    pub writing: Option<PendingWrite>,

    /// One-line status shown under the content
    pub notice: Option<String>,
}

impl AppState {
    /// State with the default feature hooks registered
    pub fn new(settings: Settings, initial_hash: Option<&str>) -> Self {
        let hash = initial_hash
            .or(settings.ui.initial_hash.as_deref())
            .unwrap_or_default()
            .to_string();
        let router = Router::from_hash(&hash, settings.ui.transition());

        let mut hooks = HookRegistry::new();
        features::register_defaults(&mut hooks);

        Self::with_parts(settings, router, hooks)
    }

    /// State with an explicit router and hook set
    pub fn with_parts(settings: Settings, router: Router, hooks: HookRegistry) -> Self {
        Self {
            phase: AppPhase::Running,
            settings,
            router,
            hooks,
            feature: None,
            scroll: 0,
            search: PatientSearch::new(),
            editing: None,
            confirm: None,
            writing: None,
            notice: None,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }

    pub fn current(&self) -> &NavTarget {
        self.router.current()
    }

    /// `true` when the search home is, or is about to be, showing
    pub fn shows_search(&self) -> bool {
        self.router.intended().view == ViewId::Search
    }

    /// `true` when search is showing with suggestions to move through
    pub fn has_suggestions(&self) -> bool {
        self.feature.is_none() && self.shows_search() && !self.search.suggestions().is_empty()
    }

    /// Drop per-view state; called whenever a navigation is accepted
    pub fn reset_view(&mut self) {
        self.feature = None;
        self.scroll = 0;
        self.confirm = None;
        if self
            .editing
            .as_ref()
            .is_some_and(|edit| edit.target != EditTarget::SearchQuery)
        {
            self.editing = None;
        }
    }

    /// `true` when no request or transition is outstanding
    pub fn is_idle(&self) -> bool {
        !self.router.is_pending()
            && self.writing.is_none()
            && !self.search.is_loading()
            && self.router.shell().phase() != ShellPhase::Exiting
            && !self.feature.as_ref().is_some_and(FeatureController::is_loading)
    }
}
