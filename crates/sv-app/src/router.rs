//! View router: hash navigation with "latest navigation wins"
//!
//! Every accepted navigation bumps a generation counter. Fragment responses
//! and close transitions carry the generation captured when they started and
//! are dropped when a newer navigation has been accepted since.
//!
//! ```text
//!  closed ──navigate(v)──▶ loading ──ok──▶ rendered
//!    ▲                       │  ▲            │
//!    │                       err └─navigate──┘
//!    │                       ▼
//!    └──navigate(search)── error
//! ```

use std::time::Duration;

use sv_core::{split_hash, EntityId, NavTarget, ViewId};
use tracing::{debug, info, warn};

use crate::message::FetchFailure;
use crate::shell::{BackControl, CloseTransition, ErrorPanel, Header, Shell};

/// The committed navigation: where we are and where we came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub current: NavTarget,
    /// Last distinct non-search view; history is one level deep
    pub previous: Option<ViewId>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            current: NavTarget::search(),
            previous: None,
        }
    }
}

impl NavigationState {
    fn commit(&mut self, target: NavTarget) {
        let old = std::mem::replace(&mut self.current, target);
        if old.view == self.current.view {
            return;
        }
        self.previous = match old.view {
            ViewId::Search => None,
            view => Some(view),
        };
    }
}

/// Fragment request issued by an accepted navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub target: NavTarget,
    pub path: String,
}

/// What the caller has to do after a navigation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    /// Nothing changed
    Ignored,
    /// Fetch the fragment and report back with its generation
    Fetch(FetchRequest),
    /// Complete the close transition after its duration
    Close(CloseTransition),
}

/// Result of applying a fragment response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Superseded by a newer navigation
    Stale,
    /// Fragment injected; post-render hooks should run
    Rendered(NavTarget),
    /// Error panel shown
    Failed(ErrorPanel),
}

#[derive(Debug)]
pub struct Router {
    state: NavigationState,
    generation: u64,
    location: String,
    pending: Option<NavTarget>,
    initial: NavTarget,
    shell: Shell,
}

impl Router {
    pub fn new(transition: Duration) -> Self {
        Self::from_hash("", transition)
    }

    /// Router whose startup target is read from a URL hash
    ///
    /// Empty and invalid hashes start on `search`. Call [`Router::start`] to
    /// issue the navigation.
    pub fn from_hash(hash: &str, transition: Duration) -> Self {
        let initial = match NavTarget::from_hash(hash) {
            Ok(target) => target,
            Err(e) => {
                warn!("Ignoring startup hash {:?}: {}", hash, e);
                NavTarget::search()
            }
        };

        Self {
            state: NavigationState::default(),
            generation: 0,
            location: String::new(),
            pending: None,
            initial,
            shell: Shell::new(transition),
        }
    }

    /// Navigate to the startup target
    pub fn start(&mut self) -> NavOutcome {
        let initial = self.initial.clone();
        self.go(initial)
    }

    /// Navigate by raw view token
    ///
    /// Unknown tokens redirect to `search`. A view that needs an entity id
    /// and gets none is ignored.
    pub fn navigate(&mut self, token: &str, entity: Option<&str>) -> NavOutcome {
        let view = match token.parse::<ViewId>() {
            Ok(view) => view,
            Err(_) => {
                warn!("Unknown view '{}', redirecting to search", token);
                return self.go(NavTarget::search());
            }
        };

        match NavTarget::new(view, entity.and_then(EntityId::new)) {
            Ok(target) => self.go(target),
            Err(e) => {
                info!("Navigation to '{}' ignored: {}", view, e);
                NavOutcome::Ignored
            }
        }
    }

    /// Navigate to a URL hash (`#/<view>[/<id>]`)
    pub fn navigate_hash(&mut self, hash: &str) -> NavOutcome {
        let (token, entity) = split_hash(hash);
        self.navigate(&token, entity.as_deref())
    }

    /// Navigate to an already validated target
    pub fn go(&mut self, target: NavTarget) -> NavOutcome {
        if target.view == ViewId::Search {
            if self.intended().view == ViewId::Search {
                debug!("Already on search");
                return NavOutcome::Ignored;
            }

            self.generation += 1;
            self.location = target.to_hash();
            self.pending = Some(target);
            return NavOutcome::Close(self.shell.close(self.generation));
        }

        let Some(path) = target.fragment_path() else {
            warn!("No fragment for '{}'", target);
            return NavOutcome::Ignored;
        };

        self.generation += 1;
        self.location = target.to_hash();
        debug!(
            "Navigating to {} (generation {})",
            self.location, self.generation
        );

        self.shell.open();
        self.shell.show_loading(&target);
        self.pending = Some(target.clone());

        NavOutcome::Fetch(FetchRequest {
            generation: self.generation,
            target,
            path,
        })
    }

    /// Re-request whatever is currently shown or loading
    pub fn reload(&mut self) -> NavOutcome {
        let target = self.intended().clone();
        if target.view == ViewId::Search {
            return NavOutcome::Ignored;
        }
        self.go(target)
    }

    /// Where the header back control leads from the committed view
    pub fn back_target(&self) -> NavTarget {
        let current = &self.state.current;
        if current.view == ViewId::Search {
            return NavTarget::search();
        }

        match Header::for_view(current.view, self.state.previous).back {
            BackControl::Close => NavTarget::search(),
            BackControl::Back(view) => {
                NavTarget::new(view, current.entity.clone()).unwrap_or_else(|_| NavTarget::list())
            }
        }
    }

    /// Activate the header back control
    pub fn back(&mut self) -> NavOutcome {
        let target = self.back_target();
        self.go(target)
    }

    /// Apply a finished fragment request
    pub fn on_fragment_loaded(
        &mut self,
        generation: u64,
        target: NavTarget,
        result: Result<String, FetchFailure>,
    ) -> LoadOutcome {
        if generation != self.generation {
            debug!(
                "Dropping stale fragment for {} (generation {}, current {})",
                target, generation, self.generation
            );
            return LoadOutcome::Stale;
        }

        self.pending = None;
        self.state.commit(target.clone());
        self.shell.update_header(target.view, self.state.previous);

        match result {
            Ok(html) => {
                self.shell.show_fragment(&target, html);
                LoadOutcome::Rendered(target)
            }
            Err(failure) => {
                warn!("Failed to load {}: {}", target, failure.message);
                let panel = ErrorPanel::from_failure(&failure);
                self.shell.show_error(&target, panel.clone());
                LoadOutcome::Failed(panel)
            }
        }
    }

    /// Finish a close transition; returns `false` when it was superseded
    pub fn on_close_finished(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            debug!(
                "Dropping stale close (generation {}, current {})",
                generation, self.generation
            );
            return false;
        }

        self.pending = None;
        self.shell.finish_close();
        self.state.commit(NavTarget::search());
        true
    }

    /// Target of the in-flight navigation, or the committed one
    pub fn intended(&self) -> &NavTarget {
        self.pending.as_ref().unwrap_or(&self.state.current)
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn current(&self) -> &NavTarget {
        &self.state.current
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current URL hash
    pub fn location(&self) -> &str {
        &self.location
    }

    /// `true` while a fragment or close transition is outstanding
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut Shell {
        &mut self.shell
    }
}
