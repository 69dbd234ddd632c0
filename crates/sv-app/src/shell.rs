//! Shell renderer: persistent chrome and the content region
//!
//! The shell owns one header and one content region. The router writes into
//! the content region through the shell; feature controllers receive a
//! [`ContentRegion`] handle once the structure exists.

use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use sv_core::{title_for, NavTarget, ViewId};
use tracing::debug;

use crate::message::FetchFailure;

/// Animation phase of the shell overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShellPhase {
    /// Closed; the static search markup is showing
    #[default]
    Inactive,
    /// Open with content
    Active,
    /// Close transition running
    Exiting,
}

/// What the header's leading control does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackControl {
    /// Close the shell and return to search
    Close,
    /// Go back to the given view
    Back(ViewId),
}

/// Header chrome for a rendered view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub title: &'static str,
    pub back: BackControl,
}

impl Header {
    /// Header for `view`, given the view that preceded it
    ///
    /// Root views get a close control. Other views go back to `previous` when
    /// it exists and differs from `view`, otherwise to the patient list.
    pub fn for_view(view: ViewId, previous: Option<ViewId>) -> Self {
        let back = if view.is_root() {
            BackControl::Close
        } else {
            match previous {
                Some(prev) if prev != view => BackControl::Back(prev),
                _ => BackControl::Back(ViewId::List),
            }
        };

        Self {
            title: title_for(view.as_str()),
            back,
        }
    }
}

/// Header state; loading is its own rendering, never a stale header
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HeaderState {
    #[default]
    Hidden,
    Loading,
    Ready(Header),
}

/// User-facing error panel rendered in place of a fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPanel {
    pub status: Option<u16>,
    pub title: String,
    pub message: String,
}

impl ErrorPanel {
    pub fn from_failure(failure: &FetchFailure) -> Self {
        match failure.status {
            Some(status @ 300..=399) => Self {
                status: Some(status),
                title: "Sign-in Required".to_string(),
                message: "Your session is missing or has expired. Sign in with a browser and \
                          set [server] session_cookie."
                    .to_string(),
            },
            Some(403) => Self {
                status: Some(403),
                title: "Access Denied".to_string(),
                message: "You do not have permission to view this page.".to_string(),
            },
            Some(404) => Self {
                status: Some(404),
                title: "Not Found".to_string(),
                message: "The requested record or page could not be found.".to_string(),
            },
            Some(status) => Self {
                status: Some(status),
                title: "Something went wrong".to_string(),
                message: format!("The server responded with HTTP {}. Please try again.", status),
            },
            None => Self {
                status: None,
                title: "Connection problem".to_string(),
                message: format!("Could not reach the server: {}", failure.message),
            },
        }
    }
}

impl fmt::Display for ErrorPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

/// What the content region currently shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContentBody {
    #[default]
    Empty,
    Loading(NavTarget),
    Fragment { target: NavTarget, html: String },
    Error { target: NavTarget, panel: ErrorPanel },
}

impl ContentBody {
    pub fn is_loading(&self) -> bool {
        matches!(self, ContentBody::Loading(_))
    }
}

/// Shared handle to the shell's content region
///
/// Clones refer to the same region; [`ContentRegion::ptr_eq`] tells whether
/// two handles do.
#[derive(Debug, Clone, Default)]
pub struct ContentRegion {
    body: Arc<RwLock<ContentBody>>,
}

impl ContentRegion {
    pub fn snapshot(&self) -> ContentBody {
        self.body.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn set(&self, body: ContentBody) {
        *self.body.write().unwrap_or_else(|e| e.into_inner()) = body;
    }

    /// Run `f` against the current body without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&ContentBody) -> R) -> R {
        f(&self.body.read().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn ptr_eq(&self, other: &ContentRegion) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }
}

/// Transition started by [`Shell::close`]
///
/// The event loop completes it after `duration` by sending the generation
/// back to the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseTransition {
    pub generation: u64,
    pub duration: Duration,
}

/// The persistent chrome: header plus content region
#[derive(Debug, Default)]
pub struct Shell {
    content: Option<ContentRegion>,
    header: HeaderState,
    phase: ShellPhase,
    transition: Duration,
    builds: usize,
}

impl Shell {
    pub fn new(transition: Duration) -> Self {
        Self {
            transition,
            ..Self::default()
        }
    }

    /// Build the chrome once and return the content region handle
    ///
    /// Later calls return the same handle without rebuilding anything.
    pub fn ensure_structure(&mut self) -> ContentRegion {
        if let Some(region) = &self.content {
            return region.clone();
        }

        debug!("Building shell structure");
        let region = ContentRegion::default();
        self.content = Some(region.clone());
        self.builds += 1;
        region
    }

    /// Number of times the chrome has been built
    pub fn builds(&self) -> usize {
        self.builds
    }

    pub fn has_structure(&self) -> bool {
        self.content.is_some()
    }

    pub fn header(&self) -> &HeaderState {
        &self.header
    }

    pub fn phase(&self) -> ShellPhase {
        self.phase
    }

    pub fn transition(&self) -> Duration {
        self.transition
    }

    /// Current content, or `Empty` before the structure exists
    pub fn content(&self) -> ContentBody {
        self.content
            .as_ref()
            .map(ContentRegion::snapshot)
            .unwrap_or_default()
    }

    /// Set title and back control for a rendered view
    pub fn update_header(&mut self, view: ViewId, previous: Option<ViewId>) -> Header {
        let header = Header::for_view(view, previous);
        self.header = HeaderState::Ready(header.clone());
        header
    }

    pub fn open(&mut self) {
        if self.phase != ShellPhase::Active {
            debug!("Shell opening");
        }
        self.phase = ShellPhase::Active;
    }

    /// Start the close transition
    pub fn close(&mut self, generation: u64) -> CloseTransition {
        debug!("Shell closing (generation {})", generation);
        self.phase = ShellPhase::Exiting;
        CloseTransition {
            generation,
            duration: self.transition,
        }
    }

    /// Finish the close transition: hide chrome and clear content
    pub fn finish_close(&mut self) {
        self.phase = ShellPhase::Inactive;
        self.header = HeaderState::Hidden;
        self.clear();
    }

    /// Empty the content region, if it was built
    pub fn clear(&self) {
        if let Some(region) = &self.content {
            region.set(ContentBody::Empty);
        }
    }

    pub fn show_loading(&mut self, target: &NavTarget) {
        self.header = HeaderState::Loading;
        self.ensure_structure().set(ContentBody::Loading(target.clone()));
    }

    pub fn show_fragment(&mut self, target: &NavTarget, html: String) {
        self.ensure_structure().set(ContentBody::Fragment {
            target: target.clone(),
            html,
        });
    }

    pub fn show_error(&mut self, target: &NavTarget, panel: ErrorPanel) {
        self.ensure_structure().set(ContentBody::Error {
            target: target.clone(),
            panel,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(status: Option<u16>) -> FetchFailure {
        FetchFailure {
            status,
            message: "connection refused".to_string(),
        }
    }

    #[test]
    fn test_ensure_structure_is_idempotent() {
        let mut shell = Shell::new(Duration::from_millis(300));

        let first = shell.ensure_structure();
        let second = shell.ensure_structure();

        assert!(first.ptr_eq(&second));
        assert_eq!(shell.builds(), 1);
    }

    #[test]
    fn test_root_views_get_close_control() {
        for view in [
            ViewId::List,
            ViewId::Add,
            ViewId::Dashboard,
            ViewId::Settings,
            ViewId::Users,
            ViewId::Activity,
            ViewId::Changelog,
        ] {
            for previous in [None, Some(ViewId::Details), Some(ViewId::List)] {
                assert_eq!(Header::for_view(view, previous).back, BackControl::Close);
            }
        }
    }

    #[test]
    fn test_detail_views_get_back_control() {
        for view in [ViewId::Details, ViewId::Edit] {
            assert!(matches!(
                Header::for_view(view, None).back,
                BackControl::Back(_)
            ));
        }
    }

    #[test]
    fn test_back_target_prefers_distinct_previous() {
        assert_eq!(
            Header::for_view(ViewId::Edit, Some(ViewId::Details)).back,
            BackControl::Back(ViewId::Details)
        );
        assert_eq!(
            Header::for_view(ViewId::Details, Some(ViewId::Details)).back,
            BackControl::Back(ViewId::List)
        );
        assert_eq!(
            Header::for_view(ViewId::Details, None).back,
            BackControl::Back(ViewId::List)
        );
    }

    #[test]
    fn test_header_titles() {
        assert_eq!(Header::for_view(ViewId::Dashboard, None).title, "Dashboard");
        assert_eq!(Header::for_view(ViewId::Details, None).title, "Patient Details");
    }

    #[test]
    fn test_error_panel_messages() {
        let denied = ErrorPanel::from_failure(&failure(Some(403)));
        assert!(denied.to_string().contains("Access Denied"));

        let server = ErrorPanel::from_failure(&failure(Some(500)));
        assert!(server.to_string().contains("500"));
        assert!(!server.to_string().contains("Access Denied"));

        let missing = ErrorPanel::from_failure(&failure(Some(404)));
        assert_eq!(missing.title, "Not Found");

        let offline = ErrorPanel::from_failure(&failure(None));
        assert!(offline.message.contains("connection refused"));
    }

    #[test]
    fn test_redirect_to_sign_in_panel() {
        let panel = ErrorPanel::from_failure(&failure(Some(303)));
        assert_eq!(panel.status, Some(303));
        assert_eq!(panel.title, "Sign-in Required");
        assert!(panel.message.contains("session_cookie"));
    }

    #[test]
    fn test_close_then_finish_clears_content() {
        let mut shell = Shell::new(Duration::from_millis(250));
        shell.open();
        shell.show_fragment(&NavTarget::list(), "<p>rows</p>".to_string());
        shell.update_header(ViewId::List, None);

        let transition = shell.close(7);
        assert_eq!(transition.generation, 7);
        assert_eq!(transition.duration, Duration::from_millis(250));
        assert_eq!(shell.phase(), ShellPhase::Exiting);

        shell.finish_close();
        assert_eq!(shell.phase(), ShellPhase::Inactive);
        assert_eq!(shell.header(), &HeaderState::Hidden);
        assert_eq!(shell.content(), ContentBody::Empty);
    }

    #[test]
    fn test_update_header_returns_stored_header() {
        let mut shell = Shell::new(Duration::ZERO);
        let header = shell.update_header(ViewId::Details, Some(ViewId::Dashboard));
        assert_eq!(header.back, BackControl::Back(ViewId::Dashboard));
        assert_eq!(shell.header(), &HeaderState::Ready(header));
    }

    #[test]
    fn test_loading_replaces_header() {
        let mut shell = Shell::new(Duration::ZERO);
        shell.update_header(ViewId::List, None);
        shell.show_loading(&NavTarget::view(ViewId::Dashboard).unwrap());
        assert_eq!(shell.header(), &HeaderState::Loading);
        assert!(shell.content().is_loading());
    }

    #[test]
    fn test_clear_does_not_build_structure() {
        let mut shell = Shell::new(Duration::ZERO);
        shell.clear();
        assert!(!shell.has_structure());

        shell.show_fragment(&NavTarget::list(), "<p/>".to_string());
        shell.clear();
        assert_eq!(shell.content(), ContentBody::Empty);
        assert_eq!(shell.builds(), 1);
    }
}
