//! View identifiers and navigation targets
//!
//! Navigation state is carried in the URL hash as `#/<view>[/<entity>]`.
//! Each view except `search` is backed by a server-rendered fragment endpoint.

use std::fmt;
use std::str::FromStr;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Application name, used as the fallback header title
pub const APP_NAME: &str = "StrokeVision";

/// Characters escaped when an entity id is placed in a path segment or hash
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Header titles keyed by view token
const TITLES: &[(&str, &str)] = &[
    ("search", "Search"),
    ("list", "Patient Records"),
    ("add", "New Patient"),
    ("details", "Patient Details"),
    ("edit", "Edit Patient"),
    ("settings", "Settings"),
    ("users", "User Management"),
    ("dashboard", "Dashboard"),
    ("activity", "Activity Log"),
    ("changelog", "Change Log"),
];

/// Look up the header title for a view token, falling back to [`APP_NAME`]
pub fn title_for(token: &str) -> &'static str {
    TITLES
        .iter()
        .find(|(key, _)| *key == token)
        .map(|(_, title)| *title)
        .unwrap_or(APP_NAME)
}

/// The fixed set of views the shell can display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewId {
    Search,
    List,
    Add,
    Details,
    Edit,
    Settings,
    Users,
    Dashboard,
    Activity,
    Changelog,
}

impl ViewId {
    pub const ALL: [ViewId; 10] = [
        ViewId::Search,
        ViewId::List,
        ViewId::Add,
        ViewId::Details,
        ViewId::Edit,
        ViewId::Settings,
        ViewId::Users,
        ViewId::Dashboard,
        ViewId::Activity,
        ViewId::Changelog,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewId::Search => "search",
            ViewId::List => "list",
            ViewId::Add => "add",
            ViewId::Details => "details",
            ViewId::Edit => "edit",
            ViewId::Settings => "settings",
            ViewId::Users => "users",
            ViewId::Dashboard => "dashboard",
            ViewId::Activity => "activity",
            ViewId::Changelog => "changelog",
        }
    }

    /// Views that cannot be shown without an entity id
    pub fn requires_entity(&self) -> bool {
        matches!(self, ViewId::Details | ViewId::Edit)
    }

    /// Views that make use of an entity id when one is given
    ///
    /// `add` takes an optional id: `/patient/form/{id}` is the prefilled form.
    pub fn accepts_entity(&self) -> bool {
        matches!(self, ViewId::Details | ViewId::Edit | ViewId::Add)
    }

    /// Root-level views show a close control instead of a back control
    pub fn is_root(&self) -> bool {
        matches!(
            self,
            ViewId::List
                | ViewId::Add
                | ViewId::Dashboard
                | ViewId::Settings
                | ViewId::Users
                | ViewId::Activity
                | ViewId::Changelog
        )
    }

    pub fn title(&self) -> &'static str {
        title_for(self.as_str())
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ViewId::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| Error::unknown_view(s))
    }
}

/// Opaque record identifier (e.g. a patient id such as `P-123`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Create an id, rejecting blank input
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Percent-encoded form for use in a path segment or hash
    pub fn encoded(&self) -> String {
        utf8_percent_encode(&self.0, SEGMENT).to_string()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A view plus its optional entity id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NavTarget {
    pub view: ViewId,
    pub entity: Option<EntityId>,
}

impl NavTarget {
    /// Build a target, enforcing the entity rules of the view
    ///
    /// A missing id for a view that requires one is an error. An id given to
    /// a view that has no use for it is dropped.
    pub fn new(view: ViewId, entity: Option<EntityId>) -> Result<Self> {
        if view.requires_entity() && entity.is_none() {
            return Err(Error::missing_entity(view.as_str()));
        }

        let entity = if view.accepts_entity() {
            entity
        } else {
            if let Some(id) = &entity {
                tracing::debug!("Dropping entity '{}' for view '{}'", id, view);
            }
            None
        };

        Ok(Self { view, entity })
    }

    /// Shorthand for a target without an entity
    pub fn view(view: ViewId) -> Result<Self> {
        Self::new(view, None)
    }

    /// The home target
    pub fn search() -> Self {
        Self {
            view: ViewId::Search,
            entity: None,
        }
    }

    pub fn list() -> Self {
        Self {
            view: ViewId::List,
            entity: None,
        }
    }

    /// Encode as a URL hash: `#/<view>[/<entity>]`
    pub fn to_hash(&self) -> String {
        match &self.entity {
            Some(id) => format!("#/{}/{}", self.view, id.encoded()),
            None => format!("#/{}", self.view),
        }
    }

    /// Decode a URL hash; an empty hash is the search view
    pub fn from_hash(hash: &str) -> Result<Self> {
        let (token, entity) = split_hash(hash);
        let view = token.parse::<ViewId>()?;
        Self::new(view, entity.and_then(EntityId::new))
    }

    /// Server path of the fragment backing this target
    ///
    /// `search` is rendered by static markup and has no fragment.
    pub fn fragment_path(&self) -> Option<String> {
        let id = self.entity.as_ref().map(EntityId::encoded);
        let path = match (self.view, id) {
            (ViewId::Search, _) => return None,
            (ViewId::List, _) => "/patient/views/list".to_string(),
            (ViewId::Add, None) => "/patient/form".to_string(),
            (ViewId::Add, Some(id)) | (ViewId::Edit, Some(id)) => format!("/patient/form/{}", id),
            (ViewId::Details, Some(id)) => format!("/patient/views/details/{}", id),
            (ViewId::Details, None) | (ViewId::Edit, None) => return None,
            (ViewId::Settings, _) => "/settings/view".to_string(),
            (ViewId::Users, _) => "/admin/users/view".to_string(),
            (ViewId::Dashboard, _) => "/dashboard/view".to_string(),
            (ViewId::Activity, _) => "/logs/view/activity".to_string(),
            (ViewId::Changelog, _) => "/logs/view/changelog".to_string(),
        };
        Some(path)
    }
}

impl fmt::Display for NavTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entity {
            Some(id) => write!(f, "{}/{}", self.view, id),
            None => write!(f, "{}", self.view),
        }
    }
}

/// Split a URL hash into its view token and decoded entity id
///
/// Accepts `#/list`, `/list`, `list`, and `#/details/P-1`. An empty hash
/// yields the `search` token.
pub fn split_hash(hash: &str) -> (String, Option<String>) {
    let trimmed = hash.trim();
    let trimmed = trimmed.strip_prefix('#').unwrap_or(trimmed);
    let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);

    if trimmed.is_empty() {
        return (ViewId::Search.as_str().to_string(), None);
    }

    let mut parts = trimmed.splitn(2, '/');
    let token = parts.next().unwrap_or_default().to_string();
    let entity = parts
        .next()
        .map(|raw| percent_decode_str(raw).decode_utf8_lossy().into_owned())
        .filter(|id| !id.is_empty());

    (token, entity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(id: &str) -> NavTarget {
        NavTarget::new(ViewId::Details, EntityId::new(id)).unwrap()
    }

    #[test]
    fn test_view_tokens_roundtrip() {
        for view in ViewId::ALL {
            assert_eq!(view.as_str().parse::<ViewId>().unwrap(), view);
        }
    }

    #[test]
    fn test_unknown_token_is_error() {
        let err = "reports".parse::<ViewId>().unwrap_err();
        assert!(matches!(err, Error::UnknownView { .. }));
    }

    #[test]
    fn test_root_views() {
        let roots: Vec<_> = ViewId::ALL.iter().filter(|v| v.is_root()).collect();
        assert_eq!(roots.len(), 7);
        assert!(!ViewId::Details.is_root());
        assert!(!ViewId::Edit.is_root());
        assert!(!ViewId::Search.is_root());
    }

    #[test]
    fn test_title_lookup_falls_back_to_app_name() {
        assert_eq!(title_for("dashboard"), "Dashboard");
        assert_eq!(title_for("nope"), APP_NAME);
        assert_eq!(ViewId::Users.title(), "User Management");
    }

    #[test]
    fn test_entity_id_rejects_blank() {
        assert!(EntityId::new("").is_none());
        assert!(EntityId::new("   ").is_none());
        assert_eq!(EntityId::new("P-1").unwrap().as_str(), "P-1");
    }

    #[test]
    fn test_details_without_entity_is_rejected() {
        let err = NavTarget::new(ViewId::Details, None).unwrap_err();
        assert!(matches!(err, Error::MissingEntity { .. }));
        assert!(NavTarget::view(ViewId::Edit).is_err());
    }

    #[test]
    fn test_entity_dropped_for_views_without_one() {
        let target = NavTarget::new(ViewId::Dashboard, EntityId::new("P-1")).unwrap();
        assert_eq!(target.entity, None);
    }

    #[test]
    fn test_hash_for_details() {
        assert_eq!(details("P-123").to_hash(), "#/details/P-123");
        assert_eq!(NavTarget::list().to_hash(), "#/list");
    }

    #[test]
    fn test_hash_roundtrip_with_reserved_characters() {
        let target = details("a b/c#d");
        let hash = target.to_hash();
        assert_eq!(hash, "#/details/a%20b%2Fc%23d");
        assert_eq!(NavTarget::from_hash(&hash).unwrap(), target);
    }

    #[test]
    fn test_from_hash_defaults_to_search() {
        assert_eq!(NavTarget::from_hash("").unwrap(), NavTarget::search());
        assert_eq!(NavTarget::from_hash("#").unwrap(), NavTarget::search());
        assert_eq!(NavTarget::from_hash("#/").unwrap(), NavTarget::search());
    }

    #[test]
    fn test_split_hash_variants() {
        assert_eq!(split_hash("#/list"), ("list".to_string(), None));
        assert_eq!(split_hash("list"), ("list".to_string(), None));
        assert_eq!(split_hash("#/list/"), ("list".to_string(), None));
        assert_eq!(
            split_hash("#/edit/P-9"),
            ("edit".to_string(), Some("P-9".to_string()))
        );
    }

    #[test]
    fn test_fragment_paths() {
        assert_eq!(NavTarget::search().fragment_path(), None);
        assert_eq!(
            NavTarget::list().fragment_path().as_deref(),
            Some("/patient/views/list")
        );
        assert_eq!(
            details("P-123").fragment_path().as_deref(),
            Some("/patient/views/details/P-123")
        );
        let edit = NavTarget::new(ViewId::Edit, EntityId::new("P-5")).unwrap();
        assert_eq!(edit.fragment_path().as_deref(), Some("/patient/form/P-5"));
        assert_eq!(
            NavTarget::view(ViewId::Add).unwrap().fragment_path().as_deref(),
            Some("/patient/form")
        );
        assert_eq!(
            NavTarget::view(ViewId::Changelog)
                .unwrap()
                .fragment_path()
                .as_deref(),
            Some("/logs/view/changelog")
        );
    }
}
