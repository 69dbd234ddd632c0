//! Staff account management for administrators
//!
//! Lists accounts and issues the role, email and password reset writes for
//! the highlighted one. Role and email changes reload the list.

use sv_net::api::{ASSIGNABLE_ROLES, USERS_PATH};
use sv_net::{UserList, UserRecord};
use tracing::{debug, warn};

use super::{decode, fragment_present, FeatureController, InFlight};
use crate::hooks::{PostRenderHook, RenderContext};
use crate::message::FetchFailure;
use crate::writes::{WriteKind, WriteOutcome};

#[derive(Debug)]
pub struct UsersHook;

impl PostRenderHook for UsersHook {
    fn name(&self) -> &str {
        "user-manager"
    }

    fn on_render(&self, ctx: &RenderContext) -> Option<FeatureController> {
        fragment_present(ctx).then(|| FeatureController::Users(UserManager::new(ctx.generation)))
    }
}

#[derive(Debug, Clone)]
pub struct UserManager {
    generation: u64,
    current_user_id: Option<i64>,
    users: Vec<UserRecord>,
    selected: usize,
    in_flight: InFlight,
    error: Option<String>,
}

impl UserManager {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            current_user_id: None,
            users: Vec::new(),
            selected: 0,
            in_flight: InFlight::default(),
            error: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn start(&mut self) -> Option<String> {
        if self.in_flight.is_active() {
            return None;
        }
        Some(self.in_flight.begin(USERS_PATH.to_string()))
    }

    pub fn apply(&mut self, path: &str, result: Result<serde_json::Value, FetchFailure>) {
        if !self.in_flight.finish(path) {
            return;
        }

        match result.and_then(|value| decode::<UserList>(path, value)) {
            Ok(list) => {
                self.current_user_id = list.current_user_id;
                self.users = list.users;
                self.selected = self.selected.min(self.users.len().saturating_sub(1));
                self.error = None;
            }
            Err(failure) => {
                warn!("Loading users failed: {}", failure.message);
                self.error = Some(failure.message);
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_active()
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn user(&self, user_id: i64) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.id == user_id)
    }

    pub fn selected_user(&self) -> Option<&UserRecord> {
        self.users.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.users.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Take in the reply of a write issued from this view
    ///
    /// Returns the list request when the change shows up in the listing.
    pub fn apply_write(&mut self, kind: &WriteKind, outcome: &WriteOutcome) -> Option<String> {
        match kind {
            WriteKind::UpdateRole { .. } | WriteKind::UpdateEmail { .. } if outcome.success => {
                debug!("Reloading users after {:?}", kind);
                self.start()
            }
            _ => None,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        if let Some(error) = &self.error {
            return vec![format!("! {}", error)];
        }
        if self.is_loading() {
            return vec!["Loading users...".to_string()];
        }

        self.users
            .iter()
            .enumerate()
            .map(|(i, u)| {
                let marker = if i == self.selected { '>' } else { ' ' };
                let me = if Some(u.id) == self.current_user_id {
                    " (you)"
                } else {
                    ""
                };
                format!(
                    "{} {:<4} {:<24} {:<32} {:<8} {}{}",
                    marker,
                    u.id,
                    u.name,
                    u.email,
                    u.role,
                    u.created_at.as_deref().unwrap_or("N/A"),
                    me
                )
            })
            .collect()
    }
}

/// Role the role toggle switches `role` to
pub fn next_role(role: &str) -> &'static str {
    match ASSIGNABLE_ROLES.iter().position(|r| r.eq_ignore_ascii_case(role)) {
        Some(i) => ASSIGNABLE_ROLES[(i + 1) % ASSIGNABLE_ROLES.len()],
        None => ASSIGNABLE_ROLES[0],
    }
}

/// `true` if administrators may hand out `role`
pub fn is_assignable(role: &str) -> bool {
    ASSIGNABLE_ROLES.contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_users_render_and_mark_current() {
        let mut manager = UserManager::new(5);
        let path = manager.start().unwrap();
        assert_eq!(path, "/admin/api/users");

        manager.apply(
            &path,
            Ok(json!({
                "success": true,
                "current_user_id": 2,
                "users": [
                    { "id": 1, "name": "Nia", "email": "nia@example.org", "role": "Nurse", "created_at": "2024-02-01" },
                    { "id": 2, "name": "Sam", "email": "sam@example.org", "role": "Admin", "created_at": null }
                ]
            })),
        );

        let lines = manager.lines();
        assert_eq!(manager.users().len(), 2);
        assert!(!lines[0].contains("(you)"));
        assert!(lines[1].ends_with("N/A (you)"));
    }

    #[test]
    fn test_forbidden_shows_error() {
        let mut manager = UserManager::new(5);
        let path = manager.start().unwrap();
        manager.apply(
            &path,
            Err(FetchFailure {
                status: Some(403),
                message: "HTTP 403".to_string(),
            }),
        );
        assert_eq!(manager.lines(), vec!["! HTTP 403".to_string()]);
    }

    fn loaded() -> UserManager {
        let mut manager = UserManager::new(5);
        let path = manager.start().unwrap();
        manager.apply(
            &path,
            Ok(json!({
                "success": true,
                "current_user_id": 1,
                "users": [
                    { "id": 1, "name": "Ola", "email": "ola@example.org", "role": "Admin" },
                    { "id": 4, "name": "Nia", "email": "nia@example.org", "role": "Nurse" }
                ]
            })),
        );
        manager
    }

    #[test]
    fn test_selection_moves_marker() {
        let mut manager = loaded();
        assert!(manager.lines()[0].starts_with('>'));

        manager.select_next();
        manager.select_next();
        assert_eq!(manager.selected_user().unwrap().id, 4);
        assert!(manager.lines()[1].starts_with("> 4"));

        manager.select_prev();
        assert_eq!(manager.selected_user().unwrap().name, "Ola");
        assert_eq!(manager.user(4).unwrap().role, "Nurse");
    }

    #[test]
    fn test_role_toggle() {
        assert_eq!(next_role("Doctor"), "Nurse");
        assert_eq!(next_role("nurse"), "Doctor");
        assert_eq!(next_role("Admin"), "Doctor");
        assert!(is_assignable("Nurse"));
        assert!(!is_assignable("Admin"));
    }

    #[test]
    fn test_successful_change_reloads_list() {
        let mut manager = loaded();
        let kind = WriteKind::UpdateEmail {
            user_id: 4,
            email: "nia@clinic.org".to_string(),
        };

        let refused = WriteOutcome::from_result(
            &kind,
            Ok(json!({ "success": false, "message": "Email already in use by another account." })),
        );
        assert_eq!(manager.apply_write(&kind, &refused), None);

        let done = WriteOutcome::from_result(&kind, Ok(json!({ "success": true })));
        assert_eq!(
            manager.apply_write(&kind, &done).as_deref(),
            Some("/admin/api/users")
        );
        assert!(manager.is_loading());

        let reset = WriteKind::ResetPassword { user_id: 4 };
        let done = WriteOutcome::from_result(
            &reset,
            Ok(json!({ "success": true, "new_password": "pw" })),
        );
        assert_eq!(manager.apply_write(&reset, &done), None);
    }
}
