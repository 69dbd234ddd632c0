//! JSON payloads served by the StrokeVision data endpoints
//!
//! These are consumed by the per-view feature controllers; the router itself
//! only deals in HTML fragments.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sv_core::EntityId;

pub const DASHBOARD_STATS_PATH: &str = "/dashboard/api/stats";
pub const ACTIVITY_LOG_PATH: &str = "/logs/api/activity";
pub const CHANGE_LOG_PATH: &str = "/logs/api/changelog";
pub const USERS_PATH: &str = "/admin/api/users";
pub const UPDATE_ROLE_PATH: &str = "/admin/api/users/update-role";
pub const UPDATE_EMAIL_PATH: &str = "/admin/api/users/update-email";
pub const PREDICT_PATH: &str = "/patient/predict";
pub const PROFILE_PATH: &str = "/settings/api/profile";
pub const CHANGE_PASSWORD_PATH: &str = "/settings/api/change_password";

/// Page size of the patient search dropdown
pub const SUGGESTION_LIMIT: u32 = 30;

/// Roles an administrator can assign
pub const ASSIGNABLE_ROLES: [&str; 2] = ["Doctor", "Nurse"];

/// Path of one page of the patient list
pub fn patient_page_path(page: u32) -> String {
    format!("/patient/api/data?page={}", page)
}

/// Path that deletes one patient record
pub fn delete_patient_path(patient_id: &EntityId) -> String {
    format!("/patient/api/delete/{}", patient_id.encoded())
}

/// Path of one page of patient search suggestions for `query`
pub fn suggestions_path(query: &str, page: u32) -> String {
    let q: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!(
        "/api/patients/suggestions?q={}&page={}&limit={}",
        q, page, SUGGESTION_LIMIT
    )
}

/// Path that replaces a staff member's password with a generated one
pub fn reset_password_path(user_id: i64) -> String {
    format!("/admin/api/users/reset-password/{}", user_id)
}

/// Reply of the mutating endpoints
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MutationReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// One page of `/api/patients/suggestions`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SuggestionPage {
    #[serde(default)]
    pub items: Vec<Suggestion>,
    pub page: u32,
    pub limit: u32,
    #[serde(default)]
    pub has_more: bool,
}

/// Patient match in the search dropdown
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Suggestion {
    pub patient_id: String,
    pub name: String,
}

/// Reply of `/patient/predict`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PredictionReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Stroke risk in percent
    #[serde(default)]
    pub risk: Option<f64>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Reply of the password reset endpoint
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PasswordResetReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
}

/// Body of the role update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleUpdate {
    pub user_id: i64,
    pub role: String,
}

/// Body of the email update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailUpdate {
    pub user_id: i64,
    pub email: String,
}

/// Body of the signed-in user's profile update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
}

/// Body of the signed-in user's password change
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// One page of `/patient/api/data`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PatientPage {
    #[serde(default)]
    pub patients: Vec<PatientRow>,
    pub page: u32,
    pub limit: u32,
    pub has_next: bool,
    #[serde(default)]
    pub total_count: u64,
}

/// Summary row in the patient list
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PatientRow {
    pub id: String,
    pub patient_id: String,
    pub name: String,
    pub age: f64,
    pub gender: String,
    pub risk_level: String,
    pub added_on: String,
    pub stroke_risk: f64,
}

/// Response of `/dashboard/api/stats`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub success: bool,
    pub kpis: Kpis,
    #[serde(default)]
    pub charts: Charts,
    #[serde(default)]
    pub table: Vec<RiskRow>,
}

/// Headline figures on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct Kpis {
    pub total: u64,
    pub high_risk: u64,
    pub avg_glucose: f64,
    pub smokers: u64,
}

/// Chart series (rendering them is out of scope; the data is kept)
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Charts {
    #[serde(default)]
    pub scatter: Vec<ScatterPoint>,
    #[serde(default)]
    pub work_distribution: BTreeMap<String, u64>,
}

/// BMI vs glucose point, radius scaled from risk
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub risk: f64,
}

/// Row of the top-risk table
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RiskRow {
    pub name: String,
    pub age: f64,
    pub gender: String,
    pub conditions: String,
    pub avg_glucose_level: f64,
    pub stroke_risk: f64,
}

/// Entry of the activity or change log
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LogRecord {
    pub timestamp: String,
    pub info: String,
    #[serde(default)]
    pub client_ip: Option<String>,
    #[serde(default)]
    pub client_os: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_role: Option<String>,
    #[serde(default)]
    pub log_level: i64,
}

/// Response of `/admin/api/users`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UserList {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub current_user_id: Option<i64>,
    #[serde(default)]
    pub users: Vec<UserRecord>,
}

/// Staff account as listed in the user manager
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_page_path() {
        assert_eq!(patient_page_path(3), "/patient/api/data?page=3");
    }

    #[test]
    fn test_delete_patient_path_encodes_id() {
        let id = EntityId::new("P 1").unwrap();
        assert_eq!(delete_patient_path(&id), "/patient/api/delete/P%201");
    }

    #[test]
    fn test_suggestions_path_encodes_query() {
        assert_eq!(
            suggestions_path("ada l", 2),
            "/api/patients/suggestions?q=ada+l&page=2&limit=30"
        );
        assert_eq!(reset_password_path(7), "/admin/api/users/reset-password/7");
    }

    #[test]
    fn test_parse_prediction_reply() {
        let reply: PredictionReply = serde_json::from_value(serde_json::json!({
            "success": true,
            "patient_id": "204518733",
            "name": "Ada L.",
            "risk": 23.4,
            "risk_level": "Moderate",
            "message": "Patient data saved."
        }))
        .unwrap();
        assert_eq!(reply.risk, Some(23.4));
        assert_eq!(reply.patient_id.as_deref(), Some("204518733"));
    }

    #[test]
    fn test_parse_mutation_reply() {
        let reply: MutationReply = serde_json::from_value(serde_json::json!({
            "success": false,
            "message": "Patient not found"
        }))
        .unwrap();
        assert!(!reply.success);
        assert_eq!(reply.message.as_deref(), Some("Patient not found"));
    }

    #[test]
    fn test_parse_patient_page() {
        let json = serde_json::json!({
            "patients": [{
                "id": "65f0",
                "patient_id": "P-1",
                "name": "Ada",
                "age": 67,
                "gender": "Female",
                "risk_level": "High",
                "added_on": "2024-03-01",
                "stroke_risk": 31.5
            }],
            "page": 1,
            "limit": 20,
            "has_next": true,
            "total_count": 41
        });
        let page: PatientPage = serde_json::from_value(json).unwrap();
        assert_eq!(page.patients.len(), 1);
        assert_eq!(page.patients[0].patient_id, "P-1");
        assert!(page.has_next);
        assert_eq!(page.total_count, 41);
    }

    #[test]
    fn test_parse_dashboard_stats() {
        let json = serde_json::json!({
            "success": true,
            "kpis": { "total": 10, "high_risk": 2, "avg_glucose": 104.2, "smokers": 3 },
            "charts": {
                "scatter": [{ "x": 27.1, "y": 98.0, "r": 1.2, "risk": 9.6 }],
                "work_distribution": { "Private": 6, "Self-employed": 4 }
            },
            "table": []
        });
        let stats: DashboardStats = serde_json::from_value(json).unwrap();
        assert_eq!(stats.kpis.high_risk, 2);
        assert_eq!(stats.charts.work_distribution["Private"], 6);
    }

    #[test]
    fn test_parse_log_record_with_missing_user() {
        let json = serde_json::json!({
            "timestamp": "2024-03-01T10:00:00",
            "info": "Login failed",
            "client_ip": "10.0.0.1",
            "client_os": "Linux",
            "user_name": null,
            "user_role": null,
            "log_level": 2
        });
        let record: LogRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.user_name, None);
        assert_eq!(record.log_level, 2);
    }
}
