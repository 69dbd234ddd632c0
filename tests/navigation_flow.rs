//! End-to-end navigation through the headless runner
//!
//! Run with: cargo test --test navigation_flow

use std::time::Duration;

use serde_json::json;
use strokevision_shell::headless::commands::parse_command;
use strokevision_shell::headless::runner::run_commands;
use strokevision_shell::headless::HeadlessEvent;
use sv_app::config::Settings;
use sv_app::{AppState, Engine};
use sv_core::ViewId;
use sv_net::test_utils::StaticSource;
use tokio::sync::mpsc;

const TIMEOUT: Duration = Duration::from_secs(5);

fn patient(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": format!("oid-{}", id), "patient_id": id, "name": name, "age": 64,
        "gender": "Female", "risk_level": "Medium", "added_on": "2024-05-02",
        "stroke_risk": 12.5
    })
}

fn clinic() -> StaticSource {
    StaticSource::new()
        .with_body("/patient/views/list", "<h3>Patients</h3><table id=\"rows\"></table>")
        .with_json(
            "/patient/api/data?page=1",
            json!({
                "patients": [patient("P-1", "Ada L."), patient("P-2", "Grace H.")],
                "page": 1, "limit": 2, "has_next": true, "total_count": 3
            }),
        )
        .with_json(
            "/patient/api/data?page=2",
            json!({
                "patients": [patient("P-3", "Mary S.")],
                "page": 2, "limit": 2, "has_next": false, "total_count": 3
            }),
        )
        .with_body("/patient/views/details/P-2", "<dl><dt>Name</dt><dd>Grace H.</dd></dl>")
        .with_json(
            "/patient/api/delete/P-2",
            json!({ "success": true, "message": "Patient record deleted." }),
        )
}

async fn drive(
    hash: &str,
    source: StaticSource,
    commands: &[&str],
) -> (Vec<HeadlessEvent>, StaticSource) {
    let mut settings = Settings::default();
    settings.ui.transition_ms = 10;

    let mut engine = Engine::new(AppState::new(settings, Some(hash)), source.clone());
    let (tx, rx) = mpsc::channel(commands.len().max(1));
    for command in commands {
        let message = parse_command(command)
            .expect("non-blank command");
        tx.send(message).await.unwrap();
    }
    drop(tx);

    let mut events = Vec::new();
    run_commands(&mut engine, rx, TIMEOUT, |event| events.push(event))
        .await
        .unwrap();
    (events, source)
}

fn settled_views(events: &[HeadlessEvent]) -> Vec<ViewId> {
    events
        .iter()
        .filter_map(|event| match event {
            HeadlessEvent::Settled { view, idle: true, .. } => Some(*view),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_browse_open_and_go_back() {
    let (events, source) = drive("#/list", clinic(), &["more", "down", "open", "back"]).await;

    assert_eq!(
        settled_views(&events),
        vec![
            ViewId::List,
            ViewId::List,
            ViewId::List,
            ViewId::Details,
            ViewId::List
        ]
    );
    assert_eq!(
        source.requests(),
        vec![
            "/patient/views/list",
            "/patient/api/data?page=1",
            "/patient/api/data?page=2",
            "/patient/views/details/P-2",
            "/patient/views/list",
            "/patient/api/data?page=1",
        ]
    );

    let details_back = events.iter().find_map(|event| match event {
        HeadlessEvent::FragmentRendered { title, back, .. } if title == "Patient Details" => {
            Some(back.clone())
        }
        _ => None,
    });
    assert_eq!(details_back.as_deref(), Some("list"));
}

#[tokio::test]
async fn test_delete_returns_to_list() {
    let (events, source) = drive("#/details/P-2", clinic(), &["delete", "yes"]).await;

    assert!(events.iter().any(|event| matches!(
        event,
        HeadlessEvent::Notice { message, .. } if message == "Deleted patient P-2"
    )));
    assert_eq!(settled_views(&events).last(), Some(&ViewId::List));
    assert!(source
        .requests()
        .contains(&"DELETE /patient/api/delete/P-2".to_string()));
}

#[tokio::test]
async fn test_declined_delete_sends_nothing() {
    let (events, source) = drive("#/details/P-2", clinic(), &["delete", "no"]).await;

    assert_eq!(settled_views(&events).last(), Some(&ViewId::Details));
    assert!(source.submissions().is_empty());
}

#[tokio::test]
async fn test_find_then_open_suggestion() {
    let source = clinic().with_json(
        "/api/patients/suggestions?q=grace&page=1&limit=30",
        json!({
            "items": [{ "patient_id": "P-2", "name": "Grace H." }],
            "page": 1, "limit": 30, "has_more": false
        }),
    );
    let (events, source) = drive("#/list", source, &["find grace", "open"]).await;

    assert!(events.iter().any(|event| matches!(
        event,
        HeadlessEvent::SearchResults { query, lines, .. }
            if query == "grace" && lines[0].contains("Grace H.")
    )));
    assert_eq!(settled_views(&events).last(), Some(&ViewId::Details));
    assert_eq!(
        source.requests().last().map(String::as_str),
        Some("/patient/views/details/P-2")
    );
}

const ADD_FORM: &str = r#"<form id="patient">
  <input name="name" value="">
  <input name="age" type="number" value="67">
  <input type="radio" name="gender" value="Male">
  <input type="radio" name="gender" value="Female" checked>
  <input name="hypertension" value="1"><input name="heart_disease" value="0">
  <input name="ever_married" value="Yes"><input name="work_type" value="Private">
  <input name="residence_type" value="Urban">
  <input name="avg_glucose_level" value="105.2"><input name="bmi" value="27.1">
  <select name="smoking_status">
    <option value="smokes">smokes</option>
    <option value="never smoked" selected>never smoked</option>
  </select>
</form>"#;

#[tokio::test]
async fn test_add_form_prediction() {
    let source = StaticSource::new()
        .with_body("/patient/form", ADD_FORM)
        .with_json(
            "/patient/predict",
            json!({
                "success": true, "patient_id": "250101009", "name": "Ada L.",
                "risk": 18.04, "risk_level": "Moderate",
                "message": "Patient data saved successfully"
            }),
        );
    let (events, source) = drive("#/add", source, &["submit", "set name Ada L.", "submit"]).await;

    assert!(events.iter().any(|event| matches!(
        event,
        HeadlessEvent::Notice { message, .. } if message == "Name Is Required."
    )));
    assert!(events.iter().any(|event| matches!(
        event,
        HeadlessEvent::Notice { message, .. }
            if message == "Stroke risk 18.0% (Moderate) for Ada L. [250101009]"
    )));

    let submissions = source.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].to_string(), "POST /patient/predict");
    assert_eq!(submissions[0].form_value("gender"), Some("Female"));
    assert_eq!(submissions[0].form_value("smoking_status"), Some("never smoked"));
}

fn staff() -> StaticSource {
    StaticSource::new()
        .with_body("/admin/users/view", "<table id=\"users\"></table>")
        .with_json(
            "/admin/api/users",
            json!({
                "success": true,
                "current_user_id": 1,
                "users": [
                    { "id": 1, "name": "Ola", "email": "ola@example.org", "role": "Admin" },
                    { "id": 4, "name": "Nia", "email": "nia@example.org", "role": "Nurse" }
                ]
            }),
        )
        .with_json(
            "/admin/api/users/update-role",
            json!({ "success": true, "message": "User role updated." }),
        )
        .with_json(
            "/admin/api/users/reset-password/4",
            json!({ "success": true, "new_password": "Qm7-x2" }),
        )
}

#[tokio::test]
async fn test_staff_role_change_and_password_reset() {
    let (events, source) =
        drive("#/users", staff(), &["role 4 Doctor", "reset 4", "yes"]).await;

    assert_eq!(
        source.requests(),
        vec![
            "/admin/users/view",
            "/admin/api/users",
            "PATCH /admin/api/users/update-role",
            "/admin/api/users",
            "POST /admin/api/users/reset-password/4",
        ]
    );
    assert!(events.iter().any(|event| matches!(
        event,
        HeadlessEvent::Notice { message, .. } if message == "New password for user 4: Qm7-x2"
    )));
}

#[tokio::test]
async fn test_rejected_email_change_reports_server_message() {
    let source = staff().with_rejection(
        "/admin/api/users/update-email",
        400,
        "Email already in use by another account.",
    );
    let (events, _) = drive("#/users", source, &["email 4 ola@example.org"]).await;

    assert!(events.iter().any(|event| matches!(
        event,
        HeadlessEvent::Notice { message, .. }
            if message.starts_with("Email already in use by another account.")
    )));
}

#[tokio::test]
async fn test_missing_record_shows_not_found_and_stays_navigable() {
    let (events, _) = drive("#/details/P-404", clinic(), &["list"]).await;

    assert!(events.iter().any(|event| matches!(
        event,
        HeadlessEvent::ErrorRendered { status: Some(404), title, .. } if title == "Not Found"
    )));
    assert_eq!(settled_views(&events), vec![ViewId::Details, ViewId::List]);
}

#[tokio::test]
async fn test_search_closes_without_request() {
    let (events, source) = drive("#/list", clinic(), &["#/search"]).await;

    assert!(events
        .iter()
        .any(|event| matches!(event, HeadlessEvent::ShellClosed { .. })));
    assert_eq!(settled_views(&events).last(), Some(&ViewId::Search));
    assert_eq!(
        source.requests(),
        vec!["/patient/views/list", "/patient/api/data?page=1"]
    );
}
