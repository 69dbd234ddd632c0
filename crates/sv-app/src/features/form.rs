//! Editable forms: the patient add/edit form and the settings page
//!
//! Field values start from the inputs in the rendered fragment. Submitting a
//! patient form asks the server for a stroke risk prediction, which also
//! saves the record; the settings form updates the profile or, when any
//! password field is filled in, changes the password.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use sv_core::ViewId;
use sv_net::api::{CHANGE_PASSWORD_PATH, PREDICT_PATH, PROFILE_PATH};
use sv_net::{Mutation, PasswordChange, ProfileUpdate};
use tracing::debug;

use super::FeatureController;
use crate::hooks::{PostRenderHook, RenderContext};
use crate::message::FetchFailure;
use crate::shell::ContentBody;
use crate::writes::{WriteKind, WriteOutcome};

static INPUT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<input\b([^>]*)>").expect("valid input regex"));

static SELECT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<select\b([^>]*)>(.*?)</select>").expect("valid select regex")
});

static OPTION_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<option\b([^>]*)>").expect("valid option regex"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:-]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
        .expect("valid attribute regex")
});

/// `(name, label)` of the patient form, in submit order
const PATIENT_FIELDS: &[(&str, &str)] = &[
    ("name", "Name"),
    ("age", "Age"),
    ("gender", "Gender"),
    ("hypertension", "Hypertension"),
    ("heart_disease", "Heart Disease"),
    ("ever_married", "Ever Married"),
    ("work_type", "Work Type"),
    ("residence_type", "Residence Type"),
    ("avg_glucose_level", "Avg. Glucose Level"),
    ("bmi", "BMI"),
    ("smoking_status", "Smoking Status"),
];

const PROFILE_FIELDS: &[(&str, &str)] = &[("name", "Name"), ("email", "Email")];

const PASSWORD_FIELDS: &[(&str, &str)] = &[
    ("current_password", "Current Password"),
    ("new_password", "New Password"),
    ("confirm_password", "Confirm Password"),
];

/// Which form a view holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    /// Add or edit a patient
    Patient,
    /// The signed-in user's settings
    Profile,
}

impl FormKind {
    pub fn for_view(view: ViewId) -> Self {
        match view {
            ViewId::Settings => FormKind::Profile,
            _ => FormKind::Patient,
        }
    }
}

/// Registered for the add, edit and settings views
#[derive(Debug)]
pub struct FormHook;

impl PostRenderHook for FormHook {
    fn name(&self) -> &str {
        "form"
    }

    fn on_render(&self, ctx: &RenderContext) -> Option<FeatureController> {
        let values = ctx.region.with(|body| match body {
            ContentBody::Fragment { target, html } if *target == ctx.target => {
                Some(form_values(html))
            }
            _ => None,
        })?;

        let mut form = FormController::new(ctx.generation, ctx.target.view, &values);
        if let Some(id) = &ctx.target.entity {
            form.patient_id = Some(id.as_str().to_string());
        }
        Some(FeatureController::Form(form))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
    pub secret: bool,
}

#[derive(Debug, Clone)]
pub struct FormController {
    generation: u64,
    view: ViewId,
    kind: FormKind,
    fields: Vec<FormField>,
    selected: usize,
    /// Record the patient form saves into; `None` creates a new one
    patient_id: Option<String>,
    /// Result of the last submit
    outcome: Option<String>,
}

impl FormController {
    /// Form shown by `view`, prefilled from `values`
    pub fn new(generation: u64, view: ViewId, values: &HashMap<String, String>) -> Self {
        let kind = FormKind::for_view(view);
        let field = |&(name, label): &(&'static str, &'static str), secret| FormField {
            name,
            label,
            value: values.get(name).cloned().unwrap_or_default(),
            secret,
        };

        let fields = match kind {
            FormKind::Patient => PATIENT_FIELDS.iter().map(|f| field(f, false)).collect(),
            FormKind::Profile => PROFILE_FIELDS
                .iter()
                .map(|f| field(f, false))
                .chain(PASSWORD_FIELDS.iter().map(|f| field(f, true)))
                .collect(),
        };

        Self {
            generation,
            view,
            kind,
            fields,
            selected: 0,
            patient_id: values.get("patient_id").filter(|id| !id.is_empty()).cloned(),
            outcome: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn view(&self) -> ViewId {
        self.view
    }

    pub fn patient_id(&self) -> Option<&str> {
        self.patient_id.as_deref()
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_field(&self) -> Option<&FormField> {
        self.fields.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.fields.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn set_value(&mut self, index: usize, value: String) {
        if let Some(field) = self.fields.get_mut(index) {
            field.value = value;
        }
    }

    /// Set a field by name; `false` if the form has no such field
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => {
                field.value = value.to_string();
                true
            }
            None => false,
        }
    }

    fn value(&self, name: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.trim())
            .unwrap_or_default()
    }

    /// Build the write for the current values
    ///
    /// Fails with a user-facing message when required fields are empty.
    pub fn submission(&self) -> Result<(WriteKind, Mutation), String> {
        match self.kind {
            FormKind::Patient => {
                if let Some(missing) = self.fields.iter().find(|f| f.value.trim().is_empty()) {
                    return Err(format!("{} Is Required.", missing.label));
                }
                let mut body: Vec<(String, String)> = self
                    .fields
                    .iter()
                    .map(|f| (f.name.to_string(), f.value.trim().to_string()))
                    .collect();
                if let Some(id) = &self.patient_id {
                    body.push(("patient_id".to_string(), id.clone()));
                }
                Ok((WriteKind::Predict, Mutation::post_form(PREDICT_PATH, body)))
            }
            FormKind::Profile => {
                let passwords: Vec<&str> = PASSWORD_FIELDS
                    .iter()
                    .map(|(name, _)| self.value(name))
                    .collect();

                if passwords.iter().any(|p| !p.is_empty()) {
                    if passwords.iter().any(|p| p.is_empty()) {
                        return Err("All fields are required.".to_string());
                    }
                    if passwords[1] != passwords[2] {
                        return Err("New passwords do not match.".to_string());
                    }
                    let change = PasswordChange {
                        current_password: passwords[0].to_string(),
                        new_password: passwords[1].to_string(),
                        confirm_password: passwords[2].to_string(),
                    };
                    return Mutation::patch_json(CHANGE_PASSWORD_PATH, &change)
                        .map(|m| (WriteKind::ChangePassword, m))
                        .map_err(|e| e.to_string());
                }

                let update = ProfileUpdate {
                    name: self.value("name").to_string(),
                    email: self.value("email").to_string(),
                };
                if update.name.is_empty() && update.email.is_empty() {
                    return Err("No new data provided.".to_string());
                }
                Mutation::patch_json(PROFILE_PATH, &update)
                    .map(|m| (WriteKind::UpdateProfile, m))
                    .map_err(|e| e.to_string())
            }
        }
    }

    /// Take in the reply of a submit issued by this form
    pub fn apply_write(&mut self, kind: &WriteKind, outcome: &WriteOutcome) {
        if !outcome.success {
            self.outcome = Some(format!("! {}", outcome.notice));
            return;
        }

        match kind {
            WriteKind::Predict => {
                if let Some(id) = outcome.body.get("patient_id").and_then(|v| v.as_str()) {
                    debug!("Form now edits patient {}", id);
                    self.patient_id = Some(id.to_string());
                }
            }
            WriteKind::ChangePassword => {
                for field in self.fields.iter_mut().filter(|f| f.secret) {
                    field.value.clear();
                }
            }
            _ => {}
        }
        self.outcome = Some(format!("= {}", outcome.notice));
    }

    /// Forms have no data of their own to fetch
    pub fn start(&mut self) -> Option<String> {
        None
    }

    pub fn apply(&mut self, path: &str, _result: Result<serde_json::Value, FetchFailure>) {
        debug!("Form ignores data for {}", path);
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let marker = if i == self.selected { '>' } else { ' ' };
                let value = if field.secret {
                    "*".repeat(field.value.chars().count())
                } else {
                    field.value.clone()
                };
                format!("{} {:<20} {}", marker, field.label, value)
            })
            .collect();

        if let Some(outcome) = &self.outcome {
            lines.push(String::new());
            lines.push(outcome.clone());
        }
        lines
    }
}

fn attributes(tag: &str) -> HashMap<String, String> {
    ATTRIBUTE
        .captures_iter(tag)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| decode_entities(m.as_str()))
                .unwrap_or_default();
            Some((name, value))
        })
        .collect()
}

fn decode_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Current value of every named input and select in `html`
///
/// Radio buttons and checkboxes count only when checked; password inputs
/// are never prefilled.
pub fn form_values(html: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();

    for caps in INPUT_TAG.captures_iter(html) {
        let attrs = attributes(&caps[1]);
        let Some(name) = attrs.get("name") else {
            continue;
        };
        let kind = attrs.get("type").map(String::as_str).unwrap_or("text");
        let value = match kind.to_ascii_lowercase().as_str() {
            "radio" | "checkbox" if !attrs.contains_key("checked") => continue,
            "password" | "submit" | "button" => continue,
            _ => attrs.get("value").cloned().unwrap_or_default(),
        };
        values.insert(name.clone(), value);
    }

    for caps in SELECT_TAG.captures_iter(html) {
        let attrs = attributes(&caps[1]);
        let Some(name) = attrs.get("name") else {
            continue;
        };
        let selected = OPTION_TAG
            .captures_iter(&caps[2])
            .map(|option| attributes(&option[1]))
            .find(|option| option.contains_key("selected"))
            .and_then(|option| option.get("value").cloned());
        if let Some(value) = selected {
            values.insert(name.clone(), value);
        }
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sv_net::Payload;

    const EDIT_FRAGMENT: &str = r#"
        <form id="patient-form">
          <input type="hidden" name="patient_id" value="250101001">
          <input type="text" name="name" value="Ada &amp; Co">
          <input type="number" name="age" value="67">
          <select name="gender"><option value="Male">Male</option><option value="Female" selected>Female</option></select>
          <input type="radio" name="hypertension" value="0">
          <input type="radio" name="hypertension" value="1" checked>
          <input type="password" name="secret" value="nope">
        </form>"#;

    fn filled_patient_form() -> FormController {
        let mut form = FormController::new(1, ViewId::Add, &HashMap::new());
        for (name, value) in [
            ("name", "Ada"),
            ("age", "67"),
            ("gender", "Female"),
            ("hypertension", "1"),
            ("heart_disease", "0"),
            ("ever_married", "Yes"),
            ("work_type", "Private"),
            ("residence_type", "Urban"),
            ("avg_glucose_level", "105.2"),
            ("bmi", "27.1"),
            ("smoking_status", "never smoked"),
        ] {
            assert!(form.set(name, value));
        }
        form
    }

    #[test]
    fn test_form_values_from_fragment() {
        let values = form_values(EDIT_FRAGMENT);
        assert_eq!(values["patient_id"], "250101001");
        assert_eq!(values["name"], "Ada & Co");
        assert_eq!(values["gender"], "Female");
        assert_eq!(values["hypertension"], "1");
        assert!(!values.contains_key("secret"));
    }

    #[test]
    fn test_prefilled_edit_form_keeps_patient_id() {
        let form = FormController::new(4, ViewId::Edit, &form_values(EDIT_FRAGMENT));
        assert_eq!(form.patient_id(), Some("250101001"));
        assert_eq!(form.kind(), FormKind::Patient);
        assert_eq!(form.fields()[1].value, "67");
    }

    #[test]
    fn test_missing_field_blocks_submit() {
        let mut form = filled_patient_form();
        form.set("bmi", " ");
        assert_eq!(form.submission().unwrap_err(), "BMI Is Required.");
    }

    #[test]
    fn test_patient_submit_posts_form() {
        let mut form = filled_patient_form();
        form.patient_id = Some("250101001".to_string());

        let (kind, mutation) = form.submission().unwrap();
        assert_eq!(kind, WriteKind::Predict);
        assert_eq!(mutation.to_string(), "POST /patient/predict");
        assert_eq!(mutation.form_value("smoking_status"), Some("never smoked"));
        assert_eq!(mutation.form_value("patient_id"), Some("250101001"));
    }

    #[test]
    fn test_prediction_turns_add_into_edit() {
        let mut form = filled_patient_form();
        assert_eq!(form.patient_id(), None);

        let outcome = WriteOutcome::from_result(
            &WriteKind::Predict,
            Ok(json!({ "success": true, "patient_id": "250101002", "name": "Ada", "risk": 12.0, "risk_level": "Low" })),
        );
        form.apply_write(&WriteKind::Predict, &outcome);

        assert_eq!(form.patient_id(), Some("250101002"));
        assert!(form.lines().last().unwrap().starts_with("= Stroke risk 12.0% (Low)"));
    }

    #[test]
    fn test_settings_profile_and_password() {
        let mut values = HashMap::new();
        values.insert("name".to_string(), "Sam".to_string());
        values.insert("email".to_string(), "sam@example.org".to_string());
        let mut form = FormController::new(2, ViewId::Settings, &values);

        let (kind, mutation) = form.submission().unwrap();
        assert_eq!(kind, WriteKind::UpdateProfile);
        assert_eq!(mutation.to_string(), "PATCH /settings/api/profile");
        assert_eq!(
            mutation.payload,
            Payload::Json(json!({ "name": "Sam", "email": "sam@example.org" }))
        );

        form.set("current_password", "old");
        assert_eq!(form.submission().unwrap_err(), "All fields are required.");
        form.set("new_password", "new-one");
        form.set("confirm_password", "new-two");
        assert_eq!(form.submission().unwrap_err(), "New passwords do not match.");

        form.set("confirm_password", "new-one");
        let (kind, mutation) = form.submission().unwrap();
        assert_eq!(kind, WriteKind::ChangePassword);
        assert_eq!(mutation.to_string(), "PATCH /settings/api/change_password");
        assert!(form.lines().iter().any(|l| l.ends_with("*******")));

        let outcome = WriteOutcome::from_result(
            &kind,
            Ok(json!({ "success": true, "message": "Password changed successfully." })),
        );
        form.apply_write(&kind, &outcome);
        assert!(form.fields().iter().filter(|f| f.secret).all(|f| f.value.is_empty()));
    }
}
