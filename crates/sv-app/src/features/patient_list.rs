//! Patient list with infinite scroll

use sv_net::api::patient_page_path;
use sv_net::{PatientPage, PatientRow};
use tracing::{debug, warn};

use super::{decode, fragment_present, FeatureController, InFlight};
use crate::hooks::{PostRenderHook, RenderContext};
use crate::message::FetchFailure;

#[derive(Debug)]
pub struct PatientListHook;

impl PostRenderHook for PatientListHook {
    fn name(&self) -> &str {
        "patient-list"
    }

    fn on_render(&self, ctx: &RenderContext) -> Option<FeatureController> {
        fragment_present(ctx)
            .then(|| FeatureController::PatientList(PatientList::new(ctx.generation)))
    }
}

/// Paging state of the patient list
#[derive(Debug, Clone)]
pub struct PatientList {
    generation: u64,
    /// Last page received; 0 before the first
    page: u32,
    has_next: bool,
    total: u64,
    rows: Vec<PatientRow>,
    selected: usize,
    in_flight: InFlight,
    error: Option<String>,
}

impl PatientList {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            page: 0,
            has_next: true,
            total: 0,
            rows: Vec::new(),
            selected: 0,
            in_flight: InFlight::default(),
            error: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn start(&mut self) -> Option<String> {
        self.load_more()
    }

    /// Request the next page unless one is in flight or none is left
    pub fn load_more(&mut self) -> Option<String> {
        if self.in_flight.is_active() || !self.has_next {
            return None;
        }
        Some(self.in_flight.begin(patient_page_path(self.page + 1)))
    }

    pub fn apply(&mut self, path: &str, result: Result<serde_json::Value, FetchFailure>) {
        if !self.in_flight.finish(path) {
            debug!("Ignoring unexpected patient page {}", path);
            return;
        }

        match result.and_then(|value| decode::<PatientPage>(path, value)) {
            Ok(page) => {
                self.page = page.page;
                self.has_next = page.has_next;
                self.total = page.total_count;
                self.rows.extend(page.patients);
                self.error = None;
            }
            Err(failure) => {
                warn!("Patient list page failed: {}", failure.message);
                self.error = Some(failure.message);
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_active()
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn rows(&self) -> &[PatientRow] {
        &self.rows
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_row(&self) -> Option<&PatientRow> {
        self.rows.get(self.selected)
    }

    /// Move the selection down; returns the next page request when the
    /// selection reaches the last loaded row
    pub fn select_next(&mut self) -> Option<String> {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
        if self.selected + 1 >= self.rows.len() {
            self.load_more()
        } else {
            None
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(format!(
            "{} of {} patients",
            self.rows.len(),
            self.total
        ));

        for (i, row) in self.rows.iter().enumerate() {
            let marker = if i == self.selected { '>' } else { ' ' };
            lines.push(format!(
                "{} {:<10} {:<24} {:>3} {:<7} {:<8} {:>5.1}%",
                marker,
                row.patient_id,
                row.name,
                row.age.round() as i64,
                row.gender,
                row.risk_level,
                row.stroke_risk
            ));
        }

        if let Some(error) = &self.error {
            lines.push(format!("! {}", error));
        } else if self.is_loading() {
            lines.push("Loading more...".to_string());
        } else if !self.has_next && !self.rows.is_empty() {
            lines.push("End of records".to_string());
        }
        lines
    }
}
