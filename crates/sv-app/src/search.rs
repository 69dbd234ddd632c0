//! Patient search on the home screen
//!
//! Unlike the feature controllers this state outlives navigations: the query
//! and its suggestions are still there when the shell closes back to search.
//! Each query change bumps a sequence number, and suggestion pages for an
//! older sequence are dropped.

use sv_net::api::suggestions_path;
use sv_net::{Suggestion, SuggestionPage};
use tracing::{debug, warn};

use crate::features::{decode, InFlight};
use crate::message::FetchFailure;

/// Length of a patient id
const PATIENT_ID_DIGITS: usize = 9;

/// How the server will read a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Empty,
    /// Name prefix: letters and spaces, starting with a letter
    Name,
    /// A complete patient id
    PatientId,
    /// Digits, but not enough of them yet
    PartialId,
    /// Mixed letters and digits, or other characters
    Invalid,
}

impl QueryKind {
    pub fn classify(query: &str) -> Self {
        let query = query.trim();
        if query.is_empty() {
            return QueryKind::Empty;
        }
        if query.chars().all(|c| c.is_ascii_digit()) {
            return if query.len() == PATIENT_ID_DIGITS {
                QueryKind::PatientId
            } else {
                QueryKind::PartialId
            };
        }
        let starts_with_letter = query.chars().next().is_some_and(|c| c.is_alphabetic());
        if starts_with_letter && query.chars().all(|c| c.is_alphabetic() || c == ' ') {
            QueryKind::Name
        } else {
            QueryKind::Invalid
        }
    }

    /// `true` when the server can answer the query
    pub fn is_searchable(&self) -> bool {
        matches!(self, QueryKind::Name | QueryKind::PatientId)
    }
}

/// Suggestion page request for the current query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    pub seq: u64,
    pub path: String,
}

#[derive(Debug, Clone, Default)]
pub struct PatientSearch {
    query: String,
    seq: u64,
    page: u32,
    has_more: bool,
    suggestions: Vec<Suggestion>,
    selected: usize,
    in_flight: InFlight,
    error: Option<String>,
}

impl PatientSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn kind(&self) -> QueryKind {
        QueryKind::classify(&self.query)
    }

    /// Replace the query and drop earlier suggestions
    ///
    /// Returns the first page request when the query is searchable.
    pub fn set_query(&mut self, query: &str) -> Option<SuggestionRequest> {
        self.query = query.to_string();
        self.seq += 1;
        self.page = 0;
        self.has_more = false;
        self.suggestions.clear();
        self.selected = 0;
        self.in_flight = InFlight::default();
        self.error = None;

        if self.kind().is_searchable() {
            Some(self.request(1))
        } else {
            None
        }
    }

    /// Request the next page, if the last one said there is more
    pub fn load_more(&mut self) -> Option<SuggestionRequest> {
        if self.in_flight.is_active() || !self.has_more {
            return None;
        }
        Some(self.request(self.page + 1))
    }

    fn request(&mut self, page: u32) -> SuggestionRequest {
        let path = suggestions_path(self.query.trim(), page);
        SuggestionRequest {
            seq: self.seq,
            path: self.in_flight.begin(path),
        }
    }

    pub fn apply(&mut self, seq: u64, path: &str, result: Result<serde_json::Value, FetchFailure>) {
        if seq != self.seq || !self.in_flight.finish(path) {
            debug!("Dropping suggestions for an older query ({})", path);
            return;
        }

        match result.and_then(|value| decode::<SuggestionPage>(path, value)) {
            Ok(page) => {
                self.page = page.page;
                self.has_more = page.has_more;
                self.suggestions.extend(page.items);
                self.error = None;
            }
            Err(failure) => {
                warn!("Patient search failed: {}", failure.message);
                self.error = Some(failure.message);
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_active()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn selected(&self) -> Option<&Suggestion> {
        self.suggestions.get(self.selected)
    }

    /// Move the selection down; asks for the next page at the last row
    pub fn select_next(&mut self) -> Option<SuggestionRequest> {
        if self.selected + 1 < self.suggestions.len() {
            self.selected += 1;
            None
        } else {
            self.load_more()
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn lines(&self) -> Vec<String> {
        match self.kind() {
            QueryKind::Empty => return Vec::new(),
            QueryKind::PartialId => {
                return vec![format!("Patient IDs have {} digits", PATIENT_ID_DIGITS)]
            }
            QueryKind::Invalid => {
                return vec!["Search by name or by patient ID, not both".to_string()]
            }
            QueryKind::Name | QueryKind::PatientId => {}
        }

        if let Some(error) = &self.error {
            return vec![format!("! {}", error)];
        }
        if self.suggestions.is_empty() {
            let line = if self.is_loading() {
                "Searching..."
            } else {
                "No matching patients"
            };
            return vec![line.to_string()];
        }

        let mut lines: Vec<String> = self
            .suggestions
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let marker = if i == self.selected { '>' } else { ' ' };
                format!("{} {:<10} {}", marker, s.patient_id, s.name)
            })
            .collect();
        if self.has_more {
            lines.push("  [m] more results".to_string());
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(items: &[(&str, &str)], page: u32, has_more: bool) -> serde_json::Value {
        let items: Vec<_> = items
            .iter()
            .map(|(id, name)| json!({ "patient_id": id, "name": name }))
            .collect();
        json!({ "items": items, "page": page, "limit": 30, "has_more": has_more })
    }

    #[test]
    fn test_classify_queries() {
        assert_eq!(QueryKind::classify("  "), QueryKind::Empty);
        assert_eq!(QueryKind::classify("ada lo"), QueryKind::Name);
        assert_eq!(QueryKind::classify("250101001"), QueryKind::PatientId);
        assert_eq!(QueryKind::classify("2501"), QueryKind::PartialId);
        assert_eq!(QueryKind::classify("ada1"), QueryKind::Invalid);
        assert_eq!(QueryKind::classify("-ada"), QueryKind::Invalid);
    }

    #[test]
    fn test_only_searchable_queries_request() {
        let mut search = PatientSearch::new();
        assert!(search.set_query("2501").is_none());
        assert_eq!(search.lines(), vec!["Patient IDs have 9 digits".to_string()]);

        let request = search.set_query("ada l").unwrap();
        assert_eq!(
            request.path,
            "/api/patients/suggestions?q=ada+l&page=1&limit=30"
        );
        assert!(search.is_loading());
        assert_eq!(search.lines(), vec!["Searching...".to_string()]);
    }

    #[test]
    fn test_older_query_results_are_dropped() {
        let mut search = PatientSearch::new();
        let first = search.set_query("ad").unwrap();
        let second = search.set_query("ada").unwrap();

        search.apply(first.seq, &first.path, Ok(page(&[("1", "Adam")], 1, false)));
        assert!(search.suggestions().is_empty());
        assert!(search.is_loading());

        search.apply(second.seq, &second.path, Ok(page(&[("2", "Ada")], 1, false)));
        assert_eq!(search.suggestions().len(), 1);
        assert_eq!(search.selected().unwrap().patient_id, "2");
    }

    #[test]
    fn test_selection_pages_at_last_row() {
        let mut search = PatientSearch::new();
        let request = search.set_query("a").unwrap();
        search.apply(
            request.seq,
            &request.path,
            Ok(page(&[("1", "Ada"), ("2", "Alan")], 1, true)),
        );
        assert!(search.lines().last().unwrap().contains("more results"));

        assert!(search.select_next().is_none());
        let next = search.select_next().unwrap();
        assert!(next.path.contains("page=2"));
        assert!(search.select_next().is_none());

        search.apply(next.seq, &next.path, Ok(page(&[("3", "Ari")], 2, false)));
        search.select_next();
        assert_eq!(search.selected().unwrap().name, "Ari");
        assert!(!search.has_more());
    }

    #[test]
    fn test_failure_is_shown() {
        let mut search = PatientSearch::new();
        let request = search.set_query("ada").unwrap();
        search.apply(
            request.seq,
            &request.path,
            Err(FetchFailure {
                status: Some(500),
                message: "HTTP 500".to_string(),
            }),
        );
        assert_eq!(search.lines(), vec!["! HTTP 500".to_string()]);
        assert!(!search.is_loading());
    }
}
