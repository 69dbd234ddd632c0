//! Dashboard KPIs, top-risk table and work-type distribution

use sv_net::api::DASHBOARD_STATS_PATH;
use sv_net::DashboardStats;
use tracing::warn;

use super::{decode, fragment_present, FeatureController, InFlight};
use crate::hooks::{PostRenderHook, RenderContext};
use crate::message::FetchFailure;

#[derive(Debug)]
pub struct DashboardHook;

impl PostRenderHook for DashboardHook {
    fn name(&self) -> &str {
        "dashboard"
    }

    fn on_render(&self, ctx: &RenderContext) -> Option<FeatureController> {
        fragment_present(ctx).then(|| FeatureController::Dashboard(Dashboard::new(ctx.generation)))
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    generation: u64,
    stats: Option<DashboardStats>,
    in_flight: InFlight,
    error: Option<String>,
}

impl Dashboard {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            stats: None,
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
        Some(self.in_flight.begin(DASHBOARD_STATS_PATH.to_string()))
    }

    pub fn apply(&mut self, path: &str, result: Result<serde_json::Value, FetchFailure>) {
        if !self.in_flight.finish(path) {
            return;
        }

        match result.and_then(|value| decode::<DashboardStats>(path, value)) {
            Ok(stats) => {
                self.stats = Some(stats);
                self.error = None;
            }
            Err(failure) => {
                warn!("Dashboard stats failed: {}", failure.message);
                self.error = Some(failure.message);
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_active()
    }

    pub fn stats(&self) -> Option<&DashboardStats> {
        self.stats.as_ref()
    }

    pub fn lines(&self) -> Vec<String> {
        if let Some(error) = &self.error {
            return vec![format!("! {}", error)];
        }
        let Some(stats) = &self.stats else {
            return vec!["Loading statistics...".to_string()];
        };

        let kpis = &stats.kpis;
        let mut lines = vec![
            format!("Total patients   {}", kpis.total),
            format!("High risk        {}", kpis.high_risk),
            format!("Avg. glucose     {:.1}", kpis.avg_glucose),
            format!("Smokers          {}", kpis.smokers),
            String::new(),
            "Highest risk".to_string(),
        ];

        lines.extend(stats.table.iter().map(|row| {
            format!(
                "  {:<24} {:>3} {:<7} {:>5.1}%  {}",
                row.name,
                row.age.round() as i64,
                row.gender,
                row.stroke_risk,
                row.conditions
            )
        }));

        if !stats.charts.work_distribution.is_empty() {
            lines.push(String::new());
            lines.push("Work type".to_string());
            lines.extend(
                stats
                    .charts
                    .work_distribution
                    .iter()
                    .map(|(work, count)| format!("  {:<16} {}", work, count)),
            );
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stats() -> serde_json::Value {
        json!({
            "success": true,
            "kpis": { "total": 120, "high_risk": 9, "avg_glucose": 106.31, "smokers": 31 },
            "charts": {
                "scatter": [],
                "work_distribution": { "Govt_job": 20, "Private": 100 }
            },
            "table": [{
                "name": "Grace H.",
                "age": 81,
                "gender": "Female",
                "conditions": "Hypertension",
                "avg_glucose_level": 210.3,
                "stroke_risk": 62.0
            }]
        })
    }

    #[test]
    fn test_start_requests_stats_once() {
        let mut dashboard = Dashboard::new(2);
        assert_eq!(dashboard.start().as_deref(), Some("/dashboard/api/stats"));
        assert_eq!(dashboard.start(), None);
    }

    #[test]
    fn test_stats_render() {
        let mut dashboard = Dashboard::new(2);
        let path = dashboard.start().unwrap();
        dashboard.apply(&path, Ok(stats()));

        assert_eq!(dashboard.stats().map(|s| s.kpis.high_risk), Some(9));
        let lines = dashboard.lines();
        assert!(lines.iter().any(|l| l.contains("Avg. glucose     106.3")));
        assert!(lines.iter().any(|l| l.contains("Grace H.")));
        assert!(lines.iter().any(|l| l.contains("Private")));
    }

    #[test]
    fn test_malformed_stats_report_error() {
        let mut dashboard = Dashboard::new(2);
        let path = dashboard.start().unwrap();
        dashboard.apply(&path, Ok(json!({ "success": false })));

        assert!(dashboard.stats().is_none());
        assert!(dashboard.lines()[0].starts_with("! Unexpected response"));
    }
}
