pub mod errors;

use std::collections::{HashMap, HashSet};

pub use errors::StoreError;

/// Aggregated analytics over one experiment's clicks. Computed in-memory
/// over the full click set; fine at the scale a single-experiment
/// analytics query is expected to run at.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct AnalyticsSummary {
    pub total_clicks: u64,
    pub unique_ips: u64,
    pub unique_sessions: u64,
    /// `variant_id -> click count`.
    pub per_variant: HashMap<u64, u64>,
    /// `"YYYY-MM-DDTHH" -> click count`.
    pub per_hour: HashMap<String, u64>,
    /// `"YYYY-MM-DD" -> click count`.
    pub per_day: HashMap<String, u64>,
}

impl AnalyticsSummary {
    pub fn from_clicks<'a>(
        clicks: impl Iterator<Item = &'a shared_types::ABTestClickStatistic>,
    ) -> Self {
        let mut summary = AnalyticsSummary::default();
        let mut ips = HashSet::new();
        let mut sessions = HashSet::new();

        for click in clicks {
            summary.total_clicks += 1;
            ips.insert(click.ip.clone());
            sessions.insert(click.session_id.clone());
            *summary.per_variant.entry(click.variant_id).or_insert(0) += 1;
            *summary
                .per_hour
                .entry(click.click_at.format("%Y-%m-%dT%H").to_string())
                .or_insert(0) += 1;
            *summary
                .per_day
                .entry(click.click_at.format("%Y-%m-%d").to_string())
                .or_insert(0) += 1;
        }

        summary.unique_ips = ips.len() as u64;
        summary.unique_sessions = sessions.len() as u64;
        summary
    }
}
