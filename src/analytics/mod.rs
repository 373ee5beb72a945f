//! Single-pass aggregations over the visit and purchase logs.
//!
//! Every query is a pure function over a borrowed slice and keeps its own
//! private state, so queries can run in any order over the same input.

pub mod error;
pub mod first_last;
pub mod frequent_visits;
pub mod last_visit;
pub mod max_tracker;
pub mod popularity;
pub mod unique_visitors;

pub use error::{AnalyticsError, AnalyticsResult};
pub use first_last::{same_site_users, SameSiteCounter, SiteSpan};
pub use frequent_visits::{frequent_visitors, FrequentVisit, VisitWindow, DEFAULT_VISIT_THRESHOLD};
pub use last_visit::{ensure_chronological, last_visit_leaderboard, SiteTally};
pub use max_tracker::{Leaders, MaxTracker};
pub use popularity::{product_popularity, ProductPopularity};
pub use unique_visitors::{top_sites_by_unique_users, top_sites_matching, TopSites};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{PurchaseEvent, VisitEvent};
use crate::report::{PurchaseReport, VisitReport};

/// Parameters shared by one run of the visit queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryParams {
    /// Country whose visits feed the unique-visitor ranking.
    pub country: String,
    pub window: VisitWindow,
    pub threshold: u64,
    /// Keep only the top N sites of the last-visit leaderboard.
    #[serde(default)]
    pub leaderboard_limit: Option<usize>,
}

/// Run all four visit queries over `events`.
///
/// Fails without partial results when the log is not in ascending
/// timestamp order.
pub fn run_visit_queries(events: &[VisitEvent], params: &QueryParams) -> AnalyticsResult<VisitReport> {
    info!(
        events = events.len(),
        country = %params.country,
        threshold = params.threshold,
        "Running visit queries"
    );

    let unique_visitors = top_sites_by_unique_users(events, &params.country);
    let frequent_visitors = frequent_visitors(events, &params.window, params.threshold);
    let mut last_visits = last_visit_leaderboard(events)?;
    if let Some(limit) = params.leaderboard_limit {
        last_visits.truncate(limit);
    }
    let same_site_users = same_site_users(events);

    info!(
        top_unique = unique_visitors.max_count,
        frequent = frequent_visitors.len(),
        same_site_users,
        "Visit queries finished"
    );

    Ok(VisitReport {
        country: params.country.clone(),
        unique_visitors,
        window: params.window,
        threshold: params.threshold,
        frequent_visitors,
        last_visits,
        same_site_users,
    })
}

pub fn run_purchase_queries(purchases: &[PurchaseEvent]) -> PurchaseReport {
    info!(purchases = purchases.len(), "Running purchase queries");
    PurchaseReport {
        popularity: product_popularity(purchases),
    }
}
