//! Users who visited one site more than a threshold number of times inside a
//! time window.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analytics::error::{AnalyticsError, AnalyticsResult};
use crate::models::VisitEvent;

pub const DEFAULT_VISIT_THRESHOLD: u64 = 10;

/// Closed interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl VisitWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> AnalyticsResult<Self> {
        if start > end {
            return Err(AnalyticsError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequentVisit {
    pub user_id: String,
    pub site_id: String,
    /// In-window visits for the pair once the whole log has been scanned.
    pub visits: u64,
}

/// Report every (user, site) pair whose in-window visit count exceeds
/// `threshold`, ordered by the moment each pair first crossed it.
pub fn frequent_visitors(
    events: &[VisitEvent],
    window: &VisitWindow,
    threshold: u64,
) -> Vec<FrequentVisit> {
    let Some(crossing) = threshold.checked_add(1) else {
        return Vec::new();
    };

    let mut visits: HashMap<(&str, &str), u64> = HashMap::new();
    let mut crossed: Vec<(&str, &str)> = Vec::new();

    for event in events.iter().filter(|e| window.contains(e.timestamp)) {
        let key = (event.user_id.as_str(), event.site_id.as_str());
        let count = visits.entry(key).or_insert(0);
        *count += 1;
        // Only the transition threshold -> threshold + 1 emits.
        if *count == crossing {
            crossed.push(key);
        }
    }

    debug!(
        pairs = visits.len(),
        crossed = crossed.len(),
        threshold,
        "Computed frequent visitors"
    );

    crossed
        .into_iter()
        .map(|key| FrequentVisit {
            user_id: key.0.to_owned(),
            site_id: key.1.to_owned(),
            visits: visits.get(&key).copied().unwrap_or_default(),
        })
        .collect()
}
