//! Ranking of sites by how many users ended their visit history there.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::analytics::error::{AnalyticsError, AnalyticsResult};
use crate::models::VisitEvent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteTally {
    pub site_id: String,
    pub users: u64,
}

/// Fail with [`AnalyticsError::Unordered`] at the first event whose
/// timestamp is earlier than its predecessor's. Equal timestamps are allowed.
pub fn ensure_chronological(events: &[VisitEvent]) -> AnalyticsResult<()> {
    for (index, pair) in events.windows(2).enumerate() {
        if pair[1].timestamp < pair[0].timestamp {
            return Err(AnalyticsError::Unordered {
                index: index + 1,
                previous: pair[0].timestamp,
                found: pair[1].timestamp,
            });
        }
    }
    Ok(())
}

/// Credit each user's last visit to its site and rank sites by credits,
/// highest first.
///
/// The log must be in ascending timestamp order: scanning it backwards, the
/// first event met for a user is that user's last visit. Sites with equal
/// credits keep the order in which the backward scan first credited them.
pub fn last_visit_leaderboard(events: &[VisitEvent]) -> AnalyticsResult<Vec<SiteTally>> {
    ensure_chronological(events)?;

    let mut resolved: HashSet<&str> = HashSet::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut tallies: Vec<SiteTally> = Vec::new();

    for event in events.iter().rev() {
        if !resolved.insert(event.user_id.as_str()) {
            continue;
        }

        let site = event.site_id.as_str();
        let position = *positions.entry(site).or_insert_with(|| {
            tallies.push(SiteTally {
                site_id: site.to_owned(),
                users: 0,
            });
            tallies.len() - 1
        });
        tallies[position].users += 1;
    }

    // Stable, so ties keep first-credit order.
    tallies.sort_by(|a, b| b.users.cmp(&a.users));

    debug!(users = resolved.len(), sites = tallies.len(), "Computed last-visit leaderboard");
    Ok(tallies)
}
