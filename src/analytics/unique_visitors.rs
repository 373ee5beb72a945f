//! Sites with the most distinct visitors from a given country.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::analytics::max_tracker::MaxTracker;
use crate::models::VisitEvent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopSites {
    /// Sites tied at `max_count`, in the order they reached it.
    pub sites: Vec<String>,
    pub max_count: u64,
}

pub fn top_sites_by_unique_users(events: &[VisitEvent], country: &str) -> TopSites {
    let top = top_sites_matching(events, |candidate| candidate == country);
    debug!(country, sites = ?top.sites, max_count = top.max_count, "Computed unique visitors");
    top
}

/// Count distinct users per site among events whose country passes
/// `predicate`, returning the sites with the highest count.
///
/// A repeat visit by a known user leaves the site's count unchanged and is
/// not offered to the max tracker.
pub fn top_sites_matching<F>(events: &[VisitEvent], mut predicate: F) -> TopSites
where
    F: FnMut(&str) -> bool,
{
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut unique_users: HashMap<&str, u64> = HashMap::new();
    let mut tracker = MaxTracker::new();

    for event in events.iter().filter(|e| predicate(e.country_id.as_str())) {
        let site = event.site_id.as_str();
        if !seen.insert((site, event.user_id.as_str())) {
            continue;
        }

        let count = unique_users.entry(site).or_insert(0);
        *count += 1;
        tracker.observe(site, *count);
    }

    let leaders = tracker.into_leaders().map_keys(str::to_owned);
    TopSites {
        sites: leaders.keys,
        max_count: leaders.value,
    }
}
