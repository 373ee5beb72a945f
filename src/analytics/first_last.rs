//! Streaming count of users whose first and last visits were to the same
//! site.
//!
//! Events may arrive in any order. Each user keeps only the earliest and
//! latest visit seen so far, and the running count is corrected in place
//! whenever one of those ends moves.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::models::VisitEvent;

/// Earliest and latest visit known for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSpan {
    pub first_ts: NaiveDateTime,
    pub first_site: String,
    pub last_ts: NaiveDateTime,
    pub last_site: String,
}

impl SiteSpan {
    pub fn new(timestamp: NaiveDateTime, site_id: &str) -> Self {
        Self {
            first_ts: timestamp,
            first_site: site_id.to_owned(),
            last_ts: timestamp,
            last_site: site_id.to_owned(),
        }
    }

    pub fn is_same_site(&self) -> bool {
        self.first_site == self.last_site
    }

    /// Fold one visit into the span and return how the user's contribution
    /// to the same-site count changed: -1, 0 or +1.
    ///
    /// A visit strictly before `first_ts` replaces the first end, one strictly
    /// after `last_ts` replaces the last end, anything else leaves the span
    /// untouched.
    pub fn absorb(&mut self, timestamp: NaiveDateTime, site_id: &str) -> i64 {
        let was_same = self.is_same_site();

        if timestamp < self.first_ts {
            self.first_ts = timestamp;
            self.first_site = site_id.to_owned();
        } else if timestamp > self.last_ts {
            self.last_ts = timestamp;
            self.last_site = site_id.to_owned();
        } else {
            return 0;
        }

        i64::from(self.is_same_site()) - i64::from(was_same)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SameSiteCounter {
    spans: HashMap<String, SiteSpan>,
    same: u64,
}

impl SameSiteCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, event: &VisitEvent) {
        match self.spans.get_mut(event.user_id.as_str()) {
            Some(span) => {
                let delta = span.absorb(event.timestamp, &event.site_id);
                self.same = self.same.saturating_add_signed(delta);
            }
            None => {
                // A lone visit is trivially first == last.
                self.spans.insert(
                    event.user_id.clone(),
                    SiteSpan::new(event.timestamp, &event.site_id),
                );
                self.same += 1;
            }
        }
    }

    pub fn same_site_users(&self) -> u64 {
        self.same
    }

    pub fn tracked_users(&self) -> usize {
        self.spans.len()
    }
}

/// Number of users whose chronologically first and last visits were to the
/// same site. Arrival order does not matter.
pub fn same_site_users(events: &[VisitEvent]) -> u64 {
    let mut counter = SameSiteCounter::new();
    for event in events {
        counter.observe(event);
    }

    debug!(
        users = counter.tracked_users(),
        same_site = counter.same_site_users(),
        "Computed same-site users"
    );
    counter.same_site_users()
}
