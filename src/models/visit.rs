use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One row of the site-visit log.
///
/// Timestamps carry no time zone; the log is assumed to be recorded in a
/// single local clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitEvent {
    pub timestamp: NaiveDateTime,
    pub user_id: String,
    pub country_id: String,
    pub site_id: String,
}

impl VisitEvent {
    pub fn new(
        timestamp: NaiveDateTime,
        user_id: impl Into<String>,
        country_id: impl Into<String>,
        site_id: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            user_id: user_id.into(),
            country_id: country_id.into(),
            site_id: site_id.into(),
        }
    }
}
