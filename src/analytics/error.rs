use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyticsError {
    /// The sequence was required to be in ascending timestamp order.
    #[error("event {index} at {found} precedes the event before it at {previous}")]
    Unordered {
        index: usize,
        previous: NaiveDateTime,
        found: NaiveDateTime,
    },
    #[error("window start {start} is after window end {end}")]
    InvalidWindow {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
