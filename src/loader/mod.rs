//! Loaders turning line-oriented logs into typed event sequences.
//!
//! A load either yields the complete ordered sequence or fails on the first
//! malformed line; callers never see a partial sequence.

pub mod purchases;
pub mod trait_def;
pub mod visits;

pub use purchases::PurchaseJsonLoader;
pub use trait_def::{LoadError, LoadResult, ParseCause, ParseError, RecordLoader};
pub use visits::{VisitCsvLoader, DEFAULT_TIMESTAMP_FORMAT};
