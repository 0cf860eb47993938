//! Errors raised when building timeline items.

use chrono::NaiveDate;
use thiserror::Error;

/// Timeline construction errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimelineError {
    /// The item starts after it ends.
    #[error("timeline item starts on {start} after it ends on {end}")]
    InvertedRange {
        /// Start day.
        start: NaiveDate,
        /// End day.
        end: NaiveDate,
    },
}
