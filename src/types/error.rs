use chrono::{NaiveDateTime, TimeDelta};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("Date range is empty: start {start} is after end {end}")]
    Empty {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Frequency must be positive, got {0}")]
    NonPositiveFrequency(TimeDelta),

    #[error("Frequency must be a whole number of seconds, got {0}")]
    FractionalFrequency(TimeDelta),

    #[error("Timestamp {0} cannot be represented in the requested timezone")]
    InvalidTimestamp(NaiveDateTime),

    #[error("Date range would hold more than {0} timestamps")]
    TooManySteps(usize),

    #[error("Failed to parse timestamp '{0}'")]
    Parse(String, #[source] chrono::ParseError),
}
