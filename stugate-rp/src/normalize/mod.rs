//! Normalization of raw upstream payloads
//!
//! Pure functions reshaping the flat, unordered upstream payloads into the
//! stable internal structures the presentation layer consumes. Malformed
//! payloads fail closed with [`NormalizeError`] instead of producing
//! half-parsed output; the fetch layer downgrades those failures to empty
//! shapes, so nothing in here ever reaches the caller as an error.

pub mod exams;
pub mod groups;
pub mod semesters;
pub mod timetable;

use thiserror::Error;

/// Raw payload rejection reasons
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Payload does not deserialize into the expected wire shape
    #[error("payload shape mismatch: {0}")]
    Shape(#[from] serde_json::Error),

    /// A record is missing a field the algorithm cannot proceed without
    #[error("record missing required field: {0}")]
    MissingField(&'static str),

    /// An exam record carries a session marker outside the known set
    #[error("unrecognized session marker: {0:?}")]
    UnknownSessionMarker(String),

    /// A schedule entry names a day outside the six-day week
    #[error("day index out of range: {0}")]
    DayOutOfRange(i64),
}
