//! Wire and normalized data shapes for the records proxy
//!
//! Raw types mirror the upstream academic-records service payloads
//! field-for-field (camelCase wire names). Normalized types are the stable
//! shapes consumed by the presentation layer; they are derived, stateless,
//! and rebuilt on every cache miss.

use serde::{Deserialize, Serialize};

// ============================================================================
// Raw upstream shapes
// ============================================================================

/// One continuous-assessment note as the upstream returns it
///
/// Fields are optional because the upstream omits them freely; the
/// normalizers decide which absences are fatal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPeriodNote {
    #[serde(rename = "periodLabel")]
    pub period_label: Option<String>,
    #[serde(rename = "periodId")]
    pub period_id: Option<i64>,
    #[serde(rename = "courseLabel")]
    pub course_label: Option<String>,
    pub note: Option<f64>,
}

/// One exam note, carrying an explicit session marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawExamNote {
    #[serde(rename = "periodLabel")]
    pub period_label: Option<String>,
    #[serde(rename = "periodId")]
    pub period_id: Option<i64>,
    #[serde(rename = "courseLabel")]
    pub course_label: Option<String>,
    /// "normale" or "rattrapage" - never inferred, always taken from here
    pub session: Option<String>,
    pub note: Option<f64>,
}

/// One schedule entry before grid construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawScheduleEntry {
    /// Day index, 0 = Saturday through 5 = Thursday
    pub day: Option<i64>,
    #[serde(rename = "slotLabel")]
    pub slot_label: Option<String>,
    #[serde(rename = "courseLabel")]
    pub course_label: Option<String>,
    #[serde(rename = "groupLabel")]
    pub group_label: Option<String>,
}

/// One per-period group/section record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawGroupRecord {
    #[serde(rename = "periodLabel")]
    pub period_label: Option<String>,
    #[serde(rename = "groupLabel")]
    pub group_label: Option<String>,
    #[serde(rename = "sectionLabel")]
    pub section_label: Option<String>,
}

/// One academic-year enrollment
///
/// The id is required: an enrollment without an id cannot key any
/// downstream fetch, so its absence fails the whole payload closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    #[serde(rename = "yearLabel")]
    pub year_label: String,
    #[serde(rename = "levelLabel")]
    pub level_label: Option<String>,
    #[serde(rename = "cycleLabel")]
    pub cycle_label: Option<String>,
}

/// Periodic (semester) result summary, passed through unmodified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodResult {
    #[serde(rename = "periodLabel")]
    pub period_label: Option<String>,
    pub average: Option<f64>,
    pub credits: Option<f64>,
    pub decision: Option<String>,
}

/// Annual result summary, passed through unmodified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualResult {
    #[serde(rename = "yearLabel")]
    pub year_label: Option<String>,
    pub average: Option<f64>,
    pub credits: Option<f64>,
    pub decision: Option<String>,
}

// ============================================================================
// Normalized shapes
// ============================================================================

/// Continuous-assessment notes split into semester buckets
///
/// `first` holds the semester with the smaller period id. Both buckets are
/// `None` when the fetch degraded; `second` alone is `None` when the year
/// has a single semester.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemesterGrades {
    pub first: Option<SemesterBucket>,
    pub second: Option<SemesterBucket>,
}

/// All notes for one semester, in upstream arrival order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterBucket {
    #[serde(rename = "periodLabel")]
    pub period_label: String,
    pub notes: Vec<RawPeriodNote>,
}

/// Exam notes split by semester, then by session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExamGrades {
    pub first: Option<ExamBucket>,
    pub second: Option<ExamBucket>,
}

/// One semester's exam notes partitioned by session marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamBucket {
    #[serde(rename = "periodLabel")]
    pub period_label: String,
    pub normal: Vec<RawExamNote>,
    pub rattrapage: Vec<RawExamNote>,
}

/// Weekly timetable grid
///
/// Rows are distinct time slots sorted by label; every row carries exactly
/// [`crate::normalize::timetable::DAYS_PER_WEEK`] day cells, empty cells
/// included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimetableGrid {
    pub rows: Vec<TimetableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableRow {
    #[serde(rename = "slotLabel")]
    pub slot_label: String,
    /// One cell per day, Saturday-first; a cell may hold several parallel
    /// sessions
    pub days: Vec<Vec<TimetableEntry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableEntry {
    #[serde(rename = "courseLabel")]
    pub course_label: String,
    #[serde(rename = "groupLabel")]
    pub group_label: Option<String>,
}

/// Resolved group/section pair for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAssignment {
    pub group: Option<String>,
    pub section: String,
}
