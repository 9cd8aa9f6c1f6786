//! Semester splitter
//!
//! The upstream returns a year's continuous-assessment notes as one flat,
//! unordered list where each record carries a period label and a numeric
//! period id. The splitter partitions that list into at most two semester
//! buckets: the semester with the smaller period id is always the first
//! bucket, independent of record arrival order.
//!
//! When every record shares one period id - including the data-quality edge
//! case where both semesters were issued the same id - everything lands in
//! the first bucket in original array order and the second bucket is absent.

use super::NormalizeError;
use crate::models::{RawPeriodNote, SemesterBucket, SemesterGrades};

/// Partition a flat note list into ordered semester buckets
///
/// An empty payload yields empty buckets, not an error. A record without a
/// period id fails the whole payload closed.
pub fn split_semesters(notes: Vec<RawPeriodNote>) -> Result<SemesterGrades, NormalizeError> {
    if notes.is_empty() {
        return Ok(SemesterGrades::default());
    }

    let min_id = min_period_id(&notes)?;

    let mut first = Vec::new();
    let mut second = Vec::new();
    for note in notes {
        if note.period_id == Some(min_id) {
            first.push(note);
        } else {
            second.push(note);
        }
    }

    Ok(SemesterGrades {
        first: Some(bucket(first)),
        second: if second.is_empty() {
            None
        } else {
            Some(bucket(second))
        },
    })
}

/// Smallest period id present in the payload
fn min_period_id(notes: &[RawPeriodNote]) -> Result<i64, NormalizeError> {
    let mut min_id = i64::MAX;
    for note in notes {
        let id = note
            .period_id
            .ok_or(NormalizeError::MissingField("periodId"))?;
        min_id = min_id.min(id);
    }
    Ok(min_id)
}

fn bucket(notes: Vec<RawPeriodNote>) -> SemesterBucket {
    // First label present in the bucket; the upstream labels every record,
    // so an unlabeled bucket only occurs on degenerate payloads
    let period_label = notes
        .iter()
        .find_map(|n| n.period_label.clone())
        .unwrap_or_default();
    SemesterBucket {
        period_label,
        notes,
    }
}

// ========================================
// Tests
// ========================================
