//! Exam splitter
//!
//! Two-level partition of the year's exam notes: first by semester (minimum
//! period id, as in the semester splitter), then by the record's explicit
//! session marker into normal vs rattrapage sittings. The marker is taken
//! verbatim from the record - a marker outside the known set fails the
//! payload closed rather than guessing.

use super::NormalizeError;
use crate::models::{ExamBucket, ExamGrades, RawExamNote};

/// Session marker for the ordinary sitting
pub const SESSION_NORMAL: &str = "normale";
/// Session marker for the makeup sitting
pub const SESSION_MAKEUP: &str = "rattrapage";

/// Partition exam notes by semester, then by session marker
///
/// Per semester, every input record lands in exactly one of the two session
/// lists: |normal| + |rattrapage| == |input|.
pub fn split_exams(notes: Vec<RawExamNote>) -> Result<ExamGrades, NormalizeError> {
    if notes.is_empty() {
        return Ok(ExamGrades::default());
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

    Ok(ExamGrades {
        first: Some(bucket(first)?),
        second: if second.is_empty() {
            None
        } else {
            Some(bucket(second)?)
        },
    })
}

fn min_period_id(notes: &[RawExamNote]) -> Result<i64, NormalizeError> {
    let mut min_id = i64::MAX;
    for note in notes {
        let id = note
            .period_id
            .ok_or(NormalizeError::MissingField("periodId"))?;
        min_id = min_id.min(id);
    }
    Ok(min_id)
}

/// Split one semester's notes by session marker
fn bucket(notes: Vec<RawExamNote>) -> Result<ExamBucket, NormalizeError> {
    let period_label = notes
        .iter()
        .find_map(|n| n.period_label.clone())
        .unwrap_or_default();

    let mut normal = Vec::new();
    let mut rattrapage = Vec::new();
    for note in notes {
        let marker = note
            .session
            .as_deref()
            .ok_or(NormalizeError::MissingField("session"))?
            .trim()
            .to_ascii_lowercase();
        match marker.as_str() {
            SESSION_NORMAL => normal.push(note),
            SESSION_MAKEUP => rattrapage.push(note),
            _ => return Err(NormalizeError::UnknownSessionMarker(marker)),
        }
    }

    Ok(ExamBucket {
        period_label,
        normal,
        rattrapage,
    })
}

// ========================================
// Tests
// ========================================
