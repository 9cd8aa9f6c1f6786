//! Timetable grid builder
//!
//! Turns the upstream's flat schedule-entry list into a grid: one row per
//! distinct time slot (sorted by label), six fixed day columns
//! (Saturday-first week). A cell aggregates every entry for its (day, slot)
//! pair - parallel sessions share a cell, and cells with no entries are
//! present but empty.

use std::collections::BTreeMap;

use super::NormalizeError;
use crate::models::{RawScheduleEntry, TimetableEntry, TimetableGrid, TimetableRow};

/// Days per academic week, index 0 = Saturday through 5 = Thursday
pub const DAYS_PER_WEEK: usize = 6;

/// Build the weekly grid from a flat entry list
pub fn build_grid(entries: Vec<RawScheduleEntry>) -> Result<TimetableGrid, NormalizeError> {
    // BTreeMap keeps the rows sorted by slot label
    let mut rows: BTreeMap<String, Vec<Vec<TimetableEntry>>> = BTreeMap::new();

    for entry in entries {
        let day = entry.day.ok_or(NormalizeError::MissingField("day"))?;
        if !(0..DAYS_PER_WEEK as i64).contains(&day) {
            return Err(NormalizeError::DayOutOfRange(day));
        }

        let slot = entry
            .slot_label
            .ok_or(NormalizeError::MissingField("slotLabel"))?;
        let course_label = entry
            .course_label
            .ok_or(NormalizeError::MissingField("courseLabel"))?;

        let cells = rows
            .entry(slot)
            .or_insert_with(|| vec![Vec::new(); DAYS_PER_WEEK]);
        cells[day as usize].push(TimetableEntry {
            course_label,
            group_label: entry.group_label,
        });
    }

    Ok(TimetableGrid {
        rows: rows
            .into_iter()
            .map(|(slot_label, days)| TimetableRow { slot_label, days })
            .collect(),
    })
}

// ========================================
// Tests
// ========================================
