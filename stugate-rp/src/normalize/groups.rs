//! Group/section resolver
//!
//! The upstream returns several affectation records per period, not all of
//! which carry a section. Records without a section are dropped, then the
//! remainder is reduced to one {group, section} pair per distinct period
//! label - the first record for a label wins, in arrival order.
//!
//! A section literally named the generic placeholder "Section" is relabeled
//! "Section 1" so the presentation layer shows a stable name.

use std::collections::BTreeMap;

use super::NormalizeError;
use crate::models::{GroupAssignment, RawGroupRecord};

/// Placeholder section name the upstream emits for single-section periods
const GENERIC_SECTION: &str = "Section";

/// Reduce affectation records to one assignment per period label
pub fn resolve_groups(
    records: Vec<RawGroupRecord>,
) -> Result<BTreeMap<String, GroupAssignment>, NormalizeError> {
    let mut by_period = BTreeMap::new();

    for record in records {
        // Records without a section carry no displayable assignment
        let Some(section) = record.section_label else {
            continue;
        };
        let period = record
            .period_label
            .ok_or(NormalizeError::MissingField("periodLabel"))?;

        by_period.entry(period).or_insert_with(|| GroupAssignment {
            group: record.group_label,
            section: display_section(section),
        });
    }

    Ok(by_period)
}

fn display_section(section: String) -> String {
    if section == GENERIC_SECTION {
        "Section 1".to_string()
    } else {
        section
    }
}

// ========================================
// Tests
// ========================================
