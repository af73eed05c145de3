//! Projection of resolved annotations onto output rows

use super::types::ResolvedAnnotation;
use eaf2txt_common::OutputRow;
use std::cmp::Ordering;

/// Row order of the converted transcript
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowOrder {
    /// Chronological: by start, end, then parent tiers before subtiers,
    /// then tier id
    #[default]
    Chronological,
    /// Order of appearance in the EAF document
    Document,
}

/// Reduce resolved annotations to output rows in the requested order
pub fn project(resolved: Vec<ResolvedAnnotation>, order: RowOrder) -> Vec<OutputRow> {
    let mut rows: Vec<OutputRow> = resolved.into_iter().map(to_row).collect();
    if order == RowOrder::Chronological {
        // sort_by is stable: rows with equal keys keep document order
        rows.sort_by(chronological);
    }
    rows
}

fn to_row(resolved: ResolvedAnnotation) -> OutputRow {
    let annotation = resolved.annotation;
    OutputRow {
        tier_id: annotation.tier_id,
        participant: annotation.participant,
        start: resolved.start,
        end: resolved.end,
        duration: resolved.duration,
        value: annotation.value,
    }
}

fn chronological(a: &OutputRow, b: &OutputRow) -> Ordering {
    (a.start, a.end, a.is_subtier(), &a.tier_id).cmp(&(b.start, b.end, b.is_subtier(), &b.tier_id))
}
