//! Projection of selected fragments into externally visible source records.

use ragdb_core::types::{SelectedFragment, SourceRecord};

/// Map each selected fragment to a `SourceRecord` in rank order.
///
/// Pure projection: no filtering, no reordering. `citation_id` equals the
/// fragment's rank, which is what ties the answer's `[n]` markers to the
/// returned list.
pub fn format_sources(selected: &[SelectedFragment]) -> Vec<SourceRecord> {
    selected
        .iter()
        .map(|s| SourceRecord {
            id: s.fragment.id.clone(),
            citation_id: s.rank,
            score: s.fragment.score,
            source: s.fragment.source_name().map(str::to_string),
            rank: s.rank,
            text: s.fragment.text.clone(),
            metadata: s.fragment.metadata.clone(),
        })
        .collect()
}
