//! Candidate filtering, ordering and budget capping.

use tracing::{debug, info};

use ragdb_core::types::{CandidateFragment, SelectedFragment};

/// Select the fragments used to ground an answer.
///
/// 1. Discard candidates scoring strictly below `min_score`.
/// 2. Sort by score descending; the sort is stable, so equal scores keep
///    their original input order and selection stays reproducible.
/// 3. Truncate to `max_fragments` (the caller passes an already-clamped
///    value).
/// 4. Walk the ordered list accumulating text lengths against
///    `max_context_chars`. The first fragment is always admitted, even when
///    its own text overshoots the budget; after that, the walk stops at the
///    first fragment that would overflow rather than skipping ahead to a
///    shorter one, so score order always wins over packing efficiency.
/// 5. Ranks are the 1-based positions in the surviving sequence.
///
/// An empty result is not an error; the composer renders a fallback answer.
pub fn select_fragments(
    candidates: Vec<CandidateFragment>,
    min_score: f32,
    max_fragments: usize,
    max_context_chars: usize,
) -> Vec<SelectedFragment> {
    let before = candidates.len();
    let mut filtered: Vec<CandidateFragment> = candidates
        .into_iter()
        .filter(|c| c.score >= min_score)
        .collect();
    filtered.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    debug!(
        before,
        after = filtered.len(),
        min_score,
        "filtered candidates by score"
    );

    let mut total_chars = 0usize;
    let mut selected = Vec::new();
    for fragment in filtered.into_iter().take(max_fragments) {
        let len = fragment.text.chars().count();
        if !selected.is_empty() && total_chars + len > max_context_chars {
            break;
        }
        total_chars += len;
        let rank = selected.len() + 1;
        selected.push(SelectedFragment { fragment, rank });
    }

    info!(
        count = selected.len(),
        total_context_chars = total_chars,
        "selected fragments for context"
    );

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragdb_core::types::Meta;

    fn frag(id: &str, score: f32, text: &str) -> CandidateFragment {
        CandidateFragment {
            id: id.to_string(),
            text: text.to_string(),
            score,
            metadata: Meta::new(),
        }
    }

    #[test]
    fn threshold_then_budget() {
        let candidates = vec![
            frag("a", 0.9, &"A".repeat(50)),
            frag("b", 0.6, &"B".repeat(50)),
            frag("c", 0.2, &"C".repeat(50)),
        ];
        let selected = select_fragments(candidates, 0.5, 5, 120);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].fragment.id, "a");
        assert_eq!(selected[0].rank, 1);
        assert_eq!(selected[1].fragment.id, "b");
        assert_eq!(selected[1].rank, 2);
    }

    #[test]
    fn empty_and_all_below_threshold_yield_empty() {
        assert!(select_fragments(vec![], 0.3, 5, 1000).is_empty());
        let low = vec![frag("a", 0.1, "x"), frag("b", 0.2, "y")];
        assert!(select_fragments(low, 0.3, 5, 1000).is_empty());
    }

    #[test]
    fn scores_non_increasing_and_ranks_contiguous() {
        let candidates = vec![
            frag("low", 0.4, "one"),
            frag("high", 0.95, "two"),
            frag("mid", 0.7, "three"),
        ];
        let selected = select_fragments(candidates, 0.3, 10, 1000);
        assert_eq!(selected.len(), 3);
        for pair in selected.windows(2) {
            assert!(pair[0].fragment.score >= pair[1].fragment.score);
        }
        for (i, s) in selected.iter().enumerate() {
            assert_eq!(s.rank, i + 1);
        }
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let candidates = vec![
            frag("first", 0.8, "a"),
            frag("second", 0.8, "b"),
            frag("third", 0.8, "c"),
        ];
        let selected = select_fragments(candidates, 0.3, 10, 1000);
        let ids: Vec<&str> = selected.iter().map(|s| s.fragment.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn max_fragments_caps_selection() {
        let candidates = (0..10)
            .map(|i| frag(&format!("f{}", i), 0.9 - i as f32 * 0.01, "short"))
            .collect();
        let selected = select_fragments(candidates, 0.3, 3, 10_000);
        assert_eq!(selected.len(), 3);
    }

    #[test]
    fn budget_walk_stops_without_skipping_ahead() {
        // The third fragment would fit the leftover budget, but the walk
        // must stop at the second one that overflows.
        let candidates = vec![
            frag("a", 0.9, &"x".repeat(80)),
            frag("b", 0.8, &"y".repeat(50)),
            frag("c", 0.7, &"z".repeat(10)),
        ];
        let selected = select_fragments(candidates, 0.3, 10, 100);
        let ids: Vec<&str> = selected.iter().map(|s| s.fragment.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn sole_oversized_fragment_is_still_included() {
        let candidates = vec![frag("big", 0.9, &"x".repeat(500))];
        let selected = select_fragments(candidates, 0.3, 5, 100);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].rank, 1);
    }

    #[test]
    fn oversized_leader_blocks_followers() {
        let candidates = vec![
            frag("big", 0.9, &"x".repeat(500)),
            frag("small", 0.8, "y"),
        ];
        let selected = select_fragments(candidates, 0.3, 5, 100);
        let ids: Vec<&str> = selected.iter().map(|s| s.fragment.id.as_str()).collect();
        assert_eq!(ids, vec!["big"]);
    }

    #[test]
    fn empty_text_counts_as_zero_length() {
        let candidates = vec![
            frag("a", 0.9, &"x".repeat(100)),
            frag("b", 0.8, ""),
            frag("c", 0.7, "tail"),
        ];
        let selected = select_fragments(candidates, 0.3, 5, 104);
        assert_eq!(selected.len(), 3);
    }
}
