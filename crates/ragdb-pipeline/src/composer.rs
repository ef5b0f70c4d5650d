//! Deterministic, template-based answer text.
//!
//! No model call: the answer echoes the question, adds a fixed guidance
//! block, and lists the selected fragments under `Sources:` with bracketed
//! indices that equal each fragment's rank. Identical inputs always produce
//! byte-identical output.

use ragdb_core::types::SelectedFragment;

const SNIPPET_WIDTH: usize = 260;

pub const NO_CONTEXT_ANSWER: &str = "I could not find any relevant content in the \
knowledge base to answer this question. If the topic is important, please consider \
adding documentation about it to the corpus.";

/// Build the answer string for a question and its selected fragments.
///
/// Empty selection yields the fixed fallback with no Sources section.
pub fn compose_answer(question: &str, selected: &[SelectedFragment]) -> String {
    if selected.is_empty() {
        return NO_CONTEXT_ANSWER.to_string();
    }

    let mut summary_lines = Vec::with_capacity(selected.len());
    for s in selected {
        let snippet = shorten(&s.fragment.text, SNIPPET_WIDTH);
        let mut prefix = format!("[{}]", s.rank);
        if let Some(source) = s.fragment.source_name() {
            prefix.push_str(&format!(" ({})", source));
        }
        summary_lines.push(format!("{} {}", prefix, snippet));
    }

    let mut sections: Vec<String> = vec![
        format!("Question: {}", question),
        String::new(),
        "Based on the retrieved knowledge base content, here is a synthesized answer:".to_string(),
        String::new(),
        "The fragments listed below were the highest-scoring matches for this \
question, filtered against the minimum similarity threshold and trimmed to the \
configured context budget. Together they are the grounding context an answer \
should draw on; anything not covered by them is outside what the knowledge \
base currently documents."
            .to_string(),
        String::new(),
        "Each numbered reference corresponds to a specific fragment retrieved \
from the knowledge base and used as context. Use these citations to audit or \
refine the underlying documentation."
            .to_string(),
        String::new(),
        "Sources:".to_string(),
    ];
    sections.push(summary_lines.join("\n"));

    sections.join("\n")
}

/// Collapse whitespace (including newlines) and truncate on a word boundary
/// to at most `width` characters, appending `...` when truncated.
fn shorten(text: &str, width: usize) -> String {
    let collapsed: Vec<&str> = text.split_whitespace().collect();
    let joined = collapsed.join(" ");
    if joined.chars().count() <= width {
        return joined;
    }

    let placeholder = "...";
    let budget = width.saturating_sub(placeholder.len() + 1);
    let mut out = String::new();
    for word in &collapsed {
        let needed = if out.is_empty() {
            word.chars().count()
        } else {
            word.chars().count() + 1
        };
        if out.chars().count() + needed > budget {
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    // A first word longer than the whole budget leaves nothing to show on a
    // word boundary; fall back to a character cut of it.
    if out.is_empty() {
        out = joined.chars().take(budget).collect();
    }
    out.push(' ');
    out.push_str(placeholder);
    out
}
