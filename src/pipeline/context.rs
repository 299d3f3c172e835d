use crate::models::{AssembledContext, ExtractedDocument};

/// Separator between pages and between documents, so boundaries stay
/// human-legible in the assembled text.
pub const SEPARATOR: &str = "\n\n";

/// When the budget cuts mid-text, prefer the nearest separator at most this
/// many bytes behind the cut point.
const TRUNCATION_LOOKBACK: usize = 256;

/// Concatenate the page texts of all documents, in supplied order, into a
/// single context bounded by `max_chars` characters.
///
/// Pages that yielded no text are skipped rather than joined as blank
/// separator runs. An empty input produces an empty context of length 0;
/// whether that is an error is the caller's decision.
pub fn assemble(documents: &[ExtractedDocument], max_chars: usize) -> AssembledContext {
    let pieces: Vec<&str> = documents
        .iter()
        .flat_map(|doc| doc.pages.iter())
        .map(|page| page.as_str())
        .filter(|page| !page.is_empty())
        .collect();

    let (text, length) = truncate_to_chars(pieces.join(SEPARATOR), max_chars);
    AssembledContext { text, length }
}

/// Truncate to at most `max_chars` characters, dropping trailing content.
///
/// Counting is in characters, not bytes, so a cut never splits a code
/// point. This is a character-budget heuristic for the backend's input
/// limit, not a token-exact guarantee.
fn truncate_to_chars(text: String, max_chars: usize) -> (String, usize) {
    let total_chars = text.chars().count();
    if total_chars <= max_chars {
        return (text, total_chars);
    }

    let budget_end = text
        .char_indices()
        .nth(max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or_else(|| text.len());

    let cut = match text[..budget_end].rfind(SEPARATOR) {
        Some(sep) if budget_end - sep <= TRUNCATION_LOOKBACK => sep,
        _ => budget_end,
    };

    let truncated = text[..cut].trim_end().to_string();
    let length = truncated.chars().count();
    (truncated, length)
}
