// Text normalization for product names, titles and column headers

use unicode_normalization::UnicodeNormalization;

/// Words kept lowercase by title-casing unless they open the text.
const MINOR_WORDS: &[&str] = &[
    "to", "and", "of", "in", "on", "at", "with", "by", "for", "a", "an", "the",
];

/// Texts containing this marker keep their original casing.
const CASE_LOCK: &str = "FullText";

/// Canonical form used to compare names across the ledger and the catalog.
///
/// Compatibility forms fold under NFKC (full-width letters, ligatures, roman
/// numerals), `eJournal(s)` is dropped, the word `and` becomes `&`,
/// whitespace collapses, and the result is title-cased.
/// Idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    let folded: String = text.trim().nfkc().collect();

    let words: Vec<&str> = folded
        .split_whitespace()
        .filter(|w| !w.eq_ignore_ascii_case("ejournal") && !w.eq_ignore_ascii_case("ejournals"))
        .map(|w| if w.eq_ignore_ascii_case("and") { "&" } else { w })
        .collect();

    let cased = if folded.contains(CASE_LOCK) {
        words.join(" ")
    } else {
        title_case(&words)
    };
    // Lowercasing can emit combining marks out of canonical order.
    cased.nfkc().collect()
}

fn title_case(words: &[&str]) -> String {
    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i > 0 && MINOR_WORDS.contains(&lower.as_str()) {
                lower
            } else {
                capitalize(&lower)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Upper-case the first char only when it maps one-to-one and back (`ß` stays).
fn capitalize(lower: &str) -> String {
    let mut chars = lower.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut upper = first.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) if u.to_lowercase().eq([first]) => {
            std::iter::once(u).chain(chars).collect()
        }
        _ => lower.to_string(),
    }
}
