//! Text normalization (C1).
//!
//! The search engine never compares raw display strings; everything funnels
//! through [`normalize`] first, which folds case, transliterates non-ASCII
//! scripts, strips punctuation, and collapses whitespace.

/// Deterministic folding of any input string to canonical search form.
///
/// 1. lowercase
/// 2. Unicode-to-ASCII transliteration (diacritic folding, non-Latin scripts)
/// 3. strip everything that isn't a letter, digit, or whitespace
/// 4. collapse whitespace runs, trim
///
/// `normalize(normalize(s)) == normalize(s)` for every `s` — the pipeline is
/// idempotent because step 2's output is already ASCII lowercase and steps
/// 3-4 are themselves idempotent.
pub fn normalize(s: &str) -> String {
    let transliterated = deunicode::deunicode(s).to_lowercase();

    let mut out = String::with_capacity(transliterated.len());
    for ch in transliterated.chars() {
        if ch.is_alphanumeric() || ch.is_whitespace() {
            out.push(ch);
        }
    }

    collapse_whitespace(&out)
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_was_space = false;
    for ch in s.trim().chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                out.push(' ');
            }
            prev_was_space = true;
        } else {
            out.push(ch);
            prev_was_space = false;
        }
    }
    out
}

/// `normalize`, under a shorter name for call sites that only need a fast
/// folded key (no idempotence guarantee needed beyond what `normalize`
/// already gives).
#[inline]
pub fn fold_key(s: &str) -> String {
    normalize(s)
}

/// Case/accent-insensitive equality on folded form.
pub fn equals_folded(a: &str, b: &str) -> bool {
    fold_key(a) == fold_key(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_trims() {
        assert_eq!(normalize("  United Stats  "), "united stats");
    }

    #[test]
    fn folds_diacritics() {
        assert_eq!(normalize("Bodří"), "bodri");
        assert_eq!(normalize("Łódź"), "lodz");
        assert_eq!(normalize("Straße"), "strasse");
        assert_eq!(normalize("Côte d'Ivoire"), "cote divoire");
    }

    #[test]
    fn strips_punctuation_keeps_digits() {
        assert_eq!(normalize("US-WI, #1!"), "uswi 1");
    }

    #[test]
    fn collapses_internal_whitespace() {
        assert_eq!(normalize("San   Francisco\t\tBay"), "san francisco bay");
    }

    #[test]
    fn is_idempotent() {
        let samples = ["Bodří", "  San Fran*  ", "北京市", "München"];
        for s in samples {
            let once = normalize(s);
            let twice = normalize(&once);
            assert_eq!(once, twice, "normalize not idempotent for {s:?}");
        }
    }

    #[test]
    fn empty_input_normalizes_to_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }
}
