//! Candidate Expander (C5): iteratively loosens an FTS query until enough
//! scored candidates accumulate or the query degenerates.

use crate::index::{FtsIndex, QueryTerm};
use crate::model::RowId;
use crate::scorer::GLOBAL_ACCEPTANCE_FLOOR;
use std::collections::HashMap;

/// Upper bound on truncation-loop iterations.
pub const MAX_ITER: usize = 20;

/// Minimum token length truncation will shrink a token to:
/// `tᵢ' = tᵢ[0 : max(2, len(tᵢ) − s)]`.
const MIN_TOKEN_LEN: usize = 2;

/// Produces scored candidates for `normalized_query` against `index`,
/// looking up each row's token string in `token_column` (indexed by
/// [`RowId`] as `usize`).
///
/// `scope`, if given, is intersected into every FTS lookup (e.g. a
/// country/subdivision scope from the registry). `scorer` computes a
/// candidate's score given the normalized query and its token string; the
/// default is [`crate::scorer::token_coverage_score`].
///
/// Returns every row encountered with its best score seen, including rows
/// below the global acceptance floor — filtering to the floor and ranking
/// to `limit` is the registry's job.
pub fn expand(
    normalized_query: &str,
    index: &FtsIndex,
    token_column: &[String],
    scope: Option<&[RowId]>,
    limit: usize,
    scorer: impl Fn(&str, &str) -> f64,
) -> Vec<(RowId, f64)> {
    let base: Vec<String> = normalized_query
        .split_whitespace()
        .map(str::to_string)
        .collect();

    if base.is_empty() {
        return Vec::new();
    }

    let mut tokens = base.clone();
    let token_count = tokens.len();
    let mut scored: HashMap<RowId, f64> = HashMap::new();

    let mut score_new = |row_ids: Vec<RowId>, scored: &mut HashMap<RowId, f64>| {
        for row_id in row_ids {
            if let std::collections::hash_map::Entry::Vacant(e) = scored.entry(row_id) {
                let tok = token_column
                    .get(row_id as usize)
                    .map(String::as_str)
                    .unwrap_or("");
                e.insert(scorer(normalized_query, tok));
            }
        }
    };

    // Step 2: exact pass.
    let exact_terms: Vec<QueryTerm<'_>> =
        tokens.iter().map(|t| QueryTerm::Exact(t.as_str())).collect();
    let exact_matches = index.query_filtered(&exact_terms, scope);
    score_new(exact_matches, &mut scored);

    let accepted_count = |scored: &HashMap<RowId, f64>| -> usize {
        scored.values().filter(|&&s| s >= GLOBAL_ACCEPTANCE_FLOOR).count()
    };
    let has_exact_score = |scored: &HashMap<RowId, f64>| -> bool {
        scored.values().any(|&s| s >= 1.0)
    };

    // Step 3: stop early if the exact pass alone already satisfies the target.
    if accepted_count(&scored) >= 2 * limit {
        return scored.into_iter().collect();
    }

    // Step 4: truncation loop.
    for s in 1..=MAX_ITER {
        if has_exact_score(&scored) {
            break;
        }

        for (t, original) in tokens.iter_mut().zip(base.iter()) {
            let original_len = original.chars().count();
            let keep = MIN_TOKEN_LEN.max(original_len.saturating_sub(s));
            if original_len > MIN_TOKEN_LEN {
                *t = original.chars().take(keep).collect();
            }
        }

        let total_truncated_len: usize = tokens.iter().map(|t| t.chars().count()).sum();
        let min_useful = token_count.max(MIN_TOKEN_LEN);

        let prefix_terms: Vec<QueryTerm<'_>> =
            tokens.iter().map(|t| QueryTerm::Prefix(t.as_str())).collect();
        let candidates = index.query_filtered(&prefix_terms, scope);
        score_new(candidates, &mut scored);

        if accepted_count(&scored) >= 2 * limit {
            break;
        }
        if total_truncated_len <= min_useful {
            break;
        }
        if has_exact_score(&scored) {
            break;
        }
    }

    scored.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::token_coverage_score;

    fn sample_index_and_tokens() -> (FtsIndex, Vec<String>) {
        let tokens = vec![
            "san francisco us united states".to_string(), // row 0
            "san jose us united states".to_string(),       // row 1
            "san antonio us united states".to_string(),    // row 2
            "oakland us united states".to_string(),        // row 3
        ];
        let index = FtsIndex::build(tokens.iter().enumerate().map(|(i, t)| (i as RowId, t.as_str())));
        (index, tokens)
    }

    #[test]
    fn exact_pass_finds_exact_token_match() {
        let (index, tokens) = sample_index_and_tokens();
        let result = expand("san francisco", &index, &tokens, None, 5, token_coverage_score);
        let row0 = result.iter().find(|(id, _)| *id == 0).unwrap();
        assert!((row0.1 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn typo_recovers_via_truncation_loop() {
        let (index, tokens) = sample_index_and_tokens();
        // "franciso" (missing an 'c') won't exact-match "francisco" but
        // truncation should eventually produce a prefix overlap.
        let result = expand("san franciso", &index, &tokens, None, 5, token_coverage_score);
        let row0 = result.iter().find(|(id, _)| *id == 0);
        assert!(row0.is_some(), "expected row 0 to be found via truncation");
    }

    #[test]
    fn empty_query_returns_no_candidates() {
        let (index, tokens) = sample_index_and_tokens();
        let result = expand("", &index, &tokens, None, 5, token_coverage_score);
        assert!(result.is_empty());
    }

    #[test]
    fn scope_restricts_candidates() {
        let (index, tokens) = sample_index_and_tokens();
        let scope = vec![1, 2, 3];
        let result = expand("san", &index, &tokens, Some(&scope), 5, token_coverage_score);
        assert!(result.iter().all(|(id, _)| *id != 0));
    }
}
