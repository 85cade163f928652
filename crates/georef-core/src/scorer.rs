//! Scorer (C6): turns a normalized query and a candidate's token string
//! into a `[0,1]` score, plus the alternate field-weighted scorer used by
//! Locality search.
//!
//! Per-token similarity is Levenshtein-ratio based, via `strsim`.

/// Per-token acceptance floor `τ`. A query token whose best match against
/// any field token scores below this is dropped from the coverage average
/// entirely (it does not contribute, and does not merely score zero — see
/// [`token_coverage_score`]).
pub const TOKEN_ACCEPTANCE_FLOOR: f64 = 0.60;

/// Global acceptance floor applied by the caller (registry) to the final
/// blended score. Kept here, not in `registry.rs`, so the constant has one
/// home.
pub const GLOBAL_ACCEPTANCE_FLOOR: f64 = 0.35;

/// Normalized similarity ratio between two strings in `[0, 1]`.
fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// Token-coverage scorer — the default scorer for all three entity kinds.
///
/// `query` and `tok` must already be normalized (C1 output); `tok` is the
/// candidate's persisted token string (C2 output).
pub fn token_coverage_score(query: &str, tok: &str) -> f64 {
    let query_tokens: Vec<&str> = query.split_whitespace().collect();
    let field_tokens: Vec<&str> = tok.split_whitespace().collect();

    if query_tokens.is_empty() || field_tokens.is_empty() {
        return 0.0;
    }

    let mut retained = Vec::with_capacity(query_tokens.len());
    for q in &query_tokens {
        let best = field_tokens
            .iter()
            .map(|f| similarity(q, f))
            .fold(0.0_f64, f64::max);
        if best >= TOKEN_ACCEPTANCE_FLOOR {
            retained.push(best);
        }
    }

    if retained.is_empty() {
        return 0.0;
    }

    let avg = retained.iter().sum::<f64>() / query_tokens.len() as f64;
    let coverage = retained.len() as f64 / query_tokens.len() as f64;

    0.7 * avg + 0.3 * coverage
}

/// A field available to the field-weighted scorer, with its contribution
/// weight.
pub struct WeightedField<'a> {
    pub value: &'a str,
    pub weight: f64,
}

/// Minimum per-field similarity to count toward the weighted sum — distinct
/// from the 0.60 per-token floor used by the coverage scorer; the two
/// scorers are never mixed.
pub const FIELD_NOISE_FLOOR: f64 = 0.5;

/// Field-weighted scorer, the alternate scorer used by
/// `LocalityRegistry::search_weighted`. For each field whose similarity to
/// the (unnormalized) query is at least [`FIELD_NOISE_FLOOR`], its score
/// contributes `similarity * weight` to a running sum and its weight to the
/// denominator; the final score is `sum / weights_used` (0 if nothing
/// passed the floor).
pub fn field_weighted_score(query: &str, fields: &[WeightedField<'_>]) -> f64 {
    let mut weighted_sum = 0.0;
    let mut weight_used = 0.0;

    for field in fields {
        if field.value.is_empty() {
            continue;
        }
        let score = similarity(field.value, query);
        if score >= FIELD_NOISE_FLOOR {
            weighted_sum += score * field.weight;
            weight_used += field.weight;
        }
    }

    if weight_used > 0.0 {
        weighted_sum / weight_used
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_scores_one() {
        let score = token_coverage_score("san francisco", "san francisco us united states");
        assert!((score - 1.0).abs() < 1e-9, "expected 1.0, got {score}");
    }

    #[test]
    fn no_hallucination_below_floor_scores_zero() {
        // "zzzzzz" is nowhere near any field token, so nothing is retained.
        let score = token_coverage_score("zzzzzz", "san francisco us united states");
        assert_eq!(score, 0.0);
    }

    #[test]
    fn missing_tokens_cost_score_via_full_query_length_denominator() {
        let full = token_coverage_score("san francisco", "san francisco us united states");
        let partial = token_coverage_score("san someplace", "san francisco us united states");
        assert!(partial < full);
    }

    #[test]
    fn typo_recovers_above_floor() {
        // a single-character transposition typo should still clear the
        // global acceptance floor.
        let score = token_coverage_score("sna francisco", "san francisco us united states");
        assert!(score > GLOBAL_ACCEPTANCE_FLOOR, "score was {score}");
    }

    #[test]
    fn field_weighted_scorer_ignores_low_similarity_fields() {
        let fields = vec![
            WeightedField { value: "Paris", weight: 1.0 },
            WeightedField { value: "Texas", weight: 0.2 },
        ];
        let score = field_weighted_score("paris", &fields);
        assert!(score > 0.9, "score was {score}");
    }

    #[test]
    fn field_weighted_scorer_returns_zero_when_nothing_passes_floor() {
        let fields = vec![WeightedField { value: "Antarctica", weight: 1.0 }];
        let score = field_weighted_score("zzzzzzzzzz", &fields);
        assert_eq!(score, 0.0);
    }
}
