//! Full-Text Index (C4): token → sorted posting list of row-ids.
//!
//! One instance per entity kind. Conceptually a `HashMap<String, Vec<RowId>>`
//! with conjunctive-query and prefix-match semantics.

use crate::model::RowId;
use std::collections::HashMap;

/// A single term in a conjunctive FTS query: either exact, or a prefix
/// (a term with a trailing `*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryTerm<'a> {
    Exact(&'a str),
    Prefix(&'a str),
}

impl<'a> QueryTerm<'a> {
    /// Parses `"fran*"` as a prefix term, `"san"` as an exact term.
    pub fn parse(raw: &'a str) -> Self {
        match raw.strip_suffix('*') {
            Some(prefix) => QueryTerm::Prefix(prefix),
            None => QueryTerm::Exact(raw),
        }
    }
}

/// token → sorted, deduplicated posting list of row-ids.
#[derive(Debug, Default)]
pub struct FtsIndex {
    postings: HashMap<String, Vec<RowId>>,
}

impl FtsIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from `(row_id, token_string)` pairs. `token_string`
    /// is the space-joined, already-normalized token list for each row
    /// (C2's output).
    pub fn build<'a>(rows: impl Iterator<Item = (RowId, &'a str)>) -> Self {
        let mut postings: HashMap<String, Vec<RowId>> = HashMap::new();
        for (row_id, tokens) in rows {
            for token in tokens.split_whitespace() {
                postings.entry(token.to_string()).or_default().push(row_id);
            }
        }
        for list in postings.values_mut() {
            list.sort_unstable();
            list.dedup();
        }
        Self { postings }
    }

    /// Exact-match posting list for a single token. Unknown token yields
    /// an empty slice (no hard failure).
    pub fn match_exact(&self, token: &str) -> &[RowId] {
        self.postings.get(token).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Union of postings for every indexed token starting with `prefix`,
    /// deduplicated and returned in row-id order.
    pub fn match_prefix(&self, prefix: &str) -> Vec<RowId> {
        if prefix.is_empty() {
            return Vec::new();
        }
        let mut out: Vec<RowId> = self
            .postings
            .iter()
            .filter(|(token, _)| token.starts_with(prefix))
            .flat_map(|(_, postings)| postings.iter().copied())
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    fn resolve_term(&self, term: QueryTerm<'_>) -> Vec<RowId> {
        match term {
            QueryTerm::Exact(t) => self.match_exact(t).to_vec(),
            QueryTerm::Prefix(p) => self.match_prefix(p),
        }
    }

    /// Conjunctive query: intersection of per-term posting sets. An empty
    /// term list yields an empty result.
    pub fn query(&self, terms: &[QueryTerm<'_>]) -> Vec<RowId> {
        self.query_filtered(terms, None)
    }

    /// Same as [`query`](Self::query), but additionally intersects with a
    /// caller-supplied scope (e.g. a secondary-key posting list for a
    /// `country_alpha2 = "US"` filter).
    pub fn query_filtered(&self, terms: &[QueryTerm<'_>], scope: Option<&[RowId]>) -> Vec<RowId> {
        if terms.is_empty() {
            return Vec::new();
        }

        let mut result: Option<Vec<RowId>> = None;
        for term in terms {
            let postings = self.resolve_term(*term);
            result = Some(match result {
                None => postings,
                Some(acc) => intersect_sorted(&acc, &postings),
            });
            if result.as_ref().is_some_and(|r| r.is_empty()) {
                return Vec::new();
            }
        }

        let mut result = result.unwrap_or_default();
        if let Some(scope) = scope {
            result = intersect_sorted(&result, scope);
        }
        result
    }
}

/// Intersects two already-sorted, deduplicated slices.
pub fn intersect_sorted(a: &[RowId], b: &[RowId]) -> Vec<RowId> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// Orders `row_ids` by a caller-supplied descending key, falling back to
/// ascending row-id on ties, then truncates to `limit` — truncation happens
/// *after* sorting, never before.
pub fn order_and_limit<K: Ord>(
    mut row_ids: Vec<RowId>,
    limit: Option<usize>,
    key_desc: impl Fn(RowId) -> K,
) -> Vec<RowId> {
    row_ids.sort_by(|&a, &b| key_desc(b).cmp(&key_desc(a)).then(a.cmp(&b)));
    if let Some(limit) = limit {
        row_ids.truncate(limit);
    }
    row_ids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build() -> FtsIndex {
        FtsIndex::build(
            vec![
                (1, "san francisco us united states"),
                (2, "san jose us united states"),
                (3, "san antonio us united states"),
                (4, "franklin us united states"),
            ]
            .into_iter(),
        )
    }

    #[test]
    fn exact_term_matches_whole_token_only() {
        let idx = build();
        let mut hits = idx.match_exact("san").to_vec();
        hits.sort_unstable();
        assert_eq!(hits, vec![1, 2, 3]);
    }

    #[test]
    fn prefix_term_matches_token_starting_with_prefix() {
        let idx = build();
        let mut hits = idx.match_prefix("fran");
        hits.sort_unstable();
        assert_eq!(hits, vec![1, 4]);
    }

    #[test]
    fn conjunctive_query_intersects_terms() {
        let idx = build();
        let terms = vec![QueryTerm::Exact("san"), QueryTerm::Prefix("fran")];
        assert_eq!(idx.query(&terms), vec![1]);
    }

    #[test]
    fn empty_query_returns_empty() {
        let idx = build();
        assert!(idx.query(&[]).is_empty());
    }

    #[test]
    fn unknown_token_yields_empty_posting_not_error() {
        let idx = build();
        assert!(idx.match_exact("nonexistent").is_empty());
    }

    #[test]
    fn filter_scope_intersects_result() {
        let idx = build();
        let terms = vec![QueryTerm::Exact("san")];
        let scope = vec![2, 3, 99];
        assert_eq!(idx.query_filtered(&terms, Some(&scope)), vec![2, 3]);
    }

    #[test]
    fn order_and_limit_truncates_after_sort() {
        let ids = vec![1, 2, 3, 4];
        // order by population descending, with 2 having the highest "population"
        let pop = |id: RowId| -> u32 {
            match id {
                2 => 100,
                4 => 50,
                1 => 10,
                3 => 1,
                _ => 0,
            }
        };
        let ordered = order_and_limit(ids, Some(2), pop);
        assert_eq!(ordered, vec![2, 4]);
    }
}
