//! Registry Facade (C7): `get`, `lookup`, and `search` per entity kind,
//! composing C3-C6 and applying entity-specific filters and the Alias
//! Table (C8).
//!
//! The three registries below are configurations over the same shape (load
//! state, store, get/lookup/search), not subclasses of one base class —
//! each is a thin, independent struct sharing the same free functions in
//! `expander`/`scorer`/`alias` instead.

use crate::alias::{resolve_code_alias, resolve_name_alias};
use crate::error::{GeoError, Result};
use crate::expander::expand;
use crate::model::{Country, Locality, OsmType, RowId, Subdivision};
use crate::scorer::{
    field_weighted_score, token_coverage_score, WeightedField, GLOBAL_ACCEPTANCE_FLOOR,
};
use crate::store::{CountryStore, LocalityStore, SubdivisionStore};
use crate::text::normalize;
use std::collections::HashMap;

const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Lifecycle state shared by every registry: a registry is `Unloaded`
/// until its dataset is loaded, at which point the transition is one-way
/// and idempotent for the remainder of the process.
enum LoadState<T> {
    Unloaded,
    Loaded(T),
}

impl<T> LoadState<T> {
    fn get(&self) -> Result<&T> {
        match self {
            LoadState::Loaded(store) => Ok(store),
            LoadState::Unloaded => Err(GeoError::NotLoaded),
        }
    }
}

/// Ranks and truncates `(row_id, score)` pairs: filters to the global
/// acceptance floor, keeps the highest score seen per row-id, sorts by
/// score descending / row-id ascending, and truncates to `limit`.
fn rank_and_limit(scored: Vec<(RowId, f64)>, limit: usize) -> Vec<(RowId, f64)> {
    let mut best: HashMap<RowId, f64> = HashMap::new();
    for (id, score) in scored {
        best.entry(id)
            .and_modify(|existing| {
                if score > *existing {
                    *existing = score;
                }
            })
            .or_insert(score);
    }

    let mut ranked: Vec<(RowId, f64)> =
        best.into_iter().filter(|&(_, score)| score >= GLOBAL_ACCEPTANCE_FLOOR).collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

// ---------------------------------------------------------------------
// Country
// ---------------------------------------------------------------------

/// A single canonical-key argument for `CountryRegistry::get`. Constructing
/// one directly never has an ambiguity problem (an enum already forces
/// exactly one variant); [`CountryKeyRequest`] exists for callers — like a
/// CLI or DTO layer — that collect multiple optional fields from an outer
/// interface and only know at runtime whether more than one was supplied.
#[derive(Debug, Clone, Copy)]
pub enum CountryKey<'a> {
    Alpha2(&'a str),
    Alpha3(&'a str),
    Numeric(u32),
    RowId(RowId),
}

/// A keyword-argument-style request with at most one field expected to be
/// set; validated at [`CountryKeyRequest::resolve`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CountryKeyRequest<'a> {
    pub alpha2: Option<&'a str>,
    pub alpha3: Option<&'a str>,
    pub numeric: Option<u32>,
    pub row_id: Option<RowId>,
}

impl<'a> CountryKeyRequest<'a> {
    pub fn resolve(&self) -> Result<Option<CountryKey<'a>>> {
        let mut set = Vec::with_capacity(1);
        if let Some(v) = self.alpha2 {
            set.push(CountryKey::Alpha2(v));
        }
        if let Some(v) = self.alpha3 {
            set.push(CountryKey::Alpha3(v));
        }
        if let Some(v) = self.numeric {
            set.push(CountryKey::Numeric(v));
        }
        if let Some(v) = self.row_id {
            set.push(CountryKey::RowId(v));
        }
        if set.len() > 1 {
            return Err(GeoError::AmbiguousKey);
        }
        Ok(set.into_iter().next())
    }
}

/// Registry facade over the Country record store.
pub struct CountryRegistry {
    state: LoadState<CountryStore>,
}

impl Default for CountryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CountryRegistry {
    pub fn new() -> Self {
        Self { state: LoadState::Unloaded }
    }

    /// Loads (or replaces) this registry's dataset. Idempotent — calling
    /// again simply rebuilds the derived tables from the new rows.
    pub fn load(&mut self, rows: Vec<Country>) {
        self.state = LoadState::Loaded(CountryStore::build(rows));
    }

    fn store(&self) -> Result<&CountryStore> {
        self.state.get()
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.store()?.len())
    }

    /// Resolves a user-supplied code or display name to a row-id, trying
    /// alpha2, then alpha3, then normalized-name lookup. Used by
    /// Subdivision/Locality registries to resolve a `country` scope
    /// argument.
    pub fn resolve_row_id(&self, code_or_name: &str) -> Result<Option<RowId>> {
        let store = self.store()?;
        if let Some(c) = store.get_by_alpha2(code_or_name) {
            return Ok(Some(c.row_id));
        }
        if let Some(c) = store.get_by_alpha3(code_or_name) {
            return Ok(Some(c.row_id));
        }
        let normalized = normalize(code_or_name);
        Ok(store.rows_by_normalized_name(&normalized).first().map(|c| c.row_id))
    }

    pub fn get_by_row_id(&self, row_id: RowId) -> Result<Option<Country>> {
        Ok(self.store()?.get_by_row_id(row_id).cloned())
    }

    /// Exact retrieval by canonical identifier.
    pub fn get(&self, request: CountryKeyRequest<'_>) -> Result<Option<Country>> {
        let store = self.store()?;
        let key = request.resolve()?;
        Ok(match key {
            None => None,
            Some(CountryKey::Alpha2(v)) => store.get_by_alpha2(v).cloned(),
            Some(CountryKey::Alpha3(v)) => store.get_by_alpha3(v).cloned(),
            Some(CountryKey::Numeric(v)) => store.get_by_numeric(v).cloned(),
            Some(CountryKey::RowId(v)) => store.get_by_row_id(v).cloned(),
        })
    }

    /// Resolves `alias` (a code, e.g. `"uk"`) through the Alias Table (C8)
    /// and fetches the resulting canonical country.
    pub fn by_alias(&self, alias: &str) -> Result<Option<Country>> {
        let canonical = resolve_code_alias(alias);
        self.get(CountryKeyRequest { alpha2: Some(&canonical), ..Default::default() })
    }

    /// Exact lookup by normalized name, consulting the Alias Table first.
    pub fn lookup(&self, name: &str) -> Result<Vec<Country>> {
        if name.trim().is_empty() {
            return Ok(Vec::new());
        }
        let store = self.store()?;
        let normalized = normalize(name);
        let target = resolve_name_alias(&normalized)
            .map(normalize)
            .unwrap_or(normalized);
        Ok(store.rows_by_normalized_name(&target).into_iter().cloned().collect())
    }

    /// Fuzzy search: alias substitution, then expand + score + rank.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<(Country, f64)>> {
        let store = self.store()?;
        let normalized = normalize(query);
        if normalized.is_empty() {
            return Ok(Vec::new());
        }
        let effective_query = resolve_name_alias(&normalized).map(normalize).unwrap_or(normalized);

        let candidates = expand(
            &effective_query,
            store.fts(),
            store.token_column(),
            None,
            limit,
            token_coverage_score,
        );
        let ranked = rank_and_limit(candidates, limit);
        Ok(ranked
            .into_iter()
            .filter_map(|(id, score)| store.get_by_row_id(id).map(|c| (c.clone(), score)))
            .collect())
    }

    pub fn search_default(&self, query: &str) -> Result<Vec<(Country, f64)>> {
        self.search(query, DEFAULT_SEARCH_LIMIT)
    }

    pub fn iter(&self) -> Result<impl Iterator<Item = &Country>> {
        Ok(self.store()?.iter())
    }
}

// ---------------------------------------------------------------------
// Subdivision
// ---------------------------------------------------------------------

pub struct SubdivisionRegistry {
    state: LoadState<SubdivisionStore>,
}

impl Default for SubdivisionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SubdivisionRegistry {
    pub fn new() -> Self {
        Self { state: LoadState::Unloaded }
    }

    pub fn load(&mut self, rows: Vec<Subdivision>) {
        self.state = LoadState::Loaded(SubdivisionStore::build(rows));
    }

    fn store(&self) -> Result<&SubdivisionStore> {
        self.state.get()
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.store()?.len())
    }

    pub fn get(&self, iso_code: &str) -> Result<Option<Subdivision>> {
        Ok(self.store()?.get_by_iso_code(iso_code).cloned())
    }

    /// Exact lookup by normalized name, optionally scoped to a country —
    /// the optional `country` argument narrows the candidate set before
    /// name matching.
    pub fn lookup(
        &self,
        name: &str,
        country: Option<&str>,
        countries: &CountryRegistry,
    ) -> Result<Vec<Subdivision>> {
        if name.trim().is_empty() {
            return Ok(Vec::new());
        }
        let store = self.store()?;
        let normalized = normalize(name);
        let rows = store.rows_by_normalized_name(&normalized);

        match country {
            None => Ok(rows.into_iter().cloned().collect()),
            Some(code) => {
                let country_id = countries.resolve_row_id(code)?;
                Ok(match country_id {
                    None => Vec::new(),
                    Some(id) => rows
                        .into_iter()
                        .filter(|s| s.country_row_id == id)
                        .cloned()
                        .collect(),
                })
            }
        }
    }

    pub fn search(
        &self,
        query: &str,
        limit: usize,
        country: Option<&str>,
        countries: &CountryRegistry,
    ) -> Result<Vec<(Subdivision, f64)>> {
        let store = self.store()?;
        let normalized = normalize(query);
        if normalized.is_empty() {
            return Ok(Vec::new());
        }

        let scope = match country {
            None => None,
            Some(code) => match countries.resolve_row_id(code)? {
                None => return Ok(Vec::new()),
                Some(id) => Some(store.posting_list_for_country(id)),
            },
        };

        let candidates = expand(
            &normalized,
            store.fts(),
            store.token_column(),
            scope.as_deref(),
            limit,
            token_coverage_score,
        );
        let ranked = rank_and_limit(candidates, limit);
        Ok(ranked
            .into_iter()
            .filter_map(|(id, score)| store.get_by_row_id(id).map(|s| (s.clone(), score)))
            .collect())
    }

    /// All subdivisions belonging to `country_code`.
    pub fn by_country(&self, country_code: &str, countries: &CountryRegistry) -> Result<Vec<Subdivision>> {
        let store = self.store()?;
        Ok(match countries.resolve_row_id(country_code)? {
            None => Vec::new(),
            Some(id) => store.rows_for_country(id).into_iter().cloned().collect(),
        })
    }

    /// Distinct `category` values among `country_code`'s subdivisions.
    pub fn categories_for_country(
        &self,
        country_code: &str,
        countries: &CountryRegistry,
    ) -> Result<Vec<String>> {
        let rows = self.by_country(country_code, countries)?;
        let mut seen = Vec::new();
        for row in rows {
            if !seen.contains(&row.category) {
                seen.push(row.category);
            }
        }
        Ok(seen)
    }

    pub fn iter(&self) -> Result<impl Iterator<Item = &Subdivision>> {
        Ok(self.store()?.iter())
    }
}

// ---------------------------------------------------------------------
// Locality
// ---------------------------------------------------------------------

/// `population__lt` / `population__gt` post-filter; mutually exclusive
/// (see [`GeoError::ConflictingFilters`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct PopulationFilter {
    pub lt: Option<u64>,
    pub gt: Option<u64>,
}

impl PopulationFilter {
    pub fn validate(&self) -> Result<()> {
        if self.lt.is_some() && self.gt.is_some() {
            return Err(GeoError::ConflictingFilters);
        }
        Ok(())
    }

    fn matches(&self, population: Option<u64>) -> bool {
        if self.lt.is_none() && self.gt.is_none() {
            return true;
        }
        match population {
            None => false,
            Some(p) => {
                if let Some(lt) = self.lt {
                    if !(p < lt) {
                        return false;
                    }
                }
                if let Some(gt) = self.gt {
                    if !(p > gt) {
                        return false;
                    }
                }
                true
            }
        }
    }

    /// Parses a dynamic keyword-filter surface (`[("population__gt", "1000")]`)
    /// the way a CLI or DTO layer would pass it through — unrecognized keys
    /// raise `UnknownField`, validated eagerly at construction.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Result<Self> {
        let mut filter = Self::default();
        for (key, value) in pairs {
            match *key {
                "population__lt" => {
                    filter.lt = Some(value.parse().map_err(|_| {
                        GeoError::UnknownField(format!("invalid population__lt value: {value}"))
                    })?);
                }
                "population__gt" => {
                    filter.gt = Some(value.parse().map_err(|_| {
                        GeoError::UnknownField(format!("invalid population__gt value: {value}"))
                    })?);
                }
                other => return Err(GeoError::UnknownField(other.to_string())),
            }
        }
        filter.validate()?;
        Ok(filter)
    }
}

pub struct LocalityRegistry {
    state: LoadState<LocalityStore>,
}

impl Default for LocalityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalityRegistry {
    pub fn new() -> Self {
        Self { state: LoadState::Unloaded }
    }

    pub fn load(&mut self, rows: Vec<Locality>) {
        self.state = LoadState::Loaded(LocalityStore::build(rows));
    }

    fn store(&self) -> Result<&LocalityStore> {
        self.state.get()
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.store()?.len())
    }

    /// Exact retrieval by `"<type>:<id>"` external identifier.
    pub fn get(&self, identifier: &str) -> Result<Option<Locality>> {
        let (osm_type, osm_id) = Locality::parse_external_id(identifier)?;
        Ok(self.store()?.get_by_osm_key(osm_type.as_char(), osm_id).cloned())
    }

    pub fn lookup(&self, name: &str) -> Result<Vec<Locality>> {
        if name.trim().is_empty() {
            return Ok(Vec::new());
        }
        let normalized = normalize(name);
        Ok(self.store()?.rows_by_normalized_name(&normalized).into_iter().cloned().collect())
    }

    /// Fuzzy search with the default token-coverage scorer.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<(Locality, f64)>> {
        let store = self.store()?;
        let normalized = normalize(query);
        if normalized.is_empty() {
            return Ok(Vec::new());
        }
        let candidates = expand(
            &normalized,
            store.fts(),
            store.token_column(),
            None,
            limit,
            token_coverage_score,
        );
        let ranked = rank_and_limit(candidates, limit);
        Ok(ranked
            .into_iter()
            .filter_map(|(id, score)| store.get_by_row_id(id).map(|c| (c.clone(), score)))
            .collect())
    }

    /// Fuzzy search with the field-weighted scorer. Candidate generation
    /// still runs through the same expander as [`Self::search`]; only the
    /// final scoring pass differs — the two scorers coexist but are never
    /// mixed within one call.
    pub fn search_weighted(
        &self,
        query: &str,
        limit: usize,
        subdivisions: &SubdivisionRegistry,
        countries: &CountryRegistry,
    ) -> Result<Vec<(Locality, f64)>> {
        let store = self.store()?;
        let normalized = normalize(query);
        if normalized.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = expand(
            &normalized,
            store.fts(),
            store.token_column(),
            None,
            limit,
            token_coverage_score,
        );

        let mut best: HashMap<RowId, f64> = HashMap::new();
        for (id, _) in candidates {
            if best.contains_key(&id) {
                continue;
            }
            let Some(locality) = store.get_by_row_id(id) else { continue };

            let alt_names = locality.other_names.join(" ");
            let admin1 = locality
                .subdivision_row_id
                .and_then(|sid| subdivisions.get_by_row_id_quiet(sid))
                .map(|s| s.name)
                .unwrap_or_default();
            let country_name = countries
                .get_by_row_id(locality.country_row_id)
                .ok()
                .flatten()
                .map(|c| c.name)
                .unwrap_or_default();

            let fields = vec![
                WeightedField { value: &locality.name, weight: 1.0 },
                WeightedField { value: &alt_names, weight: 1.5 },
                WeightedField { value: &admin1, weight: 0.2 },
                WeightedField { value: "", weight: 0.1 }, // admin2: not modeled in this dataset
                WeightedField { value: &country_name, weight: 0.2 },
            ];
            let score = field_weighted_score(query, &fields);
            best.insert(id, score);
        }

        let ranked = rank_and_limit(best.into_iter().collect(), limit);
        Ok(ranked
            .into_iter()
            .filter_map(|(id, score)| store.get_by_row_id(id).map(|c| (c.clone(), score)))
            .collect())
    }

    pub fn for_country(
        &self,
        country_code: &str,
        countries: &CountryRegistry,
        filter: PopulationFilter,
    ) -> Result<Vec<Locality>> {
        filter.validate()?;
        let store = self.store()?;
        Ok(match countries.resolve_row_id(country_code)? {
            None => Vec::new(),
            Some(id) => store
                .rows_for_country(id)
                .into_iter()
                .filter(|loc| filter.matches(loc.population))
                .cloned()
                .collect(),
        })
    }

    pub fn for_subdivision(
        &self,
        iso_code: &str,
        subdivisions: &SubdivisionRegistry,
        filter: PopulationFilter,
    ) -> Result<Vec<Locality>> {
        filter.validate()?;
        let store = self.store()?;
        let Some(subdivision) = subdivisions.get(iso_code)? else {
            return Ok(Vec::new());
        };
        Ok(store
            .rows_for_subdivision(subdivision.row_id)
            .into_iter()
            .filter(|loc| filter.matches(loc.population))
            .cloned()
            .collect())
    }

    pub fn iter(&self) -> Result<impl Iterator<Item = &Locality>> {
        Ok(self.store()?.iter())
    }
}

impl SubdivisionRegistry {
    /// Like [`Self::get`] by row-id, but swallows `NotLoaded` into `None`
    /// for callers (like [`LocalityRegistry::search_weighted`]) that have
    /// already established the registry is loaded by virtue of being asked
    /// to resolve a row-id that came out of it.
    fn get_by_row_id_quiet(&self, row_id: RowId) -> Option<Subdivision> {
        self.store().ok().and_then(|s| s.get_by_row_id(row_id)).cloned()
    }
}

/// Resolve an OSM type/id pair back into `"<t>:<id>"` — convenience for
/// callers building a [`LocalityRegistry::get`] request from structured
/// input rather than a pre-formatted string.
pub fn locality_identifier(osm_type: OsmType, osm_id: u64) -> String {
    format!("{osm_type}:{osm_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::tokenize;

    fn country(row_id: RowId, alpha2: &str, alpha3: &str, numeric: u32, name: &str) -> Country {
        Country {
            row_id,
            alpha2: alpha2.to_string(),
            alpha3: alpha3.to_string(),
            numeric,
            name: name.to_string(),
            long_name: None,
            aliases: vec![],
            flag: None,
            normalized_name: normalize(name),
            tokens: tokenize(&[name, alpha2, alpha3]),
        }
    }

    fn sample_countries() -> CountryRegistry {
        let mut reg = CountryRegistry::new();
        reg.load(vec![
            country(0, "GB", "GBR", 826, "United Kingdom"),
            country(1, "US", "USA", 840, "United States"),
            country(2, "CG", "COG", 178, "Congo"),
            country(3, "CD", "COD", 180, "Congo"),
        ]);
        reg
    }

    #[test]
    fn not_loaded_raises_not_loaded() {
        let reg = CountryRegistry::new();
        assert!(matches!(reg.len(), Err(GeoError::NotLoaded)));
    }

    #[test]
    fn get_by_uk_alias_resolves_to_gb() {
        let reg = sample_countries();
        let c = reg.by_alias("uk").unwrap().unwrap();
        assert_eq!(c.alpha2, "GB");
    }

    #[test]
    fn get_by_unknown_alpha3_is_none() {
        let reg = sample_countries();
        assert!(reg.get(CountryKeyRequest { alpha3: Some("ZZZ"), ..Default::default() }).unwrap().is_none());
    }

    #[test]
    fn get_with_two_keys_is_ambiguous() {
        let reg = sample_countries();
        let request = CountryKeyRequest { alpha2: Some("US"), alpha3: Some("USA"), ..Default::default() };
        assert!(matches!(reg.get(request), Err(GeoError::AmbiguousKey)));
    }

    #[test]
    fn lookup_congo_returns_both_rows() {
        let reg = sample_countries();
        let rows = reg.lookup("Congo").unwrap();
        assert_eq!(rows.len(), 2);
        let alpha2s: std::collections::HashSet<_> = rows.iter().map(|c| c.alpha2.clone()).collect();
        assert_eq!(alpha2s, std::collections::HashSet::from(["CG".to_string(), "CD".to_string()]));
    }

    #[test]
    fn search_united_stats_finds_us_first() {
        let reg = sample_countries();
        let results = reg.search("   united stats  ", 5).unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].0.alpha2, "US");
        assert!(results[0].1 > 0.60);
    }

    #[test]
    fn population_filter_rejects_both_lt_and_gt() {
        let filter = PopulationFilter { lt: Some(1), gt: Some(2) };
        assert!(matches!(filter.validate(), Err(GeoError::ConflictingFilters)));
    }

    #[test]
    fn population_filter_from_pairs_rejects_unknown_field() {
        let err = PopulationFilter::from_pairs(&[("bogus", "1")]).unwrap_err();
        assert!(matches!(err, GeoError::UnknownField(_)));
    }
}
