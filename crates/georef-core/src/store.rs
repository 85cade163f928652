//! Record Store (C3): in-memory immutable tables of Country/Subdivision/
//! Locality rows, accessed by row-id and by secondary keys, plus the
//! derived tables built once at load.

use crate::index::FtsIndex;
use crate::model::{Country, Locality, RowId, Subdivision};
use std::collections::HashMap;

/// Shared derived-table bookkeeping: normalized-name multimap, FTS index,
/// and the token column the scorer consumes. Built once from a row's
/// `(row_id, normalized_name, tokens)` and immutable after that.
struct DerivedTables {
    by_normalized_name: HashMap<String, Vec<RowId>>,
    fts: FtsIndex,
    token_column: Vec<String>,
}

impl DerivedTables {
    fn build<'a>(rows: impl Iterator<Item = (RowId, &'a str, &'a str)> + Clone) -> Self {
        let mut by_normalized_name: HashMap<String, Vec<RowId>> = HashMap::new();
        let mut max_row_id = 0u32;
        for (row_id, normalized_name, _) in rows.clone() {
            by_normalized_name
                .entry(normalized_name.to_string())
                .or_default()
                .push(row_id);
            max_row_id = max_row_id.max(row_id);
        }

        let mut token_column = vec![String::new(); max_row_id as usize + 1];
        for (row_id, _, tokens) in rows.clone() {
            token_column[row_id as usize] = tokens.to_string();
        }

        let fts = FtsIndex::build(rows.map(|(id, _, tokens)| (id, tokens)));

        Self { by_normalized_name, fts, token_column }
    }
}

/// In-memory table of all Country rows plus their derived indexes.
pub struct CountryStore {
    rows: Vec<Country>,
    by_alpha2: HashMap<String, RowId>,
    by_alpha3: HashMap<String, RowId>,
    by_numeric: HashMap<u32, RowId>,
    derived: DerivedTables,
}

impl CountryStore {
    pub fn build(rows: Vec<Country>) -> Self {
        let mut by_alpha2 = HashMap::new();
        let mut by_alpha3 = HashMap::new();
        let mut by_numeric = HashMap::new();
        for row in &rows {
            by_alpha2.insert(row.alpha2.to_ascii_uppercase(), row.row_id);
            by_alpha3.insert(row.alpha3.to_ascii_uppercase(), row.row_id);
            by_numeric.insert(row.numeric, row.row_id);
        }

        let derived = DerivedTables::build(
            rows.iter()
                .map(|r| (r.row_id, r.normalized_name.as_str(), r.tokens.as_str())),
        );

        Self { rows, by_alpha2, by_alpha3, by_numeric, derived }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get_by_row_id(&self, row_id: RowId) -> Option<&Country> {
        self.rows.get(row_id as usize)
    }

    pub fn get_by_alpha2(&self, alpha2: &str) -> Option<&Country> {
        self.by_alpha2
            .get(&alpha2.to_ascii_uppercase())
            .and_then(|&id| self.get_by_row_id(id))
    }

    pub fn get_by_alpha3(&self, alpha3: &str) -> Option<&Country> {
        self.by_alpha3
            .get(&alpha3.to_ascii_uppercase())
            .and_then(|&id| self.get_by_row_id(id))
    }

    pub fn get_by_numeric(&self, numeric: u32) -> Option<&Country> {
        self.by_numeric.get(&numeric).and_then(|&id| self.get_by_row_id(id))
    }

    pub fn rows_by_normalized_name(&self, normalized_name: &str) -> Vec<&Country> {
        self.derived
            .by_normalized_name
            .get(normalized_name)
            .map(|ids| ids.iter().filter_map(|&id| self.get_by_row_id(id)).collect())
            .unwrap_or_default()
    }

    pub fn fts(&self) -> &FtsIndex {
        &self.derived.fts
    }

    pub fn token_column(&self) -> &[String] {
        &self.derived.token_column
    }

    pub fn iter(&self) -> impl Iterator<Item = &Country> {
        self.rows.iter()
    }
}

/// In-memory table of all Subdivision rows plus their derived indexes.
pub struct SubdivisionStore {
    rows: Vec<Subdivision>,
    by_iso_code: HashMap<String, RowId>,
    by_country: HashMap<RowId, Vec<RowId>>,
    derived: DerivedTables,
}

impl SubdivisionStore {
    pub fn build(rows: Vec<Subdivision>) -> Self {
        let mut by_iso_code = HashMap::new();
        let mut by_country: HashMap<RowId, Vec<RowId>> = HashMap::new();
        for row in &rows {
            by_iso_code.insert(row.iso_code.to_ascii_uppercase(), row.row_id);
            by_country.entry(row.country_row_id).or_default().push(row.row_id);
        }

        let derived = DerivedTables::build(
            rows.iter()
                .map(|r| (r.row_id, r.normalized_name.as_str(), r.tokens.as_str())),
        );

        Self { rows, by_iso_code, by_country, derived }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get_by_row_id(&self, row_id: RowId) -> Option<&Subdivision> {
        self.rows.get(row_id as usize)
    }

    pub fn get_by_iso_code(&self, iso_code: &str) -> Option<&Subdivision> {
        self.by_iso_code
            .get(&iso_code.to_ascii_uppercase())
            .and_then(|&id| self.get_by_row_id(id))
    }

    pub fn rows_by_normalized_name(&self, normalized_name: &str) -> Vec<&Subdivision> {
        self.derived
            .by_normalized_name
            .get(normalized_name)
            .map(|ids| ids.iter().filter_map(|&id| self.get_by_row_id(id)).collect())
            .unwrap_or_default()
    }

    /// Row-ids of every subdivision belonging to `country_row_id`, in
    /// row-id order — the secondary-key posting list used as a filter
    /// scope for country-scoped search.
    pub fn posting_list_for_country(&self, country_row_id: RowId) -> Vec<RowId> {
        let mut ids = self.by_country.get(&country_row_id).cloned().unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    pub fn rows_for_country(&self, country_row_id: RowId) -> Vec<&Subdivision> {
        self.posting_list_for_country(country_row_id)
            .into_iter()
            .filter_map(|id| self.get_by_row_id(id))
            .collect()
    }

    pub fn fts(&self) -> &FtsIndex {
        &self.derived.fts
    }

    pub fn token_column(&self) -> &[String] {
        &self.derived.token_column
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subdivision> {
        self.rows.iter()
    }
}

/// In-memory table of all Locality rows plus their derived indexes.
pub struct LocalityStore {
    rows: Vec<Locality>,
    by_osm_key: HashMap<(char, u64), RowId>,
    by_country: HashMap<RowId, Vec<RowId>>,
    by_subdivision: HashMap<RowId, Vec<RowId>>,
    derived: DerivedTables,
}

impl LocalityStore {
    pub fn build(rows: Vec<Locality>) -> Self {
        let mut by_osm_key = HashMap::new();
        let mut by_country: HashMap<RowId, Vec<RowId>> = HashMap::new();
        let mut by_subdivision: HashMap<RowId, Vec<RowId>> = HashMap::new();
        for row in &rows {
            by_osm_key.insert((row.osm_type.as_char(), row.osm_id), row.row_id);
            by_country.entry(row.country_row_id).or_default().push(row.row_id);
            if let Some(sub_id) = row.subdivision_row_id {
                by_subdivision.entry(sub_id).or_default().push(row.row_id);
            }
        }

        let derived = DerivedTables::build(
            rows.iter()
                .map(|r| (r.row_id, r.normalized_name.as_str(), r.tokens.as_str())),
        );

        Self { rows, by_osm_key, by_country, by_subdivision, derived }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get_by_row_id(&self, row_id: RowId) -> Option<&Locality> {
        self.rows.get(row_id as usize)
    }

    pub fn get_by_osm_key(&self, osm_type: char, osm_id: u64) -> Option<&Locality> {
        self.by_osm_key.get(&(osm_type, osm_id)).and_then(|&id| self.get_by_row_id(id))
    }

    pub fn rows_by_normalized_name(&self, normalized_name: &str) -> Vec<&Locality> {
        self.derived
            .by_normalized_name
            .get(normalized_name)
            .map(|ids| ids.iter().filter_map(|&id| self.get_by_row_id(id)).collect())
            .unwrap_or_default()
    }

    pub fn posting_list_for_country(&self, country_row_id: RowId) -> Vec<RowId> {
        let mut ids = self.by_country.get(&country_row_id).cloned().unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    pub fn posting_list_for_subdivision(&self, subdivision_row_id: RowId) -> Vec<RowId> {
        let mut ids = self.by_subdivision.get(&subdivision_row_id).cloned().unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    pub fn rows_for_country(&self, country_row_id: RowId) -> Vec<&Locality> {
        self.posting_list_for_country(country_row_id)
            .into_iter()
            .filter_map(|id| self.get_by_row_id(id))
            .collect()
    }

    pub fn rows_for_subdivision(&self, subdivision_row_id: RowId) -> Vec<&Locality> {
        self.posting_list_for_subdivision(subdivision_row_id)
            .into_iter()
            .filter_map(|id| self.get_by_row_id(id))
            .collect()
    }

    pub fn fts(&self) -> &FtsIndex {
        &self.derived.fts
    }

    pub fn token_column(&self) -> &[String] {
        &self.derived.token_column
    }

    pub fn iter(&self) -> impl Iterator<Item = &Locality> {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_country(row_id: RowId, alpha2: &str, name: &str) -> Country {
        Country {
            row_id,
            alpha2: alpha2.to_string(),
            alpha3: format!("{alpha2}X"),
            numeric: row_id + 1,
            name: name.to_string(),
            long_name: None,
            aliases: vec![],
            flag: None,
            normalized_name: crate::text::normalize(name),
            tokens: crate::tokenize::tokenize(&[name, alpha2]),
        }
    }

    #[test]
    fn get_by_secondary_keys_is_case_insensitive() {
        let store = CountryStore::build(vec![sample_country(0, "us", "United States")]);
        assert!(store.get_by_alpha2("US").is_some());
        assert!(store.get_by_alpha2("us").is_some());
        assert!(store.get_by_alpha3("usx").is_some());
        assert!(store.get_by_numeric(1).is_some());
        assert!(store.get_by_alpha2("zz").is_none());
    }

    #[test]
    fn row_ids_iterate_in_stable_order() {
        let store = CountryStore::build(vec![
            sample_country(0, "us", "United States"),
            sample_country(1, "de", "Germany"),
        ]);
        let ids: Vec<RowId> = store.iter().map(|c| c.row_id).collect();
        assert_eq!(ids, vec![0, 1]);
    }
}
