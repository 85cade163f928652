//! Subdivision ingest (CSV).

use crate::model::{Country, Subdivision};
use crate::text::normalize;
use crate::tokenize::tokenize;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct SubdivisionRecord {
    #[serde(rename = "subdivision_code_iso3166-2")]
    iso_code: String,
    subdivision_name: String,
    category: String,
    #[serde(default, rename = "localVariant")]
    local_variant: Option<String>,
    #[serde(default)]
    parent_subdivision: Option<String>,
    country_code_alpha2: String,
}

/// Parses a Subdivision CSV, resolving each row's country against
/// `countries` (by alpha2) and its `parent_subdivision` against sibling
/// rows once every row-id in this file is known.
pub fn load_subdivisions<R: Read>(
    reader: R,
    countries: &[Country],
) -> crate::error::Result<Vec<Subdivision>> {
    let country_by_alpha2: HashMap<&str, u32> =
        countries.iter().map(|c| (c.alpha2.as_str(), c.row_id)).collect();

    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut pending = Vec::new();
    let mut seen_iso = HashSet::new();

    for result in rdr.deserialize::<SubdivisionRecord>() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "dropping malformed subdivision row");
                continue;
            }
        };

        let iso_code = record.iso_code.trim().to_ascii_uppercase();
        let name = record.subdivision_name.trim().to_string();
        if iso_code.is_empty() || name.is_empty() {
            warn!(iso_code = %iso_code, "dropping subdivision row with a missing mandatory field");
            continue;
        }
        if !seen_iso.insert(iso_code.clone()) {
            warn!(iso_code = %iso_code, "dropping duplicate subdivision row");
            continue;
        }

        let Some(&country_row_id) =
            country_by_alpha2.get(record.country_code_alpha2.trim().to_ascii_uppercase().as_str())
        else {
            warn!(iso_code = %iso_code, country = %record.country_code_alpha2, "dropping subdivision row for unknown country");
            continue;
        };

        pending.push((iso_code, name, record, country_row_id));
    }

    let iso_to_row_id: HashMap<String, u32> = pending
        .iter()
        .enumerate()
        .map(|(i, (iso_code, ..))| (iso_code.clone(), i as u32))
        .collect();

    let parent_row_id: Vec<Option<u32>> = pending
        .iter()
        .map(|(_, _, record, _)| {
            record
                .parent_subdivision
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .and_then(|code| iso_to_row_id.get(&code.to_ascii_uppercase()).copied())
        })
        .collect();
    let admin_level = resolve_admin_levels(&parent_row_id);

    let mut out = Vec::with_capacity(pending.len());
    for (row_id, (iso_code, name, record, country_row_id)) in pending.into_iter().enumerate() {
        let local_code = iso_code
            .rsplit('-')
            .next()
            .unwrap_or(&iso_code)
            .to_ascii_uppercase();
        let alt_name = record
            .local_variant
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let tokens = tokenize(&[&name, alt_name.as_deref().unwrap_or(""), &iso_code, &local_code]);

        out.push(Subdivision {
            row_id: row_id as u32,
            normalized_name: normalize(&name),
            iso_code,
            local_code,
            name,
            alt_name,
            category: record.category.trim().to_string(),
            admin_level: admin_level[row_id],
            parent_row_id: parent_row_id[row_id],
            country_row_id,
            tokens,
        });
    }

    debug!(count = out.len(), "loaded subdivisions");
    Ok(out)
}

/// Derives each row's `admin_level` by walking its resolved parent chain:
/// a root (no parent) is level 1, otherwise `1 + parent's level`. Handles
/// chains of any depth, not just the direct-parent case. A cycle (malformed
/// input resolving a row as its own ancestor) is broken by treating the
/// first row revisited mid-walk as a root, logged via `warn!`.
fn resolve_admin_levels(parent_row_id: &[Option<u32>]) -> Vec<u32> {
    let mut level = vec![0u32; parent_row_id.len()];
    let mut resolved = vec![false; parent_row_id.len()];
    let mut visiting = vec![false; parent_row_id.len()];

    fn walk(
        row: usize,
        parent_row_id: &[Option<u32>],
        level: &mut [u32],
        resolved: &mut [bool],
        visiting: &mut [bool],
    ) -> u32 {
        if resolved[row] {
            return level[row];
        }
        if visiting[row] {
            warn!(row, "subdivision parent chain cycles back on itself; treating as a root");
            level[row] = 1;
            resolved[row] = true;
            return 1;
        }

        visiting[row] = true;
        let lvl = match parent_row_id[row] {
            None => 1,
            Some(parent) => 1 + walk(parent as usize, parent_row_id, level, resolved, visiting),
        };
        visiting[row] = false;
        level[row] = lvl;
        resolved[row] = true;
        lvl
    }

    for row in 0..parent_row_id.len() {
        walk(row, parent_row_id, &mut level, &mut resolved, &mut visiting);
    }
    level
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::tokenize as row_tokens;

    fn sample_country(row_id: u32, alpha2: &str) -> Country {
        Country {
            row_id,
            alpha2: alpha2.to_string(),
            alpha3: format!("{alpha2}X"),
            numeric: row_id + 1,
            name: alpha2.to_string(),
            long_name: None,
            aliases: vec![],
            flag: None,
            normalized_name: normalize(alpha2),
            tokens: row_tokens(&[alpha2]),
        }
    }

    #[test]
    fn resolves_country_and_parent() {
        let countries = vec![sample_country(0, "US")];
        let csv = "subdivision_code_iso3166-2,subdivision_name,category,localVariant,parent_subdivision,country_code_alpha2\n\
US-WI,Wisconsin,state,,,US\n\
US-WI-MKE,Milwaukee County,county,,US-WI,US\n";
        let rows = load_subdivisions(csv.as_bytes(), &countries).unwrap();
        assert_eq!(rows.len(), 2);
        let county = rows.iter().find(|r| r.iso_code == "US-WI-MKE").unwrap();
        let state = rows.iter().find(|r| r.iso_code == "US-WI").unwrap();
        assert_eq!(county.parent_row_id, Some(state.row_id));
        assert_eq!(county.admin_level, 2);
        assert_eq!(state.admin_level, 1);
    }

    #[test]
    fn three_level_chain_increments_admin_level_each_step() {
        let countries = vec![sample_country(0, "US")];
        let csv = "subdivision_code_iso3166-2,subdivision_name,category,localVariant,parent_subdivision,country_code_alpha2\n\
US-WI,Wisconsin,state,,,US\n\
US-WI-MKE,Milwaukee County,county,,US-WI,US\n\
US-WI-MKE-DOWNTOWN,Downtown,district,,US-WI-MKE,US\n";
        let rows = load_subdivisions(csv.as_bytes(), &countries).unwrap();
        assert_eq!(rows.len(), 3);
        let state = rows.iter().find(|r| r.iso_code == "US-WI").unwrap();
        let county = rows.iter().find(|r| r.iso_code == "US-WI-MKE").unwrap();
        let district = rows.iter().find(|r| r.iso_code == "US-WI-MKE-DOWNTOWN").unwrap();
        assert_eq!(state.admin_level, 1);
        assert_eq!(county.admin_level, 2);
        assert_eq!(district.admin_level, 3);
        assert!(district.admin_level > county.admin_level);
        assert!(county.admin_level > state.admin_level);
    }

    #[test]
    fn drops_rows_for_unknown_country() {
        let countries = vec![sample_country(0, "US")];
        let csv = "subdivision_code_iso3166-2,subdivision_name,category,localVariant,parent_subdivision,country_code_alpha2\n\
ZZ-AA,Nowhere,state,,,ZZ\n";
        let rows = load_subdivisions(csv.as_bytes(), &countries).unwrap();
        assert!(rows.is_empty());
    }
}
