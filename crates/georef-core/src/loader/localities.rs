//! Locality ingest (JSON-lines).

use crate::model::{Country, Locality, OsmType, Subdivision};
use crate::text::normalize;
use crate::tokenize::tokenize;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::io::{BufRead, BufReader, Read};
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct AddressRecord {
    country: String,
    #[serde(default)]
    subdivision: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LocalityRecord {
    osm_id: u64,
    osm_type: String,
    name: String,
    #[serde(default)]
    other_names: HashMap<String, String>,
    address: AddressRecord,
    location: (f64, f64),
    #[serde(default)]
    population: Option<u64>,
}

/// Parses Locality JSON-lines from `reader`, one record per line, resolving
/// each row's `address` against already-loaded `countries`/`subdivisions`.
/// Rows missing a mandatory field, with an unresolvable address, or
/// repeating an already-seen osm key or `(name, deepest subdivision)` pair
/// are dropped and logged.
///
/// `classification` (e.g. `"city"`, `"town"`, `"village"`) is applied to
/// every row parsed from this `reader` — callers load one classification's
/// worth of localities per call, the way source files are split by place
/// kind. An empty string leaves `Locality::classification` unset.
pub fn load_localities<R: Read>(
    reader: R,
    countries: &[Country],
    subdivisions: &[Subdivision],
    classification: &str,
) -> crate::error::Result<Vec<Locality>> {
    let classification = classification.trim();
    let country_by_alpha2: HashMap<&str, u32> =
        countries.iter().map(|c| (c.alpha2.as_str(), c.row_id)).collect();
    let subdivision_by_iso: HashMap<&str, u32> =
        subdivisions.iter().map(|s| (s.iso_code.as_str(), s.row_id)).collect();

    let mut seen_keys: HashSet<(char, u64)> = HashSet::new();
    let mut seen_names: HashSet<(String, u32)> = HashSet::new();
    let mut out = Vec::new();

    for (line_no, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let record: LocalityRecord = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                warn!(line = line_no, error = %e, "dropping malformed locality row");
                continue;
            }
        };

        let Some(osm_type) = OsmType::parse(&record.osm_type) else {
            warn!(line = line_no, osm_type = %record.osm_type, "dropping locality row with unknown osm_type");
            continue;
        };

        let Some(&country_row_id) =
            country_by_alpha2.get(record.address.country.trim().to_ascii_uppercase().as_str())
        else {
            warn!(line = line_no, country = %record.address.country, "dropping locality row for unknown country");
            continue;
        };

        let subdivision_row_id = record
            .address
            .subdivision
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|code| subdivision_by_iso.get(&code.to_ascii_uppercase()).copied());

        let Some(deepest_subdivision) = subdivision_row_id else {
            warn!(line = line_no, osm_id = record.osm_id, "dropping locality row: address has no resolvable subdivision code");
            continue;
        };

        if !seen_keys.insert((osm_type.as_char(), record.osm_id)) {
            warn!(line = line_no, osm_id = record.osm_id, "dropping duplicate locality osm key");
            continue;
        }
        if !seen_names.insert((normalize(&record.name), deepest_subdivision)) {
            warn!(line = line_no, osm_id = record.osm_id, "dropping duplicate locality (name, deepest subdivision)");
            continue;
        }

        let (lng, lat) = record.location;
        let mut other_names: Vec<String> = record.other_names.into_values().collect();
        other_names.sort_unstable();

        let country_alpha2 = countries[country_row_id as usize].alpha2.as_str();
        let subdivision_name = subdivisions[deepest_subdivision as usize].name.as_str();
        let tokens = tokenize(&[
            &record.name,
            classification,
            country_alpha2,
            subdivision_name,
        ]);

        let row_id = out.len() as u32;
        out.push(Locality {
            row_id,
            osm_type,
            osm_id: record.osm_id,
            normalized_name: normalize(&record.name),
            name: record.name,
            classification: if classification.is_empty() {
                None
            } else {
                Some(classification.to_string())
            },
            other_names,
            population: record.population,
            lat,
            lng,
            country_row_id,
            subdivision_row_id: Some(deepest_subdivision),
            tokens,
        });
    }

    debug!(count = out.len(), "loaded localities");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::normalize as norm;
    use crate::tokenize::tokenize as row_tokens;

    fn sample_country() -> Country {
        Country {
            row_id: 0,
            alpha2: "US".to_string(),
            alpha3: "USA".to_string(),
            numeric: 840,
            name: "United States".to_string(),
            long_name: None,
            aliases: vec![],
            flag: None,
            normalized_name: norm("United States"),
            tokens: row_tokens(&["United States", "US", "USA"]),
        }
    }

    fn sample_subdivision() -> Subdivision {
        Subdivision {
            row_id: 0,
            iso_code: "US-WI".to_string(),
            local_code: "WI".to_string(),
            name: "Wisconsin".to_string(),
            alt_name: None,
            category: "state".to_string(),
            admin_level: 1,
            parent_row_id: None,
            country_row_id: 0,
            normalized_name: norm("Wisconsin"),
            tokens: row_tokens(&["Wisconsin", "US-WI"]),
        }
    }

    #[test]
    fn parses_well_formed_row() {
        let countries = vec![sample_country()];
        let subdivisions = vec![sample_subdivision()];
        let line = r#"{"osm_id":123,"osm_type":"node","name":"Milwaukee","other_names":{"de":"Mailwoki"},"address":{"country":"US","subdivision":"US-WI"},"location":[-87.9,43.0],"population":577000}"#;
        let rows = load_localities(line.as_bytes(), &countries, &subdivisions, "city").unwrap();
        assert_eq!(rows.len(), 1);
        let loc = &rows[0];
        assert_eq!(loc.name, "Milwaukee");
        assert_eq!(loc.lat, 43.0);
        assert_eq!(loc.lng, -87.9);
        assert_eq!(loc.subdivision_row_id, Some(0));
        assert_eq!(loc.classification.as_deref(), Some("city"));
        assert_eq!(loc.other_names, vec!["Mailwoki".to_string()]);
    }

    #[test]
    fn empty_classification_leaves_it_unset() {
        let countries = vec![sample_country()];
        let subdivisions = vec![sample_subdivision()];
        let line = r#"{"osm_id":1,"osm_type":"n","name":"Milwaukee","address":{"country":"US","subdivision":"US-WI"},"location":[-87.9,43.0]}"#;
        let rows = load_localities(line.as_bytes(), &countries, &subdivisions, "").unwrap();
        assert_eq!(rows[0].classification, None);
    }

    #[test]
    fn drops_row_without_resolvable_subdivision() {
        let countries = vec![sample_country()];
        let subdivisions = vec![sample_subdivision()];
        let line = r#"{"osm_id":1,"osm_type":"node","name":"Nowhere","address":{"country":"US"},"location":[0.0,0.0]}"#;
        let rows = load_localities(line.as_bytes(), &countries, &subdivisions, "city").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn drops_duplicate_osm_key() {
        let countries = vec![sample_country()];
        let subdivisions = vec![sample_subdivision()];
        let line = r#"{"osm_id":1,"osm_type":"n","name":"Milwaukee","address":{"country":"US","subdivision":"US-WI"},"location":[-87.9,43.0]}"#;
        let two_lines = format!("{line}\n{line}");
        let rows = load_localities(two_lines.as_bytes(), &countries, &subdivisions, "city").unwrap();
        assert_eq!(rows.len(), 1);
    }
}
