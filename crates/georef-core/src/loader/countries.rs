//! Country ingest (CSV).

use crate::model::Country;
use crate::text::normalize;
use crate::tokenize::tokenize;
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct CountryRecord {
    #[serde(rename = "#country_code_alpha2")]
    alpha2: String,
    country_code_alpha3: String,
    numeric_code: u32,
    name_short: String,
    #[serde(default)]
    name_long: Option<String>,
}

/// Parses a Country CSV from `reader`. Rows missing a mandatory field, or
/// repeating an already-seen `alpha2`, are dropped and logged rather than
/// failing the whole load.
pub fn load_countries<R: Read>(reader: R) -> crate::error::Result<Vec<Country>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut seen_alpha2 = HashSet::new();
    let mut out = Vec::new();

    for result in rdr.deserialize::<CountryRecord>() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "dropping malformed country row");
                continue;
            }
        };

        let alpha2 = record.alpha2.trim().to_ascii_uppercase();
        let alpha3 = record.country_code_alpha3.trim().to_ascii_uppercase();
        let name = record.name_short.trim().to_string();

        if alpha2.is_empty() || alpha3.is_empty() || name.is_empty() {
            warn!(alpha2 = %alpha2, "dropping country row with a missing mandatory field");
            continue;
        }
        if !seen_alpha2.insert(alpha2.clone()) {
            warn!(alpha2 = %alpha2, "dropping duplicate country row");
            continue;
        }

        let long_name = record
            .name_long
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let row_id = out.len() as u32;
        let tokens = tokenize(&[&name, &alpha2, &alpha3, long_name.as_deref().unwrap_or("")]);
        out.push(Country {
            row_id,
            normalized_name: normalize(&name),
            alpha2,
            alpha3,
            numeric: record.numeric_code,
            name,
            long_name,
            aliases: Vec::new(),
            flag: None,
            tokens,
        });
    }

    debug!(count = out.len(), "loaded countries");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "#country_code_alpha2,country_code_alpha3,numeric_code,name_short,name_long\n\
GB,GBR,826,United Kingdom,United Kingdom of Great Britain and Northern Ireland\n\
US,USA,840,United States,\n";

    #[test]
    fn parses_well_formed_rows() {
        let countries = load_countries(SAMPLE.as_bytes()).unwrap();
        assert_eq!(countries.len(), 2);
        assert_eq!(countries[0].alpha2, "GB");
        assert_eq!(countries[1].long_name, None);
    }

    #[test]
    fn drops_rows_with_missing_mandatory_fields() {
        let csv = "#country_code_alpha2,country_code_alpha3,numeric_code,name_short,name_long\n\
,GBR,826,United Kingdom,\n";
        let countries = load_countries(csv.as_bytes()).unwrap();
        assert!(countries.is_empty());
    }

    #[test]
    fn drops_duplicate_alpha2() {
        let csv = "#country_code_alpha2,country_code_alpha3,numeric_code,name_short,name_long\n\
US,USA,840,United States,\n\
US,USX,841,United States Again,\n";
        let countries = load_countries(csv.as_bytes()).unwrap();
        assert_eq!(countries.len(), 1);
    }
}
