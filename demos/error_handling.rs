//! Error handling example for georef-core.
//!
//! Demonstrates the `NotLoaded`, `AmbiguousKey`, and `ConflictingFilters`
//! error kinds a caller is expected to handle explicitly.

use georef_core::prelude::*;

fn main() {
    println!("=== georef-core error handling ===\n");

    println!("--- querying before load ---");
    let countries = CountryRegistry::new();
    match countries.len() {
        Ok(n) => println!("  unexpected success: {n}"),
        Err(GeoError::NotLoaded) => println!("  NotLoaded, as expected"),
        Err(e) => println!("  unexpected error: {e}"),
    }
    println!();

    let mut countries = CountryRegistry::new();
    countries.load(vec![Country {
        row_id: 0,
        alpha2: "US".into(),
        alpha3: "USA".into(),
        numeric: 840,
        name: "United States".into(),
        long_name: None,
        aliases: vec![],
        flag: None,
        normalized_name: georef_core::text::normalize("United States"),
        tokens: georef_core::tokenize::tokenize(&["United States", "US", "USA"]),
    }]);

    println!("--- ambiguous key ---");
    let request = CountryKeyRequest { alpha2: Some("US"), alpha3: Some("USA"), ..Default::default() };
    match countries.get(request) {
        Ok(_) => println!("  unexpected success"),
        Err(GeoError::AmbiguousKey) => println!("  AmbiguousKey, as expected"),
        Err(e) => println!("  unexpected error: {e}"),
    }
    println!();

    println!("--- unknown country, missing, not an error ---");
    let request = CountryKeyRequest { alpha2: Some("ZZ"), ..Default::default() };
    match countries.get(request) {
        Ok(None) => println!("  None, as expected"),
        Ok(Some(c)) => println!("  unexpected hit: {}", c.name),
        Err(e) => println!("  unexpected error: {e}"),
    }
    println!();

    println!("--- conflicting population filters ---");
    let filter = PopulationFilter { lt: Some(1000), gt: Some(2000) };
    match filter.validate() {
        Ok(()) => println!("  unexpected success"),
        Err(GeoError::ConflictingFilters) => println!("  ConflictingFilters, as expected"),
        Err(e) => println!("  unexpected error: {e}"),
    }
    println!();

    println!("--- malformed locality identifier ---");
    match Locality::parse_external_id("not-an-id") {
        Ok(_) => println!("  unexpected success"),
        Err(GeoError::InvalidIdentifier(raw)) => println!("  InvalidIdentifier({raw:?}), as expected"),
        Err(e) => println!("  unexpected error: {e}"),
    }
}
