//! Basic usage example for georef-core.
//!
//! Demonstrates loading a small in-memory dataset and exercising `get`,
//! `lookup`, and `search` on each of the three registries.

use georef_core::prelude::*;

fn sample_countries() -> Vec<Country> {
    vec![
        Country {
            row_id: 0,
            alpha2: "US".into(),
            alpha3: "USA".into(),
            numeric: 840,
            name: "United States".into(),
            long_name: Some("United States of America".into()),
            aliases: vec![],
            flag: None,
            normalized_name: georef_core::text::normalize("United States"),
            tokens: georef_core::tokenize::tokenize(&["United States", "US", "USA"]),
        },
        Country {
            row_id: 1,
            alpha2: "GB".into(),
            alpha3: "GBR".into(),
            numeric: 826,
            name: "United Kingdom".into(),
            long_name: None,
            aliases: vec![],
            flag: None,
            normalized_name: georef_core::text::normalize("United Kingdom"),
            tokens: georef_core::tokenize::tokenize(&["United Kingdom", "GB", "GBR"]),
        },
    ]
}

fn sample_subdivisions() -> Vec<Subdivision> {
    vec![Subdivision {
        row_id: 0,
        iso_code: "US-WI".into(),
        local_code: "WI".into(),
        name: "Wisconsin".into(),
        alt_name: None,
        category: "state".into(),
        admin_level: 1,
        parent_row_id: None,
        country_row_id: 0,
        normalized_name: georef_core::text::normalize("Wisconsin"),
        tokens: georef_core::tokenize::tokenize(&["Wisconsin", "US-WI"]),
    }]
}

fn sample_localities() -> Vec<Locality> {
    vec![Locality {
        row_id: 0,
        osm_type: OsmType::Node,
        osm_id: 123456,
        name: "Milwaukee".into(),
        classification: Some("city".into()),
        other_names: vec!["Mailwoki".into()],
        population: Some(577_222),
        lat: 43.0389,
        lng: -87.9065,
        country_row_id: 0,
        subdivision_row_id: Some(0),
        normalized_name: georef_core::text::normalize("Milwaukee"),
        tokens: georef_core::tokenize::tokenize(&["Milwaukee", "US", "Wisconsin"]),
    }]
}

fn main() -> georef_core::error::Result<()> {
    println!("=== georef-core basic usage ===\n");

    let mut countries = CountryRegistry::new();
    countries.load(sample_countries());

    let mut subdivisions = SubdivisionRegistry::new();
    subdivisions.load(sample_subdivisions());

    let mut localities = LocalityRegistry::new();
    localities.load(sample_localities());

    println!("--- get ---");
    let request = CountryKeyRequest { alpha2: Some("US"), ..Default::default() };
    if let Some(country) = countries.get(request)? {
        println!("get(alpha2=US) -> {} ({})", country.name, country.alpha2);
    }

    println!("\n--- lookup ---");
    for country in countries.lookup("United Kingdom")? {
        println!("lookup(\"United Kingdom\") -> {} ({})", country.name, country.alpha2);
    }

    println!("\n--- search (typo-tolerant) ---");
    for (country, score) in countries.search("untied stats", 5)? {
        println!("search(\"untied stats\") -> {} ({:.2})", country.name, score);
    }

    println!("\n--- locality search ---");
    for (locality, score) in localities.search("milwakee", 5)? {
        println!("{} ({:.2}), population {:?}", locality.name, score, locality.population);
    }

    println!("\n--- subdivisions for a country ---");
    for subdivision in subdivisions.by_country("US", &countries)? {
        println!("{} -> {}", subdivision.iso_code, subdivision.name);
    }

    Ok(())
}
