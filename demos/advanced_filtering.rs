//! Advanced filtering example for georef-core.
//!
//! Demonstrates country-scoped subdivision/locality search and the
//! population post-filters on aux operations.

use georef_core::prelude::*;

fn sample_countries() -> Vec<Country> {
    vec![Country {
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
    }]
}

fn sample_subdivisions() -> Vec<Subdivision> {
    vec![
        Subdivision {
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
        },
        Subdivision {
            row_id: 1,
            iso_code: "US-CA".into(),
            local_code: "CA".into(),
            name: "California".into(),
            alt_name: None,
            category: "state".into(),
            admin_level: 1,
            parent_row_id: None,
            country_row_id: 0,
            normalized_name: georef_core::text::normalize("California"),
            tokens: georef_core::tokenize::tokenize(&["California", "US-CA"]),
        },
    ]
}

fn sample_localities() -> Vec<Locality> {
    vec![
        Locality {
            row_id: 0,
            osm_type: OsmType::Node,
            osm_id: 1,
            name: "Milwaukee".into(),
            classification: Some("city".into()),
            other_names: vec![],
            population: Some(577_222),
            lat: 43.0389,
            lng: -87.9065,
            country_row_id: 0,
            subdivision_row_id: Some(0),
            normalized_name: georef_core::text::normalize("Milwaukee"),
            tokens: georef_core::tokenize::tokenize(&["Milwaukee", "US", "Wisconsin"]),
        },
        Locality {
            row_id: 1,
            osm_type: OsmType::Node,
            osm_id: 2,
            name: "Madison".into(),
            classification: Some("city".into()),
            other_names: vec!["Madisen".into()],
            population: Some(269_840),
            lat: 43.0731,
            lng: -89.4012,
            country_row_id: 0,
            subdivision_row_id: Some(0),
            normalized_name: georef_core::text::normalize("Madison"),
            tokens: georef_core::tokenize::tokenize(&["Madison", "US", "Wisconsin"]),
        },
        Locality {
            row_id: 2,
            osm_type: OsmType::Node,
            osm_id: 3,
            name: "Los Angeles".into(),
            classification: Some("city".into()),
            other_names: vec!["LA".into()],
            population: Some(3_898_747),
            lat: 34.0522,
            lng: -118.2437,
            country_row_id: 0,
            subdivision_row_id: Some(1),
            normalized_name: georef_core::text::normalize("Los Angeles"),
            tokens: georef_core::tokenize::tokenize(&["Los Angeles", "US", "California"]),
        },
    ]
}

fn main() -> georef_core::error::Result<()> {
    println!("=== georef-core advanced filtering ===\n");

    let mut countries = CountryRegistry::new();
    countries.load(sample_countries());

    let mut subdivisions = SubdivisionRegistry::new();
    subdivisions.load(sample_subdivisions());

    let mut localities = LocalityRegistry::new();
    localities.load(sample_localities());

    println!("--- categories for US ---");
    for category in subdivisions.categories_for_country("US", &countries)? {
        println!("- {category}");
    }

    println!("\n--- localities in Wisconsin with population over 500,000 ---");
    let filter = PopulationFilter { lt: None, gt: Some(500_000) };
    for locality in localities.for_subdivision("US-WI", &subdivisions, filter)? {
        println!("- {} (population {:?})", locality.name, locality.population);
    }

    println!("\n--- all US localities under 1,000,000 ---");
    let filter = PopulationFilter { lt: Some(1_000_000), gt: None };
    for locality in localities.for_country("US", &countries, filter)? {
        println!("- {} (population {:?})", locality.name, locality.population);
    }

    println!("\n--- search weighted by field (name, alt-names, subdivision, country) ---");
    for (locality, score) in
        localities.search_weighted("madisen", 5, &subdivisions, &countries)?
    {
        println!("- {} ({:.2})", locality.name, score);
    }

    Ok(())
}
