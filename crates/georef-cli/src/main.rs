//! georef-cli — command-line interface for georef-core
//!
//! Usage examples
//! --------------
//! - `georef --countries c.csv --subdivisions s.csv --localities l.jsonl stats`
//! - `georef --countries c.csv country US`
//! - `georef --countries c.csv --subdivisions s.csv subdivisions US`
//! - `georef --countries c.csv --localities l.jsonl --subdivisions s.csv search locality milwakee`

mod args;

use crate::args::{Commands, SearchKind};
use anyhow::Context;
use clap::Parser;
use georef_core::prelude::*;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = args::CliArgs::parse();

    let countries_path = args.countries.context("--countries <path> is required")?;
    let countries_rows = georef_core::loader::load_countries_from_path(&countries_path)
        .with_context(|| format!("loading countries from {}", countries_path.display()))?;
    let mut countries = CountryRegistry::new();
    countries.load(countries_rows);

    let mut subdivisions = SubdivisionRegistry::new();
    if let Some(path) = &args.subdivisions {
        let country_rows: Vec<Country> = countries.iter()?.cloned().collect();
        let rows = georef_core::loader::load_subdivisions_from_path(path, &country_rows)
            .with_context(|| format!("loading subdivisions from {}", path.display()))?;
        subdivisions.load(rows);
    }

    let mut localities = LocalityRegistry::new();
    if let Some(path) = &args.localities {
        let country_rows: Vec<Country> = countries.iter()?.cloned().collect();
        let subdivision_rows: Vec<Subdivision> = subdivisions.iter()?.cloned().collect();
        let rows = georef_core::loader::load_localities_from_path(
            path,
            &country_rows,
            &subdivision_rows,
            &args.locality_classification,
        )
        .with_context(|| format!("loading localities from {}", path.display()))?;
        localities.load(rows);
    }

    match args.command {
        Commands::Stats => {
            println!("countries: {}", countries.len()?);
            println!(
                "subdivisions: {}",
                subdivisions.len().unwrap_or(0)
            );
            println!("localities: {}", localities.len().unwrap_or(0));
        }

        Commands::Countries => {
            for country in countries.iter()? {
                println!("{} ({})", country.name, country.alpha2);
            }
        }

        Commands::Country { code } => {
            let request = CountryKeyRequest {
                alpha2: Some(code.as_str()),
                ..Default::default()
            };
            match countries.get(request)? {
                Some(country) => {
                    println!("{} ({} / {})", country.name, country.alpha2, country.alpha3);
                    if let Some(long_name) = &country.long_name {
                        println!("  long name: {long_name}");
                    }
                }
                None => println!("no country found for: {code}"),
            }
        }

        Commands::Subdivisions { country } => {
            for subdivision in subdivisions.by_country(&country, &countries)? {
                println!("{} — {}", subdivision.iso_code, subdivision.name);
            }
        }

        Commands::Locality { identifier } => match localities.get(&identifier)? {
            Some(locality) => {
                println!("{} ({:?})", locality.name, locality.population);
                println!("  lat/lng: {}, {}", locality.lat, locality.lng);
            }
            None => println!("no locality found for: {identifier}"),
        },

        Commands::Search { kind, query, limit, country } => match kind {
            SearchKind::Country => {
                for (country, score) in countries.search(&query, limit)? {
                    println!("{:.3}  {} ({})", score, country.name, country.alpha2);
                }
            }
            SearchKind::Subdivision => {
                for (subdivision, score) in
                    subdivisions.search(&query, limit, country.as_deref(), &countries)?
                {
                    println!("{:.3}  {} ({})", score, subdivision.name, subdivision.iso_code);
                }
            }
            SearchKind::Locality => {
                for (locality, score) in localities.search(&query, limit)? {
                    println!("{:.3}  {}", score, locality.name);
                }
            }
        },
    }

    Ok(())
}
