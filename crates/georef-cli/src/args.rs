use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for georef-cli.
#[derive(Debug, Parser)]
#[command(
    name = "georef",
    version,
    about = "CLI for querying an embedded geographic reference dataset"
)]
pub struct CliArgs {
    /// Path to the Country CSV.
    #[arg(long = "countries", global = true)]
    pub countries: Option<PathBuf>,

    /// Path to the Subdivision CSV.
    #[arg(long = "subdivisions", global = true)]
    pub subdivisions: Option<PathBuf>,

    /// Path to the Locality JSON-lines file.
    #[arg(long = "localities", global = true)]
    pub localities: Option<PathBuf>,

    /// Place classification applied to every row in --localities, e.g.
    /// "city", "town", "village".
    #[arg(long = "locality-classification", global = true, default_value = "")]
    pub locality_classification: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SearchKind {
    Country,
    Subdivision,
    Locality,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show row counts for every loaded registry.
    Stats,

    /// List all countries.
    Countries,

    /// Look up a country by alpha2, alpha3, or numeric code.
    Country {
        /// alpha2, alpha3, or numeric code (e.g. US, USA, 840).
        code: String,
    },

    /// List all subdivisions belonging to a country.
    Subdivisions {
        /// Country alpha2/alpha3 code or display name.
        country: String,
    },

    /// Look up a locality by its `"<type>:<id>"` external identifier.
    Locality {
        /// e.g. `n:123456`, `way:789`.
        identifier: String,
    },

    /// Fuzzy search one entity kind.
    Search {
        #[arg(value_enum)]
        kind: SearchKind,
        query: String,
        /// Maximum number of results to return.
        #[arg(short = 'n', long = "limit", default_value_t = 5)]
        limit: usize,
        /// Restrict Subdivision/Locality search to one country.
        #[arg(long = "country")]
        country: Option<String>,
    },
}
