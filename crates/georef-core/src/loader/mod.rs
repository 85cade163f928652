//! Ingest pipeline (feature `ingest`): reads the external CSV/JSON-lines
//! formats into in-memory rows a registry's `load` accepts. Gated behind a
//! feature because it pulls in `csv` and `serde_json`, which a consumer
//! that only loads pre-built in-memory data has no use for.

mod countries;
mod localities;
mod subdivisions;

pub use countries::load_countries;
pub use localities::load_localities;
pub use subdivisions::load_subdivisions;

use crate::error::Result;
use crate::model::{Country, Locality, Subdivision};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

pub fn load_countries_from_path(path: impl AsRef<Path>) -> Result<Vec<Country>> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading country dataset");
    let file = BufReader::new(File::open(path)?);
    load_countries(file)
}

pub fn load_subdivisions_from_path(
    path: impl AsRef<Path>,
    countries: &[Country],
) -> Result<Vec<Subdivision>> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading subdivision dataset");
    let file = BufReader::new(File::open(path)?);
    load_subdivisions(file, countries)
}

pub fn load_localities_from_path(
    path: impl AsRef<Path>,
    countries: &[Country],
    subdivisions: &[Subdivision],
    classification: &str,
) -> Result<Vec<Locality>> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading locality dataset");
    let file = BufReader::new(File::open(path)?);
    load_localities(file, countries, subdivisions, classification)
}
