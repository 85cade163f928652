//! Convenience re-exports for downstream crates (the CLI, tests, and any
//! embedder that just wants `get`/`lookup`/`search`).

pub use crate::error::{GeoError, Result};
pub use crate::model::{Country, Locality, OsmType, RowId, Subdivision};
pub use crate::registry::{
    CountryKey, CountryKeyRequest, CountryRegistry, LocalityRegistry, PopulationFilter,
    SubdivisionRegistry,
};

#[cfg(feature = "ingest")]
pub use crate::loader::{
    load_countries_from_path, load_localities_from_path, load_subdivisions_from_path,
};
