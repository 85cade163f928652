//! Error taxonomy for the registry/search surface.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, GeoError>;

#[derive(Debug, Error)]
pub enum GeoError {
    /// A query was issued against a registry whose dataset has not been loaded.
    #[error("registry has not been loaded yet")]
    NotLoaded,

    /// `get` was called with more than one canonical-key argument set.
    #[error("ambiguous key: more than one canonical-key argument was supplied")]
    AmbiguousKey,

    /// `get`/`filter` was called with a field name that does not exist on the entity.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// A locality identifier was not in `type:id` form, or `id` was non-numeric.
    #[error("invalid locality identifier: {0}")]
    InvalidIdentifier(String),

    /// Both `population__lt` and `population__gt` were supplied to the same filter.
    #[error("conflicting filters: population__lt and population__gt cannot both be set")]
    ConflictingFilters,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "ingest")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "ingest")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
