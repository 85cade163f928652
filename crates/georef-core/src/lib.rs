//! Embedded, read-only geographic reference library.
//!
//! Three entity kinds — [`model::Country`], [`model::Subdivision`], and
//! [`model::Locality`] — each live in their own [`registry`] facade
//! offering exact retrieval (`get`), exact lookup by name (`lookup`), and
//! fuzzy ranked search (`search`). A registry starts `Unloaded`; loading is
//! the one lifecycle event, after which all query paths are synchronous,
//! side-effect-free, and require no locking.
//!
//! The `ingest` feature (on by default) adds CSV/JSON-lines parsers under
//! [`loader`] for populating a registry from the external dataset formats;
//! disable it to depend on this crate purely as a query engine over rows
//! you construct or deserialize yourself.

pub mod alias;
pub mod error;
pub mod expander;
pub mod index;
pub mod model;
pub mod registry;
pub mod scorer;
pub mod store;
pub mod text;
pub mod tokenize;

#[cfg(feature = "ingest")]
pub mod loader;

pub mod prelude;
