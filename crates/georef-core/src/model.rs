//! Data model: Country, Subdivision, Locality, and the derived per-row
//! fields (`normalized_name`, `tokens`) every kind shares.

use crate::error::{GeoError, Result};
use std::fmt;

/// Stable integer identifier assigned at dataset build time.
pub type RowId = u32;

/// OSM element kind, the first half of a Locality's external identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsmType {
    Node,
    Way,
    Relation,
}

impl OsmType {
    pub fn as_char(self) -> char {
        match self {
            OsmType::Node => 'n',
            OsmType::Way => 'w',
            OsmType::Relation => 'r',
        }
    }

    /// Accepts both the short form (`n`/`w`/`r`) and the long form
    /// (`node`/`way`/`relation`), case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "n" | "node" => Some(OsmType::Node),
            "w" | "way" => Some(OsmType::Way),
            "r" | "relation" => Some(OsmType::Relation),
            _ => None,
        }
    }
}

impl fmt::Display for OsmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A country entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Country {
    pub row_id: RowId,
    pub alpha2: String,
    pub alpha3: String,
    pub numeric: u32,
    pub name: String,
    pub long_name: Option<String>,
    pub aliases: Vec<String>,
    pub flag: Option<String>,
    /// C1 output of `name`.
    pub normalized_name: String,
    /// C2 output: space-joined token list used by the FTS index and scorer.
    pub tokens: String,
}

/// A country subdivision entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Subdivision {
    pub row_id: RowId,
    pub iso_code: String,
    pub local_code: String,
    pub name: String,
    pub alt_name: Option<String>,
    pub category: String,
    pub admin_level: u32,
    pub parent_row_id: Option<RowId>,
    pub country_row_id: RowId,
    pub normalized_name: String,
    pub tokens: String,
}

/// A populated locality entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Locality {
    pub row_id: RowId,
    pub osm_type: OsmType,
    pub osm_id: u64,
    pub name: String,
    /// Place kind, e.g. `"city"`, `"town"`, `"village"`.
    pub classification: Option<String>,
    /// Alternate-language/spelling names, weighted `alt_names` in
    /// field-weighted scoring; distinct from `classification`.
    pub other_names: Vec<String>,
    pub population: Option<u64>,
    pub lat: f64,
    pub lng: f64,
    pub country_row_id: RowId,
    /// The deepest known subdivision containing this locality, if any.
    pub subdivision_row_id: Option<RowId>,
    pub normalized_name: String,
    pub tokens: String,
}

impl Locality {
    /// The external identifier `"<type>:<id>"`.
    pub fn external_id(&self) -> String {
        format!("{}:{}", self.osm_type, self.osm_id)
    }

    /// Parses the wire form of a locality identifier: `"n:123"`, `"way:45"`, etc.
    /// Case-insensitive; long forms accepted.
    pub fn parse_external_id(s: &str) -> Result<(OsmType, u64)> {
        let s = s.trim();
        let (type_part, id_part) = s
            .split_once(':')
            .ok_or_else(|| GeoError::InvalidIdentifier(s.to_string()))?;

        let osm_type = OsmType::parse(type_part)
            .ok_or_else(|| GeoError::InvalidIdentifier(s.to_string()))?;
        let osm_id: u64 = id_part
            .trim()
            .parse()
            .map_err(|_| GeoError::InvalidIdentifier(s.to_string()))?;

        Ok((osm_type, osm_id))
    }

    /// Checks the coordinate invariant: `lat ∈ [-90,90]`, `lng ∈ [-180,180]`.
    pub fn has_valid_coordinates(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn osm_type_parses_short_and_long_forms_case_insensitively() {
        assert_eq!(OsmType::parse("w"), Some(OsmType::Way));
        assert_eq!(OsmType::parse("Way"), Some(OsmType::Way));
        assert_eq!(OsmType::parse("NODE"), Some(OsmType::Node));
        assert_eq!(OsmType::parse("relation"), Some(OsmType::Relation));
        assert_eq!(OsmType::parse("x"), None);
    }

    #[test]
    fn external_id_round_trips_across_short_and_long_forms() {
        let (t1, id1) = Locality::parse_external_id("w:123").unwrap();
        let (t2, id2) = Locality::parse_external_id("way:123").unwrap();
        assert_eq!(t1, t2);
        assert_eq!(id1, id2);
        assert_eq!(t1, OsmType::Way);
        assert_eq!(id1, 123);
    }

    #[test]
    fn rejects_malformed_identifiers() {
        assert!(Locality::parse_external_id("123").is_err());
        assert!(Locality::parse_external_id("x:123").is_err());
        assert!(Locality::parse_external_id("w:abc").is_err());
    }
}
