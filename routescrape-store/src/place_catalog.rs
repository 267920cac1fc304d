//! Place catalog: named coordinates used to pick origins and destinations.
//!
//! The catalog is a CSV with at least `name`, `lat` and `lon` columns. Extra
//! columns are ignored and a UTF-8 byte-order mark is tolerated.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use routescrape_core::{Coordinate, CoreError, OdPair, OdSource};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::StoreError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// ============================================================================
// Place
// ============================================================================

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    /// Place name, trimmed.
    pub name: String,
    /// Location.
    pub coordinate: Coordinate,
}

// ============================================================================
// Place Catalog
// ============================================================================

/// Places loaded from CSV, in file order.
#[derive(Debug, Clone, Default)]
pub struct PlaceCatalog {
    places: Vec<Place>,
}

impl PlaceCatalog {
    /// Loads a catalog file.
    pub async fn load(path: &Path) -> Result<Self, StoreError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            StoreError::Config(format!("cannot read place catalog {}: {e}", path.display()))
        })?;
        let catalog = Self::from_csv(&bytes)?;
        info!(path = %path.display(), places = catalog.len(), "Place catalog loaded");
        Ok(catalog)
    }

    /// Parses catalog CSV bytes.
    ///
    /// Rows with a missing name or an invalid coordinate are skipped with a
    /// warning.
    pub fn from_csv(bytes: &[u8]) -> Result<Self, StoreError> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let headers = reader.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| StoreError::Config(format!("place catalog has no '{name}' column")))
        };
        let (name_col, lat_col, lon_col) = (column("name")?, column("lat")?, column("lon")?);

        let mut places = Vec::new();
        for (line, row) in reader.records().enumerate() {
            let row = row?;
            let name = row.get(name_col).unwrap_or_default();
            let lat = row.get(lat_col).and_then(|v| v.parse::<f64>().ok());
            let lon = row.get(lon_col).and_then(|v| v.parse::<f64>().ok());

            let coordinate = match (lat, lon) {
                (Some(lat), Some(lon)) => Coordinate::new(lat, lon).ok(),
                _ => None,
            };
            match coordinate {
                Some(coordinate) if !name.is_empty() => places.push(Place {
                    name: name.to_string(),
                    coordinate,
                }),
                _ => warn!(row = line + 2, "Skipping place row without name or valid coordinates"),
            }
        }

        Ok(Self { places })
    }

    /// Number of places.
    pub fn len(&self) -> usize {
        self.places.len()
    }

    /// True if the catalog has no places.
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// All places in file order.
    pub fn places(&self) -> &[Place] {
        &self.places
    }

    /// First place whose name contains `keyword`, ignoring case.
    pub fn find(&self, keyword: &str) -> Option<&Place> {
        let needle = keyword.trim().to_lowercase();
        let found = self
            .places
            .iter()
            .find(|p| p.name.to_lowercase().contains(&needle));
        if found.is_none() {
            info!(keyword, "Place not found");
        }
        found
    }

    /// Two distinct places chosen uniformly at random.
    pub fn random_pair<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<OdPair, StoreError> {
        if self.places.len() < 2 {
            return Err(StoreError::NotEnoughPlaces {
                available: self.places.len(),
                needed: 2,
            });
        }
        let picked = rand::seq::index::sample(rng, self.places.len(), 2);
        let origin = &self.places[picked.index(0)];
        let destination = &self.places[picked.index(1)];
        debug!(origin = %origin.name, destination = %destination.name, "Random pair");
        Ok(OdPair::new(origin.coordinate, destination.coordinate))
    }
}

// ============================================================================
// Random Place Source
// ============================================================================

/// [`OdSource`] drawing random pairs from a catalog.
#[derive(Debug)]
pub struct RandomPlaceSource {
    catalog: PlaceCatalog,
    rng: StdRng,
}

impl RandomPlaceSource {
    /// Creates a source seeded from the OS.
    pub fn new(catalog: PlaceCatalog) -> Self {
        Self::with_rng(catalog, StdRng::from_entropy())
    }

    /// Creates a source with a fixed seed.
    pub fn seeded(catalog: PlaceCatalog, seed: u64) -> Self {
        Self::with_rng(catalog, StdRng::seed_from_u64(seed))
    }

    fn with_rng(catalog: PlaceCatalog, rng: StdRng) -> Self {
        Self { catalog, rng }
    }
}

impl OdSource for RandomPlaceSource {
    fn name(&self) -> &str {
        "random_od_place"
    }

    fn next_pair(&mut self) -> Result<OdPair, CoreError> {
        self.catalog
            .random_pair(&mut self.rng)
            .map_err(|e| CoreError::NoOdPair(e.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = "\u{feff}name,lat,lon,category\n\
        Đại học Bách Khoa ,10.7725,106.6580,university\n\
        Bến xe Gia Định,10.8157,106.7100,bus\n\
        Chợ Bến Thành,10.7721,106.6983,market\n\
        Broken,abc,106.0,none\n";

    fn catalog() -> PlaceCatalog {
        PlaceCatalog::from_csv(CATALOG.as_bytes()).unwrap()
    }

    #[test]
    fn test_parse_skips_bad_rows() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.places()[0].name, "Đại học Bách Khoa");
    }

    #[test]
    fn test_find_case_insensitive_first_match() {
        let catalog = catalog();
        let place = catalog.find("bách khoa").unwrap();
        assert!((place.coordinate.lat - 10.7725).abs() < 1e-9);

        let first = catalog.find("bến").unwrap();
        assert_eq!(first.name, "Bến xe Gia Định");
        assert!(catalog.find("airport").is_none());
    }

    #[test]
    fn test_random_pair_is_distinct() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let pair = catalog.random_pair(&mut rng).unwrap();
            assert_ne!(pair.origin, pair.destination);
        }
    }

    #[test]
    fn test_single_place_cannot_pair() {
        let catalog = PlaceCatalog::from_csv(b"name,lat,lon\nA,1,2\n").unwrap();
        let err = catalog.random_pair(&mut StdRng::seed_from_u64(1)).unwrap_err();
        assert!(matches!(err, StoreError::NotEnoughPlaces { available: 1, .. }));
    }

    #[test]
    fn test_missing_column() {
        let err = PlaceCatalog::from_csv(b"title,lat,lon\nA,1,2\n").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_source_yields_pairs() {
        let mut source = RandomPlaceSource::seeded(catalog(), 42);
        assert_eq!(source.name(), "random_od_place");
        assert!(source.next_pair().is_ok());
    }
}
