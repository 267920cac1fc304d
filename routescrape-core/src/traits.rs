//! Trait definitions for RouteScrape.

use crate::error::CoreError;
use crate::models::OdPair;

/// A source of origin/destination pairs for a scrape run.
///
/// Implementors are consumed sequentially by the scrape loop; one call per
/// iteration. Sources are read-only views over external data (a place
/// catalog, a list of literal pairs) and never persist anything.
pub trait OdSource: Send {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Produces the next pair to request.
    fn next_pair(&mut self) -> Result<OdPair, CoreError>;
}

/// Replays a fixed list of pairs, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct FixedOdSource {
    pairs: Vec<OdPair>,
    next: usize,
}

impl FixedOdSource {
    /// Creates a source over the given pairs.
    pub fn new(pairs: Vec<OdPair>) -> Self {
        Self { pairs, next: 0 }
    }
}

impl OdSource for FixedOdSource {
    fn name(&self) -> &str {
        "fixed"
    }

    fn next_pair(&mut self) -> Result<OdPair, CoreError> {
        if self.pairs.is_empty() {
            return Err(CoreError::NoOdPair("no pairs configured".to_string()));
        }
        let pair = self.pairs[self.next % self.pairs.len()];
        self.next += 1;
        Ok(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Coordinate;

    #[test]
    fn test_fixed_source_cycles() {
        let a = OdPair::new(Coordinate { lat: 1.0, lon: 2.0 }, Coordinate { lat: 3.0, lon: 4.0 });
        let b = OdPair::new(Coordinate { lat: 5.0, lon: 6.0 }, Coordinate { lat: 7.0, lon: 8.0 });
        let mut source = FixedOdSource::new(vec![a, b]);

        assert_eq!(source.next_pair().unwrap(), a);
        assert_eq!(source.next_pair().unwrap(), b);
        assert_eq!(source.next_pair().unwrap(), a);
    }

    #[test]
    fn test_empty_fixed_source() {
        let mut source = FixedOdSource::new(vec![]);
        assert!(matches!(source.next_pair(), Err(CoreError::NoOdPair(_))));
    }
}
