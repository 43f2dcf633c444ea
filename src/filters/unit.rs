//! Unit-of-measure filtering.

use super::Filter;
use crate::etilbud::Offer;

/// Keeps offers sold in exactly the requested unit symbol.
///
/// Comparison is case-sensitive with no normalization: `l` and `L` differ,
/// and `g` never matches `kg`.
pub struct UnitFilter {
    symbol: String,
}

impl UnitFilter {
    pub fn new(symbol: &str) -> Self {
        Self { symbol: symbol.to_string() }
    }
}

impl Filter for UnitFilter {
    fn matches(&self, offer: &Offer) -> bool {
        offer.unit_symbol() == Some(self.symbol.as_str())
    }

    fn description(&self) -> String {
        format!("Unit: {}", self.symbol)
    }
}
