//! Offer relevance filtering with composable filters.

pub mod heading;
pub mod unit;

use crate::etilbud::Offer;

pub use heading::HeadingFilter;
pub use unit::UnitFilter;

/// Trait for filtering offers.
pub trait Filter: Send + Sync {
    /// Returns true if the offer passes the filter.
    ///
    /// Offers missing the inspected fields must not match.
    fn matches(&self, offer: &Offer) -> bool;

    /// Returns a description of this filter.
    fn description(&self) -> String;
}

/// A chain of filters that must all pass.
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterChain {
    /// Creates an empty filter chain.
    pub fn new() -> Self {
        Self { filters: Vec::new() }
    }

    /// Adds a filter to the chain.
    pub fn add(&mut self, filter: impl Filter + 'static) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Checks if an offer passes all filters.
    pub fn matches(&self, offer: &Offer) -> bool {
        self.filters.iter().all(|f| f.matches(offer))
    }

    /// Keeps the matching offers, in their original order.
    pub fn apply(&self, offers: Vec<Offer>) -> Vec<Offer> {
        offers.into_iter().filter(|o| self.matches(o)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns descriptions of all filters.
    pub fn descriptions(&self) -> Vec<String> {
        self.filters.iter().map(|f| f.description()).collect()
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for the per-item filter chain.
pub struct FilterChainBuilder {
    chain: FilterChain,
}

impl FilterChainBuilder {
    pub fn new() -> Self {
        Self { chain: FilterChain::new() }
    }

    /// Requires the term in the offer heading (case-insensitive).
    pub fn heading(mut self, term: &str) -> Self {
        self.chain.add(HeadingFilter::new(term));
        self
    }

    /// Requires the exact unit symbol.
    pub fn unit(mut self, symbol: &str) -> Self {
        self.chain.add(UnitFilter::new(symbol));
        self
    }

    pub fn build(self) -> FilterChain {
        self.chain
    }
}

impl Default for FilterChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the standard chain for one item: heading term plus unit.
pub fn for_item(term: &str, unit: &str) -> FilterChain {
    FilterChainBuilder::new().heading(term).unit(unit).build()
}
