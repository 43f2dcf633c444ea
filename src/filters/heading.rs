//! Heading term filtering.

use super::Filter;
use crate::etilbud::Offer;

/// Keeps offers whose heading contains a term, ignoring case.
pub struct HeadingFilter {
    term: String,
}

impl HeadingFilter {
    /// Creates a new heading filter. The term is stored lowercased.
    pub fn new(term: &str) -> Self {
        Self { term: term.to_lowercase() }
    }
}

impl Filter for HeadingFilter {
    fn matches(&self, offer: &Offer) -> bool {
        offer.heading.as_deref().is_some_and(|heading| heading.to_lowercase().contains(&self.term))
    }

    fn description(&self) -> String {
        format!("Heading contains: {}", self.term)
    }
}
