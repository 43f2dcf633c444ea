//! Publishing results into a home-automation state store.

use crate::etilbud::BestOffer;
use std::collections::BTreeMap;

/// Entity domain used for offer states.
pub const DOMAIN: &str = "etilbudsavis";

/// Receives one state value per entity.
pub trait StateSink {
    fn set_state(&mut self, entity_id: &str, value: f64);
}

/// Entity id for a shop, e.g. `etilbudsavis.Netto`.
pub fn entity_id(shop: &str) -> String {
    format!("{}.{}", DOMAIN, shop)
}

/// Writes every offer as a state keyed by its shop.
///
/// Later offers for the same shop overwrite earlier ones.
pub fn publish_offers(sink: &mut impl StateSink, offers: &[BestOffer]) {
    for offer in offers {
        sink.set_state(&entity_id(&offer.shop), offer.price);
    }
}

/// In-memory state store.
#[derive(Debug, Default)]
pub struct MemoryStates {
    states: BTreeMap<String, f64>,
}

impl MemoryStates {
    pub fn get(&self, entity_id: &str) -> Option<f64> {
        self.states.get(entity_id).copied()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Iterates states in entity id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.states.iter().map(|(id, value)| (id.as_str(), *value))
    }
}

impl StateSink for MemoryStates {
    fn set_state(&mut self, entity_id: &str, value: f64) {
        self.states.insert(entity_id.to_string(), value);
    }
}
