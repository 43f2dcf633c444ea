//! eTilbudsavis API access: request building, HTTP client and data models.

pub mod client;
pub mod models;
pub mod query;

pub use client::{OfferClient, OfferSource};
pub use models::{BestOffer, ItemRequest, Offer};
pub use query::{SearchParams, SearchQuery};
