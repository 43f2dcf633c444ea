//! etilbud-offers - Find the cheapest grocery offer per item
//!
//! Searches the eTilbudsavis offer API, keeps offers whose heading and unit
//! match each requested item, and reports the lowest unit price and its shop.

pub mod commands;
pub mod config;
pub mod credentials;
pub mod error;
pub mod etilbud;
pub mod filters;
pub mod finder;
pub mod format;
pub mod selector;
pub mod states;

pub use config::Config;
pub use credentials::{validate_credentials, Credentials};
pub use error::OfferError;
pub use etilbud::{BestOffer, ItemRequest, Offer, OfferClient, OfferSource};
pub use finder::{ItemOutcome, ItemReport, OfferFinder};
