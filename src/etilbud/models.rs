//! Data models for item requests, API offers and selected results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One item to price: a search term and the unit it must be sold in.
///
/// Deserializes from the `[name, unit]` pair shape used by service calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct ItemRequest {
    /// Search term, matched against offer headings
    pub name: String,
    /// Unit symbol the offer must use (`l`, `g`, `ml`, `pcs`, ...)
    pub unit: String,
}

impl ItemRequest {
    /// Creates a new item request.
    pub fn new(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self { name: name.into(), unit: unit.into() }
    }
}

impl From<(String, String)> for ItemRequest {
    fn from((name, unit): (String, String)) -> Self {
        Self { name, unit }
    }
}

impl From<ItemRequest> for (String, String) {
    fn from(item: ItemRequest) -> Self {
        (item.name, item.unit)
    }
}

impl FromStr for ItemRequest {
    type Err = String;

    /// Parses `name:unit`. The last colon separates the unit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((name, unit)) = s.rsplit_once(':') else {
            return Err(format!("Invalid item: '{}'. Use name:unit, e.g. milk:l", s));
        };

        let name = name.trim();
        let unit = unit.trim();
        if name.is_empty() || unit.is_empty() {
            return Err(format!("Invalid item: '{}'. Name and unit must not be empty", s));
        }

        Ok(Self::new(name, unit))
    }
}

impl fmt::Display for ItemRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.unit)
    }
}

/// An offer record as returned by the search endpoint.
///
/// Only the fields used for matching and pricing are modelled; every one
/// of them may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Offer {
    pub heading: Option<String>,
    pub pricing: Option<Pricing>,
    pub quantity: Option<Quantity>,
    pub branding: Option<Branding>,
}

impl Offer {
    /// Returns the unit symbol, if the offer carries one.
    pub fn unit_symbol(&self) -> Option<&str> {
        self.quantity.as_ref()?.unit.as_ref()?.symbol.as_deref()
    }

    /// Returns the upper package size.
    pub fn package_size(&self) -> Option<f64> {
        self.quantity.as_ref()?.size.as_ref()?.to
    }

    /// Returns the offer price.
    pub fn price(&self) -> Option<f64> {
        self.pricing.as_ref()?.price
    }

    /// Returns the seller name.
    pub fn shop(&self) -> Option<&str> {
        self.branding.as_ref()?.name.as_deref()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pricing {
    pub price: Option<f64>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Quantity {
    pub unit: Option<Unit>,
    pub size: Option<Size>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Unit {
    pub symbol: Option<String>,
}

/// Package size range; single-size packages have `from == to`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Size {
    pub from: Option<f64>,
    pub to: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Branding {
    pub name: Option<String>,
}

/// The cheapest normalized offer for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestOffer {
    /// Price per unit (per kg or per litre for `g` and `ml` requests)
    pub price: f64,
    /// Seller name
    pub shop: String,
}

impl From<BestOffer> for (f64, String) {
    fn from(offer: BestOffer) -> Self {
        (offer.price, offer.shop)
    }
}
