//! Best-offer selection with unit-price normalization.

use crate::error::OfferError;
use crate::etilbud::{BestOffer, Offer};
use tracing::trace;

/// Seller name reported when an offer carries no branding.
pub const UNKNOWN_SHOP: &str = "Unknown";

/// Returns true for units reported per 1000 (`g` per kg, `ml` per litre).
pub fn scales_per_thousand(unit: &str) -> bool {
    matches!(unit, "g" | "ml")
}

/// Returns the unit the selected price is expressed in.
pub fn reported_unit(unit: &str) -> &str {
    match unit {
        "g" => "kg",
        "ml" => "l",
        other => other,
    }
}

/// Price per unit of package size.
///
/// `None` when price or size is missing, or the size is not positive.
pub fn normalized_price(offer: &Offer) -> Option<f64> {
    let price = offer.price()?;
    let size = offer.package_size()?;
    (size > 0.0).then(|| price / size)
}

/// Picks the offer with the lowest normalized price.
///
/// Ties keep the earliest offer. Offers without usable pricing are skipped;
/// if none remain the result is [`OfferError::NoOffers`].
pub fn select_best(offers: &[Offer], unit: &str) -> Result<BestOffer, OfferError> {
    let mut best: Option<(f64, &Offer)> = None;

    for offer in offers {
        let Some(price) = normalized_price(offer) else {
            trace!("Excluding offer without pricing: {:?}", offer.heading);
            continue;
        };

        // Strict comparison keeps the first of equal prices.
        if best.map_or(true, |(lowest, _)| price < lowest) {
            best = Some((price, offer));
        }
    }

    let (price, offer) = best.ok_or(OfferError::NoOffers)?;
    let price = if scales_per_thousand(unit) { price * 1000.0 } else { price };

    Ok(BestOffer { price, shop: offer.shop().unwrap_or(UNKNOWN_SHOP).to_string() })
}
