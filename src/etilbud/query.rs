//! Search request construction.

use crate::credentials::Credentials;
use crate::error::OfferError;

/// Production search endpoint.
pub const BASE_URL: &str = "https://etilbudsavis.dk/api/squid/v2/offers/search";

/// Search term used by the credential probe.
pub const PROBE_QUERY: &str = "mælk";

/// Geolocation, locale and paging sent with every search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub lat: f64,
    pub lng: f64,
    /// Search radius in metres
    pub radius: u32,
    pub locale: &'static str,
    pub limit: u32,
    pub offset: u32,
}

impl Default for SearchParams {
    /// Central Copenhagen, 20 km radius, one page of 24 offers.
    fn default() -> Self {
        Self { lat: 55.695497, lng: 12.550145, radius: 20000, locale: "da_DK", limit: 24, offset: 0 }
    }
}

impl SearchParams {
    /// Smallest useful search, for checking credentials.
    pub fn probe() -> Self {
        Self { radius: 1000, limit: 1, ..Self::default() }
    }
}

/// A validated search for one term.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    term: String,
    params: SearchParams,
}

impl SearchQuery {
    /// Creates a query, rejecting empty or blank terms.
    pub fn new(term: &str, params: SearchParams) -> Result<Self, OfferError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(OfferError::MissingQuery);
        }

        Ok(Self { term: term.to_string(), params })
    }

    /// The fixed query used to validate credentials.
    pub fn probe() -> Self {
        Self { term: PROBE_QUERY.to_string(), params: SearchParams::probe() }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// Builds the full GET URL against `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        let p = &self.params;
        format!(
            "{}?query={}&r_lat={}&r_lng={}&r_radius={}&r_locale={}&limit={}&offset={}",
            base_url,
            urlencoding::encode(&self.term),
            p.lat,
            p.lng,
            p.radius,
            p.locale,
            p.limit,
            p.offset
        )
    }

    /// Builds the complete request: URL plus authentication headers.
    pub fn request(&self, base_url: &str, credentials: &Credentials) -> RequestSpec {
        RequestSpec {
            url: self.url(base_url),
            headers: vec![
                ("X-API-Key", credentials.api_key.clone()),
                ("X-API-Secret", credentials.api_secret.clone()),
            ],
        }
    }
}

/// Everything needed to issue one search request.
#[derive(Clone, PartialEq)]
pub struct RequestSpec {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
}

impl std::fmt::Debug for RequestSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.headers.iter().map(|(name, _)| *name).collect();
        f.debug_struct("RequestSpec").field("url", &self.url).field("headers", &names).finish()
    }
}
