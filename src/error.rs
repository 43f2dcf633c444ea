//! Error taxonomy for the offer pipeline.

use thiserror::Error;

/// Errors raised while resolving a single item.
///
/// The batch driver never propagates these: every variant turns into a
/// skipped item. Single-item callers get them as-is.
#[derive(Debug, Error)]
pub enum OfferError {
    /// The item name was empty, so no request was sent.
    #[error("missing query: item name is empty")]
    MissingQuery,

    /// DNS failure, refused connection, timeout or a client that could not be built.
    #[error("connection error: {0}")]
    Transport(String),

    /// The API answered with a non-success status.
    #[error("API responded with status {status}")]
    Status { status: u16 },

    /// The response body was not a JSON array.
    #[error("failed to parse offers response: {0}")]
    Parse(String),

    /// Selection was attempted with no usable candidates.
    #[error("no offers available to process")]
    NoOffers,
}

impl OfferError {
    /// Returns true for responses that indicate rejected credentials.
    pub fn is_auth(&self) -> bool {
        matches!(self, OfferError::Status { status: 401 | 403 })
    }

    /// Returns true if the request never got a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, OfferError::Transport(_))
    }
}
