use std::time::Duration;

use thiserror::Error;

/// Errors returned by gateway operations.
///
/// Nothing in this crate recovers from, suppresses, or retries these; they
/// surface to the immediate caller unchanged.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Rejected locally before any request was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Non-2xx response, transport failure, or a body that could not be parsed.
    #[error("{0}")]
    Gateway(String),

    /// The invoice was not observed as paid before the deadline.
    #[error("payment timeout after {0:?}")]
    Timeout(Duration),
}

impl CheckoutError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, CheckoutError::Timeout(_))
    }
}

pub type Result<T, E = CheckoutError> = std::result::Result<T, E>;
