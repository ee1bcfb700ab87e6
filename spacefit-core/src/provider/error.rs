use thiserror::Error;

/// Errors from [`crate::LocationProvider`] implementations.
///
/// A location that simply does not exist is not an error; providers report it
/// as `Ok(None)`. The variants separate requests the caller got wrong from
/// failures on the provider's side.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider rejected the request as malformed.
    #[error("provider rejected the request: {message}")]
    InvalidRequest {
        /// Description returned by the provider.
        message: String,
    },
    /// The provider rejected the credentials.
    #[error("provider rejected the API key")]
    Unauthorized,
    /// The provider could not be reached.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Description of the transport failure.
        message: String,
    },
    /// The provider did not answer in time.
    #[error("provider request timed out: {message}")]
    Timeout {
        /// Description of the timeout.
        message: String,
    },
    /// The provider answered with an unexpected status.
    #[error("provider returned HTTP {status}: {message}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },
    /// The provider's response could not be decoded.
    #[error("failed to parse provider response: {message}")]
    Parse {
        /// Description of the decoding failure.
        message: String,
    },
}

impl ProviderError {
    /// Report whether the failure was caused by the request itself.
    #[must_use]
    pub const fn is_invalid_request(&self) -> bool {
        matches!(self, Self::InvalidRequest { .. })
    }
}
