use thiserror::Error;

/// Errors from [`crate::geocode::Geocoder::geocode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// The request did not complete within the configured timeout.
    #[error("geocoding request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured timeout in whole seconds.
        timeout_secs: u64,
    },
    /// The service could not be reached.
    #[error("failed to reach geocoding service at {url}: {message}")]
    NetworkError {
        /// Request URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The service answered with a non-success HTTP status.
    #[error("geocoding service at {url} returned HTTP {status}: {message}")]
    HttpError {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The response body was not the expected candidate list.
    #[error("failed to parse geocoding response: {message}")]
    ParseError {
        /// Decoder error description.
        message: String,
    },
}

impl GeocodeError {
    /// Whether repeating the same request may succeed.
    ///
    /// Timeouts, transport failures, throttling (HTTP 429) and server errors
    /// (HTTP 5xx) are transient. Client errors and malformed responses are
    /// not.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::NetworkError { .. } => true,
            Self::HttpError { status, .. } => *status == 429 || *status >= 500,
            Self::ParseError { .. } => false,
        }
    }
}
