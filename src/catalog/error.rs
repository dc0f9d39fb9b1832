use thiserror::Error;

/// Errors from remote catalog calls (trending list and discover pages).
///
/// No variant is retried automatically; the screens show the message and let
/// the user retry by hand.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Request exceeded the configured timeout
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the size limit
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    /// Body was not the expected JSON shape
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("TMDB API key not configured (set TMDB_API_KEY)")]
    MissingApiKey,
    #[error("Insecure base URL: HTTPS required (except localhost for testing)")]
    InsecureBaseUrl,
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The fetch task panicked before producing a result
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// Returns true if retrying the same request later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            CatalogError::Timeout(_) | CatalogError::Network(_) => true,
            CatalogError::HttpStatus(status) => *status >= 500 || *status == 429,
            CatalogError::ResponseTooLarge(_)
            | CatalogError::Decode(_)
            | CatalogError::MissingApiKey
            | CatalogError::InsecureBaseUrl
            | CatalogError::InvalidUrl(_)
            | CatalogError::Internal(_) => false,
        }
    }

    /// One-line message for the status bar and inline error rows.
    pub fn user_message(&self) -> String {
        if self.is_transient() {
            format!("{} (press r to retry)", self)
        } else {
            self.to_string()
        }
    }
}
