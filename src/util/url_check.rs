use thiserror::Error;
use url::Url;

/// Reasons a URL is refused before being passed to the system opener.
#[derive(Debug, Error)]
pub enum UrlCheckError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Refusing to open {0} URL (only http/https)")]
    UnsupportedScheme(String),
    #[error("URL has no host")]
    MissingHost,
}

/// Validate a URL before `open::that()` hands it to the OS.
///
/// Only `http` and `https` with a host are accepted; anything else
/// (`file:`, `javascript:`, custom handlers) could launch arbitrary programs.
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlCheckError> {
    let url = Url::parse(url_str)?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlCheckError::UnsupportedScheme(other.to_string())),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlCheckError::MissingHost);
    }
    Ok(url)
}
