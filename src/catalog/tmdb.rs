//! Client for The Movie Database (TMDB) v3 API.
//!
//! Two endpoints are used: `trending/movie/day` for the landing screen and
//! `discover/{movie,tv}` as the remote page source for the home feed.

use super::{
    CatalogError, CatalogItem, FeedSelection, Genre, PageSource, PLACEHOLDER_IMAGE,
};
use crate::util::strip_control_chars;
use async_trait::async_trait;
use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

const MAX_RESPONSE_SIZE: usize = 5 * 1024 * 1024; // 5MB

#[derive(Debug, Deserialize)]
struct PagedResponse {
    #[serde(default)]
    results: Vec<TmdbTitle>,
}

/// One entry of a TMDB result list. Movies carry `title`, TV shows `name`.
#[derive(Debug, Deserialize)]
struct TmdbTitle {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    vote_average: Option<f64>,
    #[serde(default)]
    genre_ids: Vec<u32>,
}

/// HTTP client for TMDB. Cheap to clone.
#[derive(Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    api_key: Option<Arc<SecretString>>,
    base_url: String,
    image_base_url: String,
    timeout: Duration,
}

impl std::fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbClient")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("image_base_url", &self.image_base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TmdbClient {
    /// Create a client.
    ///
    /// Both base URLs must use HTTPS; plain HTTP is accepted only for loopback
    /// hosts so tests can point the client at a local mock server.
    pub fn new(
        http: reqwest::Client,
        api_key: Option<SecretString>,
        base_url: &str,
        image_base_url: &str,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        check_base_url(base_url)?;
        check_base_url(image_base_url)?;
        Ok(Self {
            http,
            api_key: api_key.map(Arc::new),
            base_url: base_url.trim_end_matches('/').to_string(),
            image_base_url: image_base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Today's trending movies.
    pub async fn trending(&self) -> Result<Vec<CatalogItem>, CatalogError> {
        let url = self.endpoint("trending/movie/day", &[])?;
        let body: PagedResponse = self.get_json(url).await?;
        tracing::debug!(count = body.results.len(), "Trending titles received");
        Ok(body
            .results
            .into_iter()
            .map(|t| self.to_item(t, None))
            .collect())
    }

    /// One discover page for `selection`. `page` is zero-based; TMDB counts from 1.
    pub async fn discover(
        &self,
        selection: FeedSelection,
        page: u32,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        let path = format!("discover/{}", selection.content_type.tmdb_segment());
        let genre_id = selection.genre.tmdb_id(selection.content_type).to_string();
        let tmdb_page = (page + 1).to_string();
        let url = self.endpoint(
            &path,
            &[
                ("with_genres", genre_id.as_str()),
                ("page", tmdb_page.as_str()),
                ("sort_by", "popularity.desc"),
            ],
        )?;
        let body: PagedResponse = self.get_json(url).await?;
        tracing::debug!(
            selection = %selection,
            page,
            count = body.results.len(),
            "Discover page received"
        );
        Ok(body
            .results
            .into_iter()
            .map(|t| self.to_item(t, Some(selection.genre)))
            .collect())
    }

    /// Build `{base}/{path}?api_key=...&{query}`.
    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, CatalogError> {
        let key = self.api_key.as_ref().ok_or(CatalogError::MissingApiKey)?;
        let mut url = Url::parse(&format!("{}/{}", self.base_url, path))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", key.expose_secret());
            for (name, value) in query {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        // The query string carries the API key; log the path only.
        let path = url.path().to_string();
        tracing::debug!(path = %path, "TMDB request");

        let request = async {
            // reqwest errors embed the request URL, key included.
            let response = self.http.get(url).send().await.map_err(network_error)?;
            if !response.status().is_success() {
                return Err(CatalogError::HttpStatus(response.status().as_u16()));
            }
            read_limited_bytes(response, MAX_RESPONSE_SIZE).await
        };

        let bytes = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| CatalogError::Timeout(self.timeout.as_secs()))??;

        Ok(serde_json::from_slice(&bytes)?)
    }

    fn to_item(&self, title: TmdbTitle, genre: Option<Genre>) -> CatalogItem {
        let name = title
            .title
            .or(title.name)
            .unwrap_or_else(|| "Untitled".to_string());
        let genre = genre
            .or_else(|| title.genre_ids.iter().find_map(|id| Genre::from_tmdb_id(*id)))
            .map(|g| g.label().to_string())
            .unwrap_or_default();
        let image_ref = match title.poster_path.as_deref() {
            Some(p) if !p.is_empty() => format!("{}{}", self.image_base_url, p),
            _ => PLACEHOLDER_IMAGE.to_string(),
        };

        CatalogItem {
            id: title.id.to_string(),
            title: strip_control_chars(&name).into_owned(),
            genre,
            rating: title.vote_average.unwrap_or(0.0),
            image_ref,
        }
    }
}

/// Remote page source backed by TMDB's discover endpoint.
#[derive(Debug, Clone)]
pub struct TmdbDiscoverSource {
    client: TmdbClient,
}

impl TmdbDiscoverSource {
    pub fn new(client: TmdbClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageSource for TmdbDiscoverSource {
    async fn fetch_page(
        &self,
        selection: FeedSelection,
        page: u32,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        self.client.discover(selection, page).await
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

fn check_base_url(base_url: &str) -> Result<(), CatalogError> {
    let url = Url::parse(base_url)?;
    match url.scheme() {
        "https" => Ok(()),
        "http" if is_loopback_host(&url) => Ok(()),
        _ => Err(CatalogError::InsecureBaseUrl),
    }
}

fn is_loopback_host(url: &Url) -> bool {
    match url.host_str() {
        Some("localhost") => true,
        Some(host) => host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .is_ok_and(|ip| ip.is_loopback()),
        None => false,
    }
}

fn network_error(e: reqwest::Error) -> CatalogError {
    CatalogError::Network(e.without_url())
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, CatalogError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(CatalogError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(network_error)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(CatalogError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ContentType;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, key: Option<&str>) -> TmdbClient {
        TmdbClient::new(
            reqwest::Client::new(),
            key.map(|k| SecretString::from(k.to_string())),
            &server.uri(),
            DEFAULT_IMAGE_BASE_URL,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn http_base_url_rejected() {
        let result = TmdbClient::new(
            reqwest::Client::new(),
            None,
            "http://api.example.com/3",
            DEFAULT_IMAGE_BASE_URL,
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(CatalogError::InsecureBaseUrl)));
    }

    #[test]
    fn loopback_http_base_url_allowed() {
        for base in ["http://127.0.0.1:8080", "http://localhost:1234/3", "http://[::1]:99"] {
            assert!(
                TmdbClient::new(
                    reqwest::Client::new(),
                    None,
                    base,
                    DEFAULT_IMAGE_BASE_URL,
                    Duration::from_secs(5),
                )
                .is_ok(),
                "{} should be accepted",
                base
            );
        }
    }

    #[test]
    fn debug_masks_api_key() {
        let client = TmdbClient::new(
            reqwest::Client::new(),
            Some(SecretString::from("tmdb-secret-42".to_string())),
            DEFAULT_TMDB_BASE_URL,
            DEFAULT_IMAGE_BASE_URL,
            Duration::from_secs(5),
        )
        .unwrap();
        let out = format!("{:?}", client);
        assert!(!out.contains("tmdb-secret-42"));
        assert!(out.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn missing_key_fails_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let result = client.trending().await;
        assert!(matches!(result, Err(CatalogError::MissingApiKey)));
    }

    #[tokio::test]
    async fn trending_maps_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trending/movie/day"))
            .and(query_param("api_key", "k"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "page": 1,
                "results": [
                    {"id": 550, "title": "Fight Club", "poster_path": "/fc.jpg",
                     "vote_average": 8.4, "genre_ids": [18]},
                    {"id": 7, "name": "A Show", "poster_path": null, "vote_average": 6.0}
                ]
            })))
            .mount(&server)
            .await;

        let items = client_for(&server, Some("k")).trending().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "550");
        assert_eq!(items[0].title, "Fight Club");
        assert_eq!(items[0].genre, "Drama");
        assert_eq!(items[0].image_ref, "https://image.tmdb.org/t/p/w500/fc.jpg");
        assert_eq!(items[1].title, "A Show");
        assert_eq!(items[1].image_ref, PLACEHOLDER_IMAGE);
        assert_eq!(items[1].genre, "");
    }

    #[tokio::test]
    async fn discover_requests_one_based_page_and_genre() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/discover/tv"))
            .and(query_param("with_genres", "10765"))
            .and(query_param("page", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{"id": 1, "name": "Orbit", "vote_average": 7.25}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let source = TmdbDiscoverSource::new(client_for(&server, Some("k")));
        let sel = FeedSelection::new(ContentType::Show, Genre::SciFi);
        let items = source.fetch_page(sel, 2).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Orbit");
        assert_eq!(items[0].genre, "Sci-Fi");
        assert_eq!(items[0].rating, 7.25);
    }

    #[tokio::test]
    async fn http_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result = client_for(&server, Some("bad")).trending().await;
        assert!(matches!(result, Err(CatalogError::HttpStatus(401))));
    }

    #[tokio::test]
    async fn malformed_json_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let result = client_for(&server, Some("k")).trending().await;
        assert!(matches!(result, Err(CatalogError::Decode(_))));
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("{\"results\":[]}")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = TmdbClient::new(
            reqwest::Client::new(),
            Some(SecretString::from("k".to_string())),
            &server.uri(),
            DEFAULT_IMAGE_BASE_URL,
            Duration::from_millis(200),
        )
        .unwrap();
        let result = client.trending().await;
        assert!(matches!(result, Err(CatalogError::Timeout(_))));
    }

    #[tokio::test]
    async fn control_chars_stripped_from_titles() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{"id": 1, "title": "Evil\u{1b}[31mRed"}]
            })))
            .mount(&server)
            .await;

        let items = client_for(&server, Some("k")).trending().await.unwrap();
        assert_eq!(items[0].title, "EvilRed");
        assert_eq!(items[0].rating, 0.0);
    }
}
