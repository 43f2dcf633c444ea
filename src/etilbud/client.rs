//! HTTP client for the eTilbudsavis offer search endpoint.

use super::models::Offer;
use super::query::{RequestSpec, SearchQuery, BASE_URL};
use crate::config::Config;
use crate::credentials::Credentials;
use crate::error::OfferError;
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;

/// Trait for offer searches - enables mocking for tests.
#[async_trait]
pub trait OfferSource: Send + Sync {
    /// Runs one search and returns the offers in API order.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Offer>, OfferError>;

    /// Releases any held connection. Safe to call at any time.
    fn close(&self) {}
}

/// Offer API client owning one reusable HTTP session.
///
/// The session is built on the first request and kept until [`close`]
/// or drop.
///
/// [`close`]: OfferClient::close
pub struct OfferClient {
    session: Mutex<Option<Client>>,
    credentials: Credentials,
    base_url: String,
    timeout: Duration,
    proxy: Option<String>,
}

impl OfferClient {
    /// Creates a client against the configured endpoint.
    pub fn new(config: &Config, credentials: Credentials) -> Self {
        Self::with_base_url(config, credentials, None)
    }

    /// Creates a client with an optional custom base URL (for testing).
    pub fn with_base_url(config: &Config, credentials: Credentials, base_url: Option<String>) -> Self {
        Self {
            session: Mutex::new(None),
            credentials,
            base_url: base_url.unwrap_or_else(|| config.base_url.clone()),
            timeout: config.timeout(),
            proxy: config.proxy.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns true while a session is held.
    pub fn is_open(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Client>> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns the live session, building it on first use.
    fn acquire(&self) -> Result<Client, OfferError> {
        let mut session = self.lock();
        if let Some(client) = session.as_ref() {
            return Ok(client.clone());
        }

        let mut builder = Client::builder()
            .gzip(true)
            .brotli(true)
            .timeout(self.timeout)
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &self.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url)
                .map_err(|e| OfferError::Transport(format!("invalid proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| OfferError::Transport(format!("failed to build HTTP client: {}", e)))?;

        debug!("Opened HTTP session");
        *session = Some(client.clone());
        Ok(client)
    }

    /// Drops the session. A later request opens a fresh one.
    pub fn close(&self) {
        if self.lock().take().is_some() {
            debug!("Closed HTTP session");
        }
    }

    /// Performs a GET and returns the body of a successful response.
    async fn get(&self, request: &RequestSpec) -> Result<String, OfferError> {
        let client = self.acquire()?;

        debug!("GET {}", request.url);

        let mut builder = client.get(request.url.as_str()).header("Accept", "application/json");
        for (name, value) in &request.headers {
            builder = builder.header(*name, value.as_str());
        }

        let response = builder.send().await.map_err(|e| {
            warn!("Error connecting to API: {}", e);
            OfferError::Transport(e.to_string())
        })?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            if status == 401 {
                warn!("API rejected credentials (401)");
            } else {
                warn!("API responded with error {}", status);
            }
            return Err(OfferError::Status { status: status.as_u16() });
        }

        response.text().await.map_err(|e| OfferError::Transport(e.to_string()))
    }

    /// Sends the probe query and reports whether the credentials were accepted.
    pub async fn probe(&self) -> Result<(), OfferError> {
        let request = SearchQuery::probe().request(&self.base_url, &self.credentials);
        self.get(&request).await.map(|_| ())
    }
}

#[async_trait]
impl OfferSource for OfferClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Offer>, OfferError> {
        info!("Searching offers: {}", query.term());

        let request = query.request(&self.base_url, &self.credentials);
        let body = self.get(&request).await?;
        let offers = parse_offers(&body)?;

        debug!("Received {} offers for '{}'", offers.len(), query.term());
        Ok(offers)
    }

    fn close(&self) {
        OfferClient::close(self)
    }
}

impl Default for OfferClient {
    fn default() -> Self {
        Self::new(&Config::default(), Credentials::default())
    }
}

/// Parses a response body into offers.
///
/// The body must be a JSON array. Elements that do not fit the offer shape
/// are skipped with a warning instead of failing the whole response.
pub fn parse_offers(body: &str) -> Result<Vec<Offer>, OfferError> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(body).map_err(|e| OfferError::Parse(e.to_string()))?;

    let mut offers = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<Offer>(value) {
            Ok(offer) => offers.push(offer),
            Err(e) => warn!("Skipping malformed offer #{}: {}", index, e),
        }
    }

    Ok(offers)
}

/// Returns the production base URL.
pub fn default_base_url() -> String {
    BASE_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::etilbud::query::SearchParams;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const OFFERS_JSON: &str = r#"[
        {
            "heading": "Letmælk",
            "pricing": {"price": 10.0},
            "quantity": {"unit": {"symbol": "l"}, "size": {"from": 1, "to": 1}},
            "branding": {"name": "Netto"}
        },
        {
            "heading": "Sødmælk",
            "pricing": {"price": 16.0},
            "quantity": {"unit": {"symbol": "l"}, "size": {"from": 2, "to": 2}},
            "branding": {"name": "Føtex"}
        }
    ]"#;

    fn make_test_config() -> Config {
        Config { timeout_secs: 5, ..Config::default() }
    }

    fn make_client(base_url: String) -> OfferClient {
        OfferClient::with_base_url(&make_test_config(), Credentials::new("key", "secret"), Some(base_url))
    }

    fn milk() -> SearchQuery {
        SearchQuery::new("mælk", SearchParams::default()).unwrap()
    }

    #[tokio::test]
    async fn test_search_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("query", "mælk"))
            .and(query_param("r_locale", "da_DK"))
            .and(query_param("limit", "24"))
            .and(header("X-API-Key", "key"))
            .and(header("X-API-Secret", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_string(OFFERS_JSON))
            .mount(&mock_server)
            .await;

        let client = make_client(format!("{}/search", mock_server.uri()));
        let offers = client.search(&milk()).await.unwrap();

        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0].shop(), Some("Netto"));
        assert_eq!(offers[1].package_size(), Some(2.0));
    }

    #[tokio::test]
    async fn test_unauthorized_401() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = make_client(format!("{}/search", mock_server.uri()));
        let err = client.search(&milk()).await.unwrap_err();

        assert!(matches!(err, OfferError::Status { status: 401 }));
        assert!(err.is_auth());
    }

    #[tokio::test]
    async fn test_server_error_500() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = make_client(mock_server.uri());
        let err = client.search(&milk()).await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&mock_server)
            .await;

        let client = make_client(mock_server.uri());
        let err = client.search(&milk()).await.unwrap_err();
        assert!(matches!(err, OfferError::Parse(_)));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let client = make_client("http://127.0.0.1:1/search".to_string());
        let err = client.search(&milk()).await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(OFFERS_JSON)
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let config = Config { timeout_secs: 1, ..Config::default() };
        let client =
            OfferClient::with_base_url(&config, Credentials::new("key", "secret"), Some(mock_server.uri()));

        let started = std::time::Instant::now();
        let err = client.search(&milk()).await.unwrap_err();

        assert!(err.is_transport());
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        let config = Config { timeout_secs: 0, ..Config::default() };
        let client = OfferClient::new(&config, Credentials::default());
        assert_eq!(client.timeout(), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_session_reused_and_closed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(2)
            .mount(&mock_server)
            .await;

        let client = make_client(mock_server.uri());
        assert!(!client.is_open());

        client.search(&milk()).await.unwrap();
        assert!(client.is_open());
        client.search(&milk()).await.unwrap();
        assert!(client.is_open());

        client.close();
        assert!(!client.is_open());
    }

    #[tokio::test]
    async fn test_close_without_requests_is_noop() {
        let client = make_client("http://localhost".to_string());
        client.close();
        client.close();
        assert!(!client.is_open());
    }

    #[tokio::test]
    async fn test_session_kept_after_failure() {
        let client = make_client("http://127.0.0.1:1".to_string());
        assert!(client.search(&milk()).await.is_err());
        assert!(client.is_open());
        client.close();
        assert!(!client.is_open());
    }

    #[tokio::test]
    async fn test_probe_query_params() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("query", "mælk"))
            .and(query_param("r_radius", "1000"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&mock_server)
            .await;

        let client = make_client(mock_server.uri());
        assert!(client.probe().await.is_ok());
    }

    #[test]
    fn test_base_url_default() {
        let client = OfferClient::default();
        assert_eq!(client.base_url(), BASE_URL);
    }

    #[test]
    fn test_parse_offers_skips_malformed_elements() {
        let body = r#"[
            {"heading": "Smør", "pricing": {"price": "cheap"}},
            {"heading": "Smør 250 g", "pricing": {"price": 20.0}}
        ]"#;

        let offers = parse_offers(body).unwrap();
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].heading.as_deref(), Some("Smør 250 g"));
    }

    #[test]
    fn test_parse_offers_rejects_object() {
        let err = parse_offers(r#"{"error": "nope"}"#).unwrap_err();
        assert!(matches!(err, OfferError::Parse(_)));
    }

    #[test]
    fn test_parse_offers_empty_array() {
        assert!(parse_offers("[]").unwrap().is_empty());
    }
}
