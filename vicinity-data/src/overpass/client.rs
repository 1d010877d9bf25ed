//! Retrying Overpass client implementing [`PoiSource`].

use std::time::Duration;

use geo::Coord;
use log::{debug, error, warn};
use reqwest::Client;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;
use vicinity_core::{PoiSource, PoisByCategory};

use super::classify::classify_elements;
use super::endpoints::{DEFAULT_ENDPOINTS, EndpointCursor};
use super::error::{ClientBuildError, OverpassError};
use super::query::build_query;
use super::response::OverpassResponse;

/// Default user agent for Overpass requests.
pub const DEFAULT_USER_AGENT: &str = "vicinity/0.1";

/// Attempts per request before giving up.
pub const MAX_ATTEMPTS: u32 = 3;

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Configuration for [`OverpassClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverpassConfig {
    /// Interchangeable interpreter URLs, tried in order.
    pub endpoints: Vec<String>,
    /// Base per-attempt timeout; also sent as the server-side query timeout.
    pub timeout: Duration,
    /// Pause between failed attempts.
    pub retry_delay: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoints: DEFAULT_ENDPOINTS.iter().map(|e| (*e).to_owned()).collect(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl OverpassConfig {
    /// Create a configuration with the given endpoint pool.
    #[must_use]
    pub fn new<I, S>(endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            endpoints: endpoints.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Set the base per-attempt timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the pause between failed attempts.
    #[must_use]
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Timeout for the zero-based `attempt`: `base × (attempt + 1)`.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use vicinity_data::overpass::attempt_timeout;
///
/// let base = Duration::from_secs(60);
/// assert_eq!(attempt_timeout(base, 0), Duration::from_secs(60));
/// assert_eq!(attempt_timeout(base, 2), Duration::from_secs(180));
/// ```
#[must_use]
pub fn attempt_timeout(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(attempt.saturating_add(1))
}

/// Overpass-backed [`PoiSource`].
///
/// The client holds only immutable configuration, a pooled HTTP client and
/// a Tokio runtime used to bridge the synchronous trait to async I/O.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the client blocks on its own current-thread
/// runtime. Inside a multi-threaded runtime it uses that runtime's handle
/// with [`tokio::task::block_in_place`]. Async callers should prefer
/// [`OverpassClient::fetch_pois_around`].
pub struct OverpassClient {
    client: Client,
    endpoints: Vec<Url>,
    config: OverpassConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for OverpassClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverpassClient")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish_non_exhaustive()
    }
}

impl OverpassClient {
    /// Create a client for the public endpoint pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new() -> Result<Self, ClientBuildError> {
        Self::with_config(OverpassConfig::default())
    }

    /// Create a client with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint pool is empty or holds an invalid
    /// URL, or when the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: OverpassConfig) -> Result<Self, ClientBuildError> {
        if config.endpoints.is_empty() {
            return Err(ClientBuildError::NoEndpoints);
        }
        let endpoints = config
            .endpoints
            .iter()
            .map(|raw| {
                Url::parse(raw).map_err(|source| ClientBuildError::InvalidEndpoint {
                    endpoint: raw.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .build()
            .map_err(ClientBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientBuildError::Runtime)?;
        Ok(Self {
            client,
            endpoints,
            config,
            runtime,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &OverpassConfig {
        &self.config
    }

    /// Overpass QL sent for a request around `(lat, lon)`.
    #[must_use]
    pub fn query_for(&self, lat: f64, lon: f64, radius_m: u32) -> String {
        build_query(lat, lon, radius_m, self.config.timeout.as_secs())
    }

    /// Fetch and classify POIs around `(lat, lon)`.
    ///
    /// Never fails: after [`MAX_ATTEMPTS`] failed attempts every category
    /// list is empty.
    pub async fn fetch_pois_around(&self, lat: f64, lon: f64, radius_m: u32) -> PoisByCategory {
        let query = self.query_for(lat, lon, radius_m);
        let mut cursor = EndpointCursor::new(&self.endpoints);

        for attempt in 0..MAX_ATTEMPTS {
            let Some(endpoint) = cursor.current() else {
                break;
            };
            let timeout = attempt_timeout(self.config.timeout, attempt);
            match self.post_query(endpoint, &query, timeout).await {
                Ok(response) => return Self::pois_from_response(response, lat, lon),
                Err(err) => {
                    warn!(
                        "Overpass attempt {}/{MAX_ATTEMPTS} failed: {err}",
                        attempt.saturating_add(1)
                    );
                    cursor.rotate();
                    if attempt.saturating_add(1) < MAX_ATTEMPTS {
                        tokio::time::sleep(self.config.retry_delay).await;
                    }
                }
            }
        }

        error!("all Overpass attempts failed around ({lat}, {lon}); returning no POIs");
        PoisByCategory::default()
    }

    async fn post_query(
        &self,
        endpoint: &Url,
        query: &str,
        timeout: Duration,
    ) -> Result<OverpassResponse, OverpassError> {
        let url = endpoint.as_str();
        debug!("POST {url} (timeout {}s)", timeout.as_secs());

        let body = self
            .client
            .post(endpoint.clone())
            .timeout(timeout)
            .form(&[("data", query)])
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, url, timeout))?
            .error_for_status()
            .map_err(|err| convert_reqwest_error(&err, url, timeout))?
            .text()
            .await
            .map_err(|err| convert_reqwest_error(&err, url, timeout))?;

        serde_json::from_str(&body).map_err(|err| OverpassError::Decode {
            url: url.to_owned(),
            message: err.to_string(),
        })
    }

    fn pois_from_response(response: OverpassResponse, lat: f64, lon: f64) -> PoisByCategory {
        if let Some(remark) = &response.remark {
            warn!("Overpass remark: {remark}");
        }
        if response.elements.is_empty() {
            return PoisByCategory::default();
        }
        classify_elements(&response.elements, Coord { x: lon, y: lat })
    }
}

fn convert_reqwest_error(error: &reqwest::Error, url: &str, timeout: Duration) -> OverpassError {
    if error.is_timeout() {
        return OverpassError::Timeout {
            url: url.to_owned(),
            timeout_secs: timeout.as_secs(),
        };
    }

    if let Some(status) = error.status() {
        return OverpassError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
        };
    }

    if error.is_decode() {
        return OverpassError::Decode {
            url: url.to_owned(),
            message: error.to_string(),
        };
    }

    OverpassError::Network {
        url: url.to_owned(),
        message: error.to_string(),
    }
}

impl PoiSource for OverpassClient {
    /// Blocking variant of [`OverpassClient::fetch_pois_around`].
    ///
    /// # Runtime requirements
    ///
    /// From within a `current_thread` Tokio runtime the call falls back to
    /// the client's own runtime, which blocks the caller's executor.
    fn get_pois_around(&self, lat: f64, lon: f64, radius_m: u32) -> PoisByCategory {
        let future = self.fetch_pois_around(lat, lon, radius_m);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overpass::test_support::{
        StubOverpassServer, StubReply, closed_endpoint, node, payload,
    };
    use rstest::{fixture, rstest};
    use vicinity_core::Category;

    const LAT: f64 = 52.2297;
    const LON: f64 = 21.0122;

    #[fixture]
    fn shop_payload() -> String {
        payload(&[
            node(1, 52.2300, 21.0122, &[("shop", "supermarket"), ("name", "Społem")]),
            node(2, 52.2310, 21.0122, &[("amenity", "pharmacy")]),
        ])
    }

    fn client_for(endpoints: Vec<String>) -> OverpassClient {
        let config = OverpassConfig::new(endpoints)
            .with_timeout(Duration::from_secs(5))
            .with_retry_delay(Duration::from_millis(10));
        OverpassClient::with_config(config).expect("client should build")
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = OverpassConfig::new(["http://example.com/api"])
            .with_timeout(Duration::from_secs(30))
            .with_retry_delay(Duration::from_millis(250))
            .with_user_agent("test-agent/1.0");

        assert_eq!(config.endpoints, vec!["http://example.com/api".to_owned()]);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.retry_delay, Duration::from_millis(250));
        assert_eq!(config.user_agent, "test-agent/1.0");
    }

    #[rstest]
    fn default_config_uses_public_pool() {
        let config = OverpassConfig::default();
        assert_eq!(config.endpoints.len(), DEFAULT_ENDPOINTS.len());
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[rstest]
    #[case(0, 60)]
    #[case(1, 120)]
    #[case(2, 180)]
    fn timeout_grows_with_attempt(#[case] attempt: u32, #[case] expected_secs: u64) {
        assert_eq!(
            attempt_timeout(Duration::from_secs(60), attempt),
            Duration::from_secs(expected_secs)
        );
    }

    #[rstest]
    fn empty_pool_is_rejected() {
        let err = OverpassClient::with_config(OverpassConfig::new(Vec::<String>::new()))
            .expect_err("should fail");
        assert!(matches!(err, ClientBuildError::NoEndpoints));
    }

    #[rstest]
    fn invalid_endpoint_is_rejected() {
        let err = OverpassClient::with_config(OverpassConfig::new(["not a url"]))
            .expect_err("should fail");
        assert!(matches!(err, ClientBuildError::InvalidEndpoint { .. }));
    }

    #[rstest]
    fn query_uses_base_timeout() {
        let client = client_for(vec!["http://localhost/api".to_owned()]);
        assert!(client.query_for(LAT, LON, 500).starts_with("[out:json][timeout:5];"));
    }

    #[rstest]
    fn healthy_endpoint_returns_classified_pois(shop_payload: String) {
        let server = StubOverpassServer::start(vec![StubReply::json(shop_payload)])
            .expect("stub should start");
        let client = client_for(vec![server.url().to_owned()]);

        let pois = client.get_pois_around(LAT, LON, 500);

        assert_eq!(pois.shops.len(), 1);
        assert_eq!(pois.health.len(), 1);
        let pharmacy = pois.get(Category::Health).first().expect("pharmacy");
        assert_eq!(pharmacy.name, "Pharmacy");
        assert_eq!(server.hits(), 1);
        let request = server.requests().pop().expect("request body");
        assert!(request.starts_with("data="));
    }

    #[rstest]
    fn fails_over_to_next_endpoint(shop_payload: String) {
        let server = StubOverpassServer::start(vec![StubReply::json(shop_payload)])
            .expect("stub should start");
        let dead = closed_endpoint().expect("closed endpoint");
        let client = client_for(vec![dead, server.url().to_owned()]);

        let pois = client.get_pois_around(LAT, LON, 500);

        assert_eq!(pois.shops.len(), 1);
        assert_eq!(server.hits(), 1);
    }

    #[rstest]
    #[case(StubReply::status(503))]
    #[case(StubReply::json("<html>rate limited</html>"))]
    fn exhausted_attempts_yield_empty_result(#[case] reply: StubReply) {
        let server = StubOverpassServer::start(vec![reply]).expect("stub should start");
        let client = client_for(vec![server.url().to_owned()]);

        let pois = client.get_pois_around(LAT, LON, 500);

        assert!(pois.iter().all(|(_, list)| list.is_empty()));
        assert_eq!(server.hits(), MAX_ATTEMPTS as usize);
    }

    #[rstest]
    fn remark_without_elements_is_not_retried() {
        let reply = StubReply::json(r#"{"elements": [], "remark": "runtime error: timed out"}"#);
        let server = StubOverpassServer::start(vec![reply]).expect("stub should start");
        let client = client_for(vec![server.url().to_owned()]);

        let pois = client.get_pois_around(LAT, LON, 500);

        assert!(pois.iter().all(|(_, list)| list.is_empty()));
        assert_eq!(server.hits(), 1);
    }

    #[rstest]
    fn async_fetch_on_caller_runtime(shop_payload: String) {
        let server = StubOverpassServer::start(vec![StubReply::json(shop_payload)])
            .expect("stub should start");
        let client = client_for(vec![server.url().to_owned()]);
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("runtime should build");

        let pois = runtime.block_on(client.fetch_pois_around(LAT, LON, 500));
        let bridged = runtime.block_on(async { client.get_pois_around(LAT, LON, 500) });

        assert_eq!(pois.shops.len(), 1);
        assert_eq!(bridged.shops.len(), 1);
        assert_eq!(server.hits(), 2);
    }
}
