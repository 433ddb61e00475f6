//! HTTP-based `Geocoder` using Nominatim's search API.
//!
//! The [`Geocoder`] trait is synchronous so that the core crate stays usable
//! from plain threads. [`HttpGeocoder`] bridges its async HTTP calls to that
//! interface by blocking on a Tokio runtime internally.

use std::future::Future;
use std::num::NonZeroUsize;
use std::time::Duration;

use futures_util::stream::{self, StreamExt};
use hubmatch_core::{GeocodeError, GeocodeOutcome, Geocoder};
use log::debug;
use reqwest::Client;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use super::nominatim::{SearchCandidate, first_coordinate};

/// Default Nominatim instance.
pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "geo_locator";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Error type for [`HttpGeocoder`] construction failures.
#[derive(Debug, Error)]
pub enum GeocoderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The base URL could not be parsed or cannot carry a path.
    #[error("invalid geocoder base URL {url:?}: {source}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Why parsing failed.
        #[source]
        source: url::ParseError,
    },
}

/// Configuration for [`HttpGeocoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpGeocoderConfig {
    /// Base URL of the Nominatim service, without the `/search` suffix.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Upper bound on requests in flight during [`Geocoder::geocode_all`].
    pub max_concurrency: NonZeroUsize,
}

impl Default for HttpGeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            max_concurrency: NonZeroUsize::MIN,
        }
    }
}

impl HttpGeocoderConfig {
    /// Create a configuration for the service at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Allow up to `max_concurrency` overlapping requests per batch.
    #[must_use]
    pub const fn with_max_concurrency(mut self, max_concurrency: NonZeroUsize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }
}

/// Nominatim-backed geocoder.
///
/// Owns a current-thread Tokio runtime that is reused across calls.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the stored runtime drives requests. Inside a
/// multi-threaded runtime the caller's handle is used through
/// [`tokio::task::block_in_place`]. Inside a `current_thread` runtime the
/// stored runtime is used, which may deadlock if the caller's runtime drives
/// IO this request depends on.
///
/// # Ordering
///
/// [`Geocoder::geocode_all`] overlaps at most `max_concurrency` requests and
/// always returns outcomes in the order the addresses were given.
pub struct HttpGeocoder {
    client: Client,
    config: HttpGeocoderConfig,
    search_endpoint: Url,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGeocoder")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("search_endpoint", &self.search_endpoint.as_str())
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpGeocoder {
    /// Create a geocoder for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, GeocoderBuildError> {
        Self::with_config(HttpGeocoderConfig::new(base_url))
    }

    /// Create a geocoder with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn with_config(config: HttpGeocoderConfig) -> Result<Self, GeocoderBuildError> {
        let search_endpoint = search_endpoint(&config.base_url)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(GeocoderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(GeocoderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            search_endpoint,
            runtime,
        })
    }

    /// The configuration this geocoder was built with.
    #[must_use]
    pub const fn config(&self) -> &HttpGeocoderConfig {
        &self.config
    }

    /// Build the search URL for `address`.
    ///
    /// The format is `{base_url}/search?q={address}&format=jsonv2&limit=1`
    /// with the address percent-encoded.
    fn build_search_url(&self, address: &str) -> Url {
        let mut url = self.search_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", address)
            .append_pair("format", "jsonv2")
            .append_pair("limit", "1");
        url
    }

    /// Look up a single address asynchronously.
    async fn fetch(&self, address: &str) -> GeocodeOutcome {
        let url = self.build_search_url(address);
        debug!("geocoding {address:?}");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        // The client timeout also covers reading the body.
        let body = response
            .bytes()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;
        let candidates: Vec<SearchCandidate> =
            serde_json::from_slice(&body).map_err(|err| GeocodeError::ParseError {
                message: err.to_string(),
            })?;

        if let Some(name) = candidates.first().and_then(|c| c.display_name.as_deref()) {
            debug!("{address:?} matched {name:?}");
        }
        first_coordinate(&candidates)
    }

    /// Convert a reqwest transport error to a `GeocodeError`.
    ///
    /// Timeouts and failures reading the response body are transient;
    /// malformed JSON is reported by the caller as a parse error.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &Url) -> GeocodeError {
        if error.is_timeout() {
            return GeocodeError::Timeout {
                url: url.to_string(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return GeocodeError::HttpError {
                url: url.to_string(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        GeocodeError::NetworkError {
            url: url.to_string(),
            message: error.to_string(),
        }
    }

    /// Drive `future` to completion from synchronous code.
    fn block_on<F: Future>(&self, future: F) -> F::Output {
        // block_in_place needs a multi-threaded runtime; anything else falls
        // back to the stored runtime.
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

/// Resolve the `/search` endpoint beneath `base_url`.
///
/// A base URL with a path prefix such as `http://host/nominatim` keeps the
/// prefix whether or not it ends with a slash.
fn search_endpoint(base_url: &str) -> Result<Url, GeocoderBuildError> {
    let invalid = |source| GeocoderBuildError::InvalidBaseUrl {
        url: base_url.to_owned(),
        source,
    };
    let mut base = Url::parse(base_url).map_err(invalid)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("search").map_err(invalid)
}

impl Geocoder for HttpGeocoder {
    fn geocode(&self, address: &str) -> GeocodeOutcome {
        self.block_on(self.fetch(address))
    }

    /// Geocode a batch with at most `max_concurrency` requests in flight.
    ///
    /// Outcomes are buffered in submission order, so the result vector is
    /// index-aligned with `addresses` regardless of completion order.
    fn geocode_all(&self, addresses: &[&str]) -> Vec<GeocodeOutcome> {
        if addresses.is_empty() {
            return Vec::new();
        }
        let lookups = stream::iter(addresses.iter().map(|address| self.fetch(address)))
            .buffered(self.config.max_concurrency.get())
            .collect::<Vec<_>>();
        self.block_on(lookups)
    }
}
