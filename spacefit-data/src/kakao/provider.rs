//! `LocationProvider` backed by the Kakao Local REST API.
//!
//! The [`LocationProvider`] trait is synchronous so the analyzer stays
//! embeddable in synchronous callers. [`KakaoLocalProvider`] bridges to the
//! async HTTP client by blocking on a Tokio runtime it owns.

use std::future::Future;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use spacefit_core::{
    CategoryCode, Location, LocationProvider, PoiCollection, PointOfInterest, ProviderError,
};
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use super::response::{ErrorResponse, SearchResponse};

/// Production endpoint of the Kakao Local API.
pub const DEFAULT_BASE_URL: &str = "https://dapi.kakao.com";

/// Default user agent for Kakao requests.
pub const DEFAULT_USER_AGENT: &str = "spacefit/0.1";

/// Radius of every category search, in metres.
pub const SEARCH_RADIUS_M: u32 = 1000;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ADDRESS_SEARCH_PATH: &str = "/v2/local/search/address.json";
const KEYWORD_SEARCH_PATH: &str = "/v2/local/search/keyword.json";
const CATEGORY_SEARCH_PATH: &str = "/v2/local/search/category.json";

/// Errors raised while constructing a [`KakaoLocalProvider`].
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// No REST API key was supplied.
    #[error("Kakao REST API key is empty")]
    MissingApiKey,
    /// The configured base URL does not parse.
    #[error("invalid Kakao base URL {url:?}")]
    BaseUrl {
        /// URL as configured.
        url: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Configuration for [`KakaoLocalProvider`].
#[derive(Clone)]
pub struct KakaoProviderConfig {
    /// REST API key sent as `Authorization: KakaoAK <key>`.
    pub api_key: String,
    /// Base URL of the API, without a trailing path.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl std::fmt::Debug for KakaoProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KakaoProviderConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl KakaoProviderConfig {
    /// Create a configuration for the production endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Point the provider at another deployment of the API.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
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
}

/// Geocoder and POI search over the Kakao Local API.
///
/// Geocoding tries the address search first and falls back to keyword
/// search, so landmarks and place names resolve too. POI retrieval issues
/// one category search per [`CategoryCode`] within [`SEARCH_RADIUS_M`].
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime, or inside a `current_thread` runtime, requests
/// run on the provider's own runtime. Inside a multi-threaded runtime the
/// caller's handle is used through [`tokio::task::block_in_place`].
///
/// # Examples
///
/// ```no_run
/// use spacefit_core::LocationProvider;
/// use spacefit_data::kakao::KakaoLocalProvider;
///
/// let provider = KakaoLocalProvider::new("rest-api-key")?;
/// if let Some(location) = provider.geocode("서울특별시 종로구 세종대로 175")? {
///     let pois = provider.search_all_categories(&location)?;
///     println!("{} POIs around {}", pois.total(), location.address);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct KakaoLocalProvider {
    client: Client,
    config: KakaoProviderConfig,
    base: Url,
    runtime: Runtime,
}

impl std::fmt::Debug for KakaoLocalProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KakaoLocalProvider")
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish_non_exhaustive()
    }
}

impl KakaoLocalProvider {
    /// Create a provider for the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is blank or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(KakaoProviderConfig::new(api_key))
    }

    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is blank, the base URL does not parse, or
    /// the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: KakaoProviderConfig) -> Result<Self, ProviderBuildError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderBuildError::MissingApiKey);
        }
        let base = Url::parse(&config.base_url).map_err(|source| ProviderBuildError::BaseUrl {
            url: config.base_url.clone(),
            source,
        })?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            base,
            runtime,
        })
    }

    /// Build the URL of `path` with form-encoded query `params`.
    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Url {
        let mut url = self.base.clone();
        url.set_path(path);
        url.query_pairs_mut().clear().extend_pairs(params);
        url
    }

    fn category_params(location: &Location, code: CategoryCode) -> [(&'static str, String); 4] {
        [
            ("category_group_code", code.as_str().to_owned()),
            ("x", location.lng().to_string()),
            ("y", location.lat().to_string()),
            ("radius", SEARCH_RADIUS_M.to_string()),
        ]
    }

    async fn search(&self, url: Url) -> Result<Option<SearchResponse>, ProviderError> {
        log::debug!("GET {}", url.path());
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("KakaoAK {}", self.config.api_key))
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err))?;
        classify_response(status, &body)
    }

    async fn geocode_async(&self, address: &str) -> Result<Option<Location>, ProviderError> {
        let query = [("query", address.to_owned())];

        let by_address = self
            .search(self.endpoint(ADDRESS_SEARCH_PATH, &query))
            .await?;
        if let Some(location) = first_location(by_address, false) {
            return Ok(Some(location));
        }

        log::debug!("address search found nothing for {address:?}; trying keyword search");
        let by_keyword = self
            .search(self.endpoint(KEYWORD_SEARCH_PATH, &query))
            .await?;
        Ok(first_location(by_keyword, true))
    }

    async fn search_category(
        &self,
        location: &Location,
        code: CategoryCode,
    ) -> Result<Vec<PointOfInterest>, ProviderError> {
        let url = self.endpoint(
            CATEGORY_SEARCH_PATH,
            &Self::category_params(location, code),
        );
        let documents = self
            .search(url)
            .await?
            .map(|response| response.documents)
            .unwrap_or_default();
        let returned = documents.len();
        let pois: Vec<PointOfInterest> = documents
            .into_iter()
            .filter_map(|document| document.into_poi(code))
            .collect();
        if pois.len() < returned {
            log::debug!(
                "skipped {} {code} results without coordinates",
                returned.saturating_sub(pois.len())
            );
        }
        Ok(pois)
    }

    async fn search_all_async(&self, location: &Location) -> Result<PoiCollection, ProviderError> {
        let mut collection = PoiCollection::with_all_groups();
        for code in CategoryCode::ALL {
            let pois = self.search_category(location, code).await?;
            collection.insert(code.group(), pois);
        }
        log::debug!(
            "retrieved {} POIs around ({}, {})",
            collection.total(),
            location.lat(),
            location.lng()
        );
        Ok(collection)
    }

    /// Convert a transport failure into a [`ProviderError`].
    fn convert_reqwest_error(&self, error: &reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            return ProviderError::Timeout {
                message: format!("no response within {}s", self.config.timeout.as_secs()),
            };
        }
        ProviderError::Unavailable {
            message: error.to_string(),
        }
    }

    /// Drive `future` to completion from synchronous code.
    ///
    /// `block_in_place` requires a multi-threaded runtime; any other context
    /// falls back to the owned runtime.
    fn block_on<F: Future>(&self, future: F) -> F::Output {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

impl LocationProvider for KakaoLocalProvider {
    fn geocode(&self, address: &str) -> Result<Option<Location>, ProviderError> {
        self.block_on(self.geocode_async(address))
    }

    fn search_all_categories(&self, location: &Location) -> Result<PoiCollection, ProviderError> {
        self.block_on(self.search_all_async(location))
    }
}

/// Map an HTTP status and body onto the provider contract.
///
/// `404` means "nothing found" rather than a failure.
fn classify_response(
    status: StatusCode,
    body: &str,
) -> Result<Option<SearchResponse>, ProviderError> {
    match status {
        StatusCode::OK => serde_json::from_str(body)
            .map(Some)
            .map_err(|err| ProviderError::Parse {
                message: err.to_string(),
            }),
        StatusCode::NOT_FOUND => Ok(None),
        StatusCode::BAD_REQUEST => Err(ProviderError::InvalidRequest {
            message: error_message(status, body),
        }),
        StatusCode::UNAUTHORIZED => Err(ProviderError::Unauthorized),
        other => Err(ProviderError::HttpStatus {
            status: other.as_u16(),
            message: error_message(other, body),
        }),
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|parsed| parsed.message)
        .or_else(|| Some(body.trim().to_owned()).filter(|text| !text.is_empty()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_owned()
        })
}

fn first_location(response: Option<SearchResponse>, keyword_hit: bool) -> Option<Location> {
    response
        .and_then(|found| found.documents.into_iter().next())
        .and_then(|document| document.into_location(keyword_hit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn provider() -> KakaoLocalProvider {
        KakaoLocalProvider::new("test-key").expect("provider should build")
    }

    #[rstest]
    fn endpoint_encodes_the_query(provider: KakaoLocalProvider) {
        let url = provider.endpoint(ADDRESS_SEARCH_PATH, &[("query", "종로구 세종대로 175".to_owned())]);

        assert_eq!(url.host_str(), Some("dapi.kakao.com"));
        assert_eq!(url.path(), "/v2/local/search/address.json");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![("query".to_owned(), "종로구 세종대로 175".to_owned())]
        );
    }

    #[rstest]
    fn endpoint_replaces_any_base_path() {
        let config = KakaoProviderConfig::new("test-key").with_base_url("http://127.0.0.1:9/proxy/");
        let provider = KakaoLocalProvider::with_config(config).expect("provider should build");

        let url = provider.endpoint(KEYWORD_SEARCH_PATH, &[("query", "park".to_owned())]);

        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9/v2/local/search/keyword.json?query=park"
        );
    }

    #[rstest]
    fn category_params_put_longitude_in_x() {
        let location = Location::new("Jongno-gu", 37.5735, 126.979);

        let params = KakaoLocalProvider::category_params(&location, CategoryCode::Pharmacy);

        assert_eq!(
            params,
            [
                ("category_group_code", "PM9".to_owned()),
                ("x", "126.979".to_owned()),
                ("y", "37.5735".to_owned()),
                ("radius", "1000".to_owned()),
            ]
        );
    }

    #[rstest]
    fn successful_bodies_are_parsed() {
        let found = classify_response(
            StatusCode::OK,
            r#"{"documents":[{"address_name":"Seoul","x":"127.0","y":"37.5"}]}"#,
        )
        .expect("ok status")
        .expect("documents");
        assert_eq!(found.documents.len(), 1);
    }

    #[rstest]
    fn not_found_is_not_an_error() {
        let found = classify_response(StatusCode::NOT_FOUND, "").expect("404 is not an error");
        assert!(found.is_none());
    }

    #[rstest]
    fn malformed_success_bodies_are_parse_errors() {
        let err = classify_response(StatusCode::OK, "<html>").expect_err("not json");
        assert!(matches!(err, ProviderError::Parse { .. }));
    }

    #[rstest]
    #[case(
        StatusCode::BAD_REQUEST,
        r#"{"errorType":"MissingParameter","message":"query parameter required"}"#,
        ProviderError::InvalidRequest { message: "query parameter required".to_owned() }
    )]
    #[case(StatusCode::UNAUTHORIZED, "", ProviderError::Unauthorized)]
    #[case(
        StatusCode::TOO_MANY_REQUESTS,
        "",
        ProviderError::HttpStatus { status: 429, message: "Too Many Requests".to_owned() }
    )]
    #[case(
        StatusCode::BAD_GATEWAY,
        "upstream down",
        ProviderError::HttpStatus { status: 502, message: "upstream down".to_owned() }
    )]
    fn failing_statuses_are_classified(
        #[case] status: StatusCode,
        #[case] body: &str,
        #[case] expected: ProviderError,
    ) {
        let err = classify_response(status, body).expect_err("failing status");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn first_location_needs_a_document() {
        assert!(first_location(None, false).is_none());
        assert!(first_location(Some(SearchResponse::default()), true).is_none());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_keys_are_rejected(#[case] key: &str) {
        let err = KakaoLocalProvider::new(key).expect_err("blank key");
        assert!(matches!(err, ProviderBuildError::MissingApiKey));
    }

    #[rstest]
    fn unparseable_base_urls_are_rejected() {
        let config = KakaoProviderConfig::new("test-key").with_base_url("not a url");
        let err = KakaoLocalProvider::with_config(config).expect_err("bad url");
        assert!(matches!(err, ProviderBuildError::BaseUrl { .. }));
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = KakaoProviderConfig::new("secret")
            .with_base_url("http://localhost:8080")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent/1.0");

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert!(!format!("{config:?}").contains("secret"));
    }
}
