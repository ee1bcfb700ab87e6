//! Kakao Local API geocoder and POI search.
//!
//! [`KakaoLocalProvider`] implements [`spacefit_core::LocationProvider`] on
//! top of three Kakao endpoints: address search, keyword search (the geocoding
//! fallback) and category search (one request per category code).
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use spacefit_data::kakao::{KakaoLocalProvider, KakaoProviderConfig};
//!
//! let config = KakaoProviderConfig::new("rest-api-key")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("my-app/1.0");
//! let _provider = KakaoLocalProvider::with_config(config)?;
//! # Ok::<(), spacefit_data::kakao::ProviderBuildError>(())
//! ```

mod provider;
mod response;

pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT, KakaoLocalProvider, KakaoProviderConfig,
    ProviderBuildError, SEARCH_RADIUS_M,
};
