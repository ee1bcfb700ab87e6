//! Core domain types for the SpaceFit livability engine.
//!
//! The crate defines the vocabulary shared by scoring, orchestration and data
//! access: provider category codes and POI groups, existing public facilities,
//! area indicators, the scoring configuration, and the arithmetic every
//! scorer relies on (distance decay, normalisation, haversine distance and
//! letter grades). Collaborators that talk to the outside world are expressed
//! as the [`LocationProvider`] and [`FacilityLoader`] traits.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod category;
mod config;
mod facility;
mod indicator;
mod poi;
mod provider;
mod scoring;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use category::{CategoryCode, PoiGroup};
pub use config::{
    AnalysisConfig, BaselineWeights, ConfigError, FacilityRule, IndicatorDefinition,
    ScoringConfig,
};
pub use facility::{ExistingFacilities, ExistingFacility, FacilityCategory};
pub use indicator::{AreaIndicators, Indicator};
pub use poi::{PoiCollection, PointOfInterest};
pub use provider::{FacilityLoader, Location, LocationProvider, ProviderError};
pub use scoring::{
    DECAY_RANGE_M, EARTH_RADIUS_M, Grade, UsageTier, count_to_f64, distance_weight,
    haversine_distance, normalise_score, round1,
};
