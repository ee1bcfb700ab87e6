//! Facade crate for the SpaceFit livability engine.
//!
//! This crate re-exports the core domain types, the scoring pipeline and the
//! area analyzer, and exposes the Kakao-backed provider and facility register
//! loader behind the `provider-kakao` feature flag.

#![forbid(unsafe_code)]

pub use spacefit_analyzer::{AnalysisError, AreaAnalysis, AreaAnalyzer};
pub use spacefit_core::{
    AnalysisConfig, AreaIndicators, CategoryCode, ConfigError, ExistingFacilities,
    ExistingFacility, FacilityCategory, FacilityLoader, Grade, Indicator, Location,
    LocationProvider, PoiCollection, PoiGroup, PointOfInterest, ProviderError, UsageTier,
};
pub use spacefit_scorer::{
    BaselineScorer, FacilityReport, FacilityReportGenerator, IndicatorCalculator,
    PublicFacilityRecommender, Recommendation,
};

#[cfg(feature = "provider-kakao")]
pub use spacefit_data::kakao::{KakaoLocalProvider, KakaoProviderConfig};
#[cfg(feature = "provider-kakao")]
pub use spacefit_data::{CategoryStatistics, JsonFacilityLoader};
