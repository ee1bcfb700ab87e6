//! Scoring and recommendation for SpaceFit area analyses.
//!
//! The crate turns retrieved POIs into three views of an area:
//! - **Baseline livability** ([`BaselineScorer`]) weights five fixed POI
//!   categories and normalises the total on its own scale.
//! - **Area indicators** ([`IndicatorCalculator`]) aggregate configured POI
//!   categories into four raw indicator scores.
//! - **Facility recommendations** ([`PublicFacilityRecommender`]) score every
//!   configured public-facility rule against the indicators, apply saturation
//!   penalties and rank the results; [`FacilityReportGenerator`] explains them.
//!
//! Everything here is synchronous and free of I/O. Configuration is shared as
//! an `Arc<AnalysisConfig>` and never mutated.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use spacefit_core::{AnalysisConfig, ExistingFacilities, PoiCollection};
//! use spacefit_scorer::{DEFAULT_REASON, IndicatorCalculator, PublicFacilityRecommender};
//!
//! let config = Arc::new(AnalysisConfig::default());
//! let pois = PoiCollection::with_all_groups();
//! let indicators = IndicatorCalculator::new(Arc::clone(&config)).calculate(&pois);
//! let ranked = PublicFacilityRecommender::new(config).recommend(
//!     &indicators,
//!     &pois,
//!     &ExistingFacilities::new(),
//! );
//!
//! assert_eq!(ranked.len(), 5);
//! assert!(ranked.iter().all(|rec| rec.score == 0.0 && rec.reason == DEFAULT_REASON));
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod baseline;
mod indicators;
mod recommender;
pub mod report;

pub use baseline::{BaselineScorer, BaselineScores};
pub use indicators::IndicatorCalculator;
pub use recommender::{
    DEFAULT_REASON, EXISTING_PENALTY_CAP, EXISTING_SATURATION_COUNT, POI_SATURATION_COUNT,
    PublicFacilityRecommender, Recommendation, base_score, existing_facility_penalty,
    poi_penalty,
};
pub use report::{FacilityReport, FacilityReportGenerator, Level, ReportGrade, ReportInput};
