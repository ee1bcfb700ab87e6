//! End-to-end livability analysis for a single address.
//!
//! [`AreaAnalyzer`] drives a [`LocationProvider`](spacefit_core::LocationProvider)
//! through five sequential stages (geocode, POI retrieval, scoring,
//! recommendation with existing-facility statistics, report assembly) and
//! returns one composite [`AreaAnalysis`]. Provider failures are classified
//! into [`AnalysisError`]; everything after retrieval is infallible.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod analyzer;
mod error;
mod proximity;
mod result;

pub use analyzer::AreaAnalyzer;
pub use error::AnalysisError;
pub use proximity::{ExistingFacilityStats, FacilityTypeStats, existing_facility_stats, whole_metres};
pub use result::{
    AnalysisDetails, AreaAnalysis, BaselineCounts, LivabilitySummary, NearestPoi, NearestPois,
    PoiMarker, WeightedScores,
};
