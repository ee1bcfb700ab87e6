//! External collaborators for the SpaceFit engine.
//!
//! Responsibilities:
//! - Resolve addresses and fetch nearby POIs from the Kakao Local API
//!   ([`kakao::KakaoLocalProvider`]).
//! - Load the existing public-facility register ([`JsonFacilityLoader`]).
//!
//! Boundaries:
//! - Do not encode scoring rules (live in `spacefit-scorer`).
//! - Expose synchronous collaborator traits from `spacefit-core`; async I/O
//!   stays inside this crate.
//!
//! Invariants:
//! - Providers are `Send + Sync` and hold no mutable state between calls.
//! - Facility loading never fails outwards; problems are logged.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod facilities;
pub mod kakao;

pub use facilities::{CategoryStatistics, JsonFacilityLoader};
