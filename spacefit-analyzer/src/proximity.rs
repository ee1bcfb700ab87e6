//! Existing-facility counts around the analysed location.

use std::collections::BTreeMap;

use geo::Coord;
use serde::Serialize;
use spacefit_core::{ExistingFacilities, FacilityCategory, haversine_distance};

/// Proximity statistics for one facility category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FacilityTypeStats {
    /// Facilities of the category on record.
    pub total: usize,
    /// Facilities within the nearby radius.
    pub nearby: usize,
    /// Distance to the closest facility in whole metres, when any has a coordinate.
    pub nearest_distance: Option<u64>,
}

/// Proximity statistics for the whole existing-facility snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ExistingFacilityStats {
    /// Facilities on record.
    pub total_count: usize,
    /// Facilities within the nearby radius.
    pub nearby_count: usize,
    /// Per-category breakdown.
    pub by_type: BTreeMap<FacilityCategory, FacilityTypeStats>,
}

/// Count existing facilities within `radius_m` of `origin`.
///
/// Distances are great-circle distances and the radius is inclusive.
/// Facilities without a coordinate count towards totals only.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use spacefit_analyzer::existing_facility_stats;
/// use spacefit_core::{ExistingFacilities, ExistingFacility};
///
/// let origin = Coord { x: 126.9780, y: 37.5665 };
/// let mut snapshot = ExistingFacilities::new();
/// snapshot.push(ExistingFacility::new("Seosomun Park", "근린공원").with_coordinate(origin));
/// snapshot.push(ExistingFacility::new("Unmapped Park", "공원"));
///
/// let stats = existing_facility_stats(&snapshot, origin, 500.0);
/// assert_eq!(stats.total_count, 2);
/// assert_eq!(stats.nearby_count, 1);
/// ```
#[must_use]
pub fn existing_facility_stats(
    existing: &ExistingFacilities,
    origin: Coord<f64>,
    radius_m: f64,
) -> ExistingFacilityStats {
    let mut stats = ExistingFacilityStats::default();

    for (category, facilities) in existing.iter() {
        let distances: Vec<f64> = facilities
            .iter()
            .filter_map(|facility| facility.coordinate)
            .map(|coordinate| haversine_distance(origin, coordinate))
            .collect();
        let nearby = distances
            .iter()
            .filter(|distance| within_radius(**distance, radius_m))
            .count();
        let nearest = distances.iter().copied().reduce(f64::min);

        stats.total_count = stats.total_count.saturating_add(facilities.len());
        stats.nearby_count = stats.nearby_count.saturating_add(nearby);
        stats.by_type.insert(
            category,
            FacilityTypeStats {
                total: facilities.len(),
                nearby,
                nearest_distance: nearest.map(whole_metres),
            },
        );
    }

    stats
}

/// Whether a facility `distance_m` away counts as nearby; the edge is inclusive.
#[must_use]
pub fn within_radius(distance_m: f64, radius_m: f64) -> bool {
    distance_m <= radius_m
}

/// Round a non-negative distance to whole metres.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "distances are clamped to the non-negative u32 range first"
)]
pub fn whole_metres(distance_m: f64) -> u64 {
    if !distance_m.is_finite() {
        return 0;
    }
    u64::from(distance_m.round().clamp(0.0, f64::from(u32::MAX)) as u32)
}
