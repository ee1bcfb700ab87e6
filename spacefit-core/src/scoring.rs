//! Shared scoring arithmetic.
//!
//! Distance decay, score normalisation, great-circle distance and letter
//! grades are used by every scoring stage, so they live here rather than in
//! the individual calculators.

use geo::Coord;
use serde::Serialize;

/// Distance at which the decay weight reaches zero, in metres.
pub const DECAY_RANGE_M: f64 = 1000.0;

/// Mean Earth radius used for haversine distances, in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Convert a distance in metres into a proximity weight in `0.0..=1.0`.
///
/// The weight decays linearly from `1.0` at the analysis point to `0.0` at
/// [`DECAY_RANGE_M`] and beyond. Distances are read as whole metres, so
/// anything below one metre counts as zero; negative or non-finite values are
/// clamped to zero as well.
///
/// # Examples
/// ```
/// use spacefit_core::distance_weight;
///
/// assert_eq!(distance_weight(0.0), 1.0);
/// assert_eq!(distance_weight(500.0), 0.5);
/// assert_eq!(distance_weight(1500.0), 0.0);
/// assert_eq!(distance_weight(-20.0), 1.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "distance decay is a linear interpolation"
)]
pub fn distance_weight(distance_m: f64) -> f64 {
    let metres = if distance_m.is_finite() {
        distance_m.max(0.0)
    } else {
        0.0
    };
    if metres < 1.0 {
        return 1.0;
    }
    (1.0 - metres / DECAY_RANGE_M).max(0.0)
}

/// Scale a raw score onto `0.0..=100.0` against `max_possible`.
///
/// Returns `0.0` when `max_possible` is not a positive finite number or the
/// raw score is not finite.
///
/// # Examples
/// ```
/// use spacefit_core::normalise_score;
///
/// assert_eq!(normalise_score(25.0, 50.0), 50.0);
/// assert_eq!(normalise_score(-5.0, 50.0), 0.0);
/// assert_eq!(normalise_score(1000.0, 50.0), 100.0);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "normalisation is a ratio")]
pub fn normalise_score(raw: f64, max_possible: f64) -> f64 {
    if !raw.is_finite() || !max_possible.is_finite() || max_possible <= 0.0 {
        return 0.0;
    }
    ((raw / max_possible) * 100.0).clamp(0.0, 100.0)
}

/// Great-circle distance between two WGS84 coordinates, in metres.
///
/// `x` is longitude and `y` is latitude, both in degrees.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use spacefit_core::haversine_distance;
///
/// let seoul = Coord { x: 126.9780, y: 37.5665 };
/// assert_eq!(haversine_distance(seoul, seoul), 0.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "the haversine formula is trigonometric"
)]
pub fn haversine_distance(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let lat1 = from.y.to_radians();
    let lat2 = to.y.to_radians();
    let d_lat = (to.y - from.y).to_radians();
    let d_lng = (to.x - from.x).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Round `value` to one decimal place for presentation.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "decimal rounding")]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Convert a count to `f64`, saturating at `u32::MAX`.
#[must_use]
pub fn count_to_f64(count: usize) -> f64 {
    f64::from(u32::try_from(count).unwrap_or(u32::MAX))
}

/// Letter grade for a normalised livability score.
///
/// Boundaries are half-open: a score belongs to the highest band whose lower
/// bound it reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Grade {
    /// 80 and above.
    #[serde(rename = "A+")]
    APlus,
    /// 70 to below 80.
    #[serde(rename = "A")]
    A,
    /// 60 to below 70.
    #[serde(rename = "B+")]
    BPlus,
    /// 50 to below 60.
    #[serde(rename = "B")]
    B,
    /// 40 to below 50.
    #[serde(rename = "C")]
    C,
    /// 30 to below 40.
    #[serde(rename = "D")]
    D,
    /// Below 30.
    #[serde(rename = "F")]
    F,
}

impl Grade {
    /// Grade a normalised score.
    ///
    /// # Examples
    /// ```
    /// use spacefit_core::Grade;
    ///
    /// assert_eq!(Grade::from_score(80.0), Grade::APlus);
    /// assert_eq!(Grade::from_score(79.99), Grade::A);
    /// assert_eq!(Grade::from_score(29.99), Grade::F);
    /// ```
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 80.0 => Self::APlus,
            s if s >= 70.0 => Self::A,
            s if s >= 60.0 => Self::BPlus,
            s if s >= 50.0 => Self::B,
            s if s >= 40.0 => Self::C,
            s if s >= 30.0 => Self::D,
            _ => Self::F,
        }
    }

    /// Return the grade as displayed to users.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }

    /// Residential usage tier implied by this grade.
    #[must_use]
    pub const fn usage(self) -> UsageTier {
        match self {
            Self::APlus | Self::A => UsageTier::OptimalResidence,
            Self::BPlus | Self::B => UsageTier::SuitableResidence,
            Self::C => UsageTier::AverageResidence,
            Self::D | Self::F => UsageTier::InsufficientInfrastructure,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recommended residential usage derived from a [`Grade`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UsageTier {
    /// Grades `A+` and `A`.
    #[serde(rename = "optimal for residence")]
    OptimalResidence,
    /// Grades `B+` and `B`.
    #[serde(rename = "suitable for residence")]
    SuitableResidence,
    /// Grade `C`.
    #[serde(rename = "average for residence")]
    AverageResidence,
    /// Grades `D` and `F`.
    #[serde(rename = "insufficient infrastructure")]
    InsufficientInfrastructure,
}

impl UsageTier {
    /// Return the tier as displayed to users.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OptimalResidence => "optimal for residence",
            Self::SuitableResidence => "suitable for residence",
            Self::AverageResidence => "average for residence",
            Self::InsufficientInfrastructure => "insufficient infrastructure",
        }
    }
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    reason = "assertions compare floating-point scores"
)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 1.0)]
    #[case(0.4, 1.0)]
    #[case(250.0, 0.75)]
    #[case(500.0, 0.5)]
    #[case(1000.0, 0.0)]
    #[case(4000.0, 0.0)]
    #[case(-1.0, 1.0)]
    #[case(f64::NAN, 1.0)]
    fn distance_weight_decays_linearly(#[case] distance: f64, #[case] expected: f64) {
        assert!((distance_weight(distance) - expected).abs() < 1e-12);
    }

    #[rstest]
    #[case(-5.0, 50.0, 0.0)]
    #[case(1000.0, 50.0, 100.0)]
    #[case(25.0, 50.0, 50.0)]
    #[case(9.0, 30.0, 30.0)]
    #[case(10.0, 0.0, 0.0)]
    #[case(f64::INFINITY, 50.0, 0.0)]
    fn normalise_clamps(#[case] raw: f64, #[case] max: f64, #[case] expected: f64) {
        assert!((normalise_score(raw, max) - expected).abs() < 1e-9);
    }

    #[rstest]
    #[case(100.0, Grade::APlus)]
    #[case(80.0, Grade::APlus)]
    #[case(79.99, Grade::A)]
    #[case(70.0, Grade::A)]
    #[case(60.0, Grade::BPlus)]
    #[case(50.0, Grade::B)]
    #[case(40.0, Grade::C)]
    #[case(30.0, Grade::D)]
    #[case(29.99, Grade::F)]
    #[case(0.0, Grade::F)]
    fn grade_boundaries_are_half_open(#[case] score: f64, #[case] expected: Grade) {
        assert_eq!(Grade::from_score(score), expected);
    }

    #[rstest]
    #[case(Grade::APlus, UsageTier::OptimalResidence)]
    #[case(Grade::B, UsageTier::SuitableResidence)]
    #[case(Grade::C, UsageTier::AverageResidence)]
    #[case(Grade::F, UsageTier::InsufficientInfrastructure)]
    fn usage_follows_grade(#[case] grade: Grade, #[case] expected: UsageTier) {
        assert_eq!(grade.usage(), expected);
    }

    #[rstest]
    fn haversine_matches_known_distance() {
        // One degree of latitude on a 6371 km sphere.
        let a = Coord { x: 127.0, y: 37.0 };
        let b = Coord { x: 127.0, y: 38.0 };
        let expected = EARTH_RADIUS_M * 1.0_f64.to_radians();
        assert!((haversine_distance(a, b) - expected).abs() < 1e-6);
    }

    #[rstest]
    fn grade_serialises_as_label() {
        let json = serde_json::to_string(&Grade::BPlus).unwrap();
        assert_eq!(json, "\"B+\"");
    }

    proptest! {
        #[test]
        fn distance_weight_is_monotonic(a in 0.0_f64..5000.0, b in 0.0_f64..5000.0) {
            let (near, far) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(distance_weight(near) >= distance_weight(far));
            prop_assert!(distance_weight(far) >= 0.0);
        }

        #[test]
        fn normalised_scores_stay_in_range(raw in -1.0e6_f64..1.0e6, max in 0.1_f64..1.0e3) {
            let score = normalise_score(raw, max);
            prop_assert!((0.0..=100.0).contains(&score));
        }
    }
}
