//! Area indicators aggregated from nearby POIs.

use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Canonical area indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    /// Retail, food and banking density.
    CommercialVitality,
    /// Family and everyday-care infrastructure.
    ResidentialDemand,
    /// Transit and vehicle access.
    Transportation,
    /// Cultural venues and public offices.
    CulturePublic,
}

impl Indicator {
    /// Every indicator in canonical order.
    pub const ALL: [Self; 4] = [
        Self::CommercialVitality,
        Self::ResidentialDemand,
        Self::Transportation,
        Self::CulturePublic,
    ];

    /// Return the configuration key for this indicator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CommercialVitality => "commercial_vitality",
            Self::ResidentialDemand => "residential_demand",
            Self::Transportation => "transportation",
            Self::CulturePublic => "culture_public",
        }
    }

    /// Resolve a configuration key, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for names no indicator answers to.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|indicator| indicator.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// Human-readable label used in reasons and reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CommercialVitality => "commercial vitality",
            Self::ResidentialDemand => "residential demand",
            Self::Transportation => "transportation access",
            Self::CulturePublic => "culture/public facilities",
        }
    }
}

impl std::fmt::Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Indicator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| format!("unknown indicator '{s}'"))
    }
}

/// Raw indicator scores for one analysed location.
///
/// Entries keep the order in which indicators were computed. Indicators that
/// were never computed read as `0.0`.
///
/// # Examples
/// ```
/// use spacefit_core::{AreaIndicators, Indicator};
///
/// let mut indicators = AreaIndicators::new();
/// indicators.set(Indicator::Transportation, 12.5);
///
/// assert_eq!(indicators.score(Indicator::Transportation), 12.5);
/// assert_eq!(indicators.score(Indicator::CulturePublic), 0.0);
/// assert!(indicators.get(Indicator::CulturePublic).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AreaIndicators {
    entries: Vec<(Indicator, f64)>,
}

impl AreaIndicators {
    /// Construct an empty set of indicators.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record the raw score for `indicator`, replacing any earlier value.
    pub fn set(&mut self, indicator: Indicator, score: f64) {
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| *name == indicator) {
            entry.1 = score;
        } else {
            self.entries.push((indicator, score));
        }
    }

    /// Return the raw score for `indicator` when it was computed.
    #[must_use]
    pub fn get(&self, indicator: Indicator) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| *name == indicator)
            .map(|(_, score)| *score)
    }

    /// Return the raw score for `indicator`, treating absent entries as zero.
    #[must_use]
    pub fn score(&self, indicator: Indicator) -> f64 {
        self.get(indicator).unwrap_or(0.0)
    }

    /// Iterate over computed indicators in computation order.
    pub fn iter(&self) -> impl Iterator<Item = (Indicator, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Return the number of computed indicators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Report whether no indicator was computed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the indicator with the highest raw score.
    ///
    /// Ties resolve to the earliest computed indicator.
    #[must_use]
    pub fn strongest(&self) -> Option<(Indicator, f64)> {
        self.iter()
            .reduce(|best, entry| if entry.1 > best.1 { entry } else { best })
    }

    /// Apply `f` to every score, keeping order.
    #[must_use]
    pub fn map_scores(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(indicator, score)| (*indicator, f(*score)))
                .collect(),
        }
    }
}

impl FromIterator<(Indicator, f64)> for AreaIndicators {
    fn from_iter<I: IntoIterator<Item = (Indicator, f64)>>(iter: I) -> Self {
        let mut indicators = Self::new();
        for (indicator, score) in iter {
            indicators.set(indicator, score);
        }
        indicators
    }
}

impl Serialize for AreaIndicators {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (indicator, score) in &self.entries {
            map.serialize_entry(indicator.as_str(), score)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn set_replaces_existing_entry() {
        let mut indicators = AreaIndicators::new();
        indicators.set(Indicator::Transportation, 1.0);
        indicators.set(Indicator::CulturePublic, 2.0);
        indicators.set(Indicator::Transportation, 3.0);

        assert_eq!(indicators.len(), 2);
        assert_eq!(indicators.score(Indicator::Transportation), 3.0);
        let order: Vec<_> = indicators.iter().map(|(name, _)| name).collect();
        assert_eq!(order, [Indicator::Transportation, Indicator::CulturePublic]);
    }

    #[rstest]
    fn strongest_prefers_first_on_ties() {
        let indicators: AreaIndicators = [
            (Indicator::ResidentialDemand, 4.0),
            (Indicator::CommercialVitality, 4.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            indicators.strongest(),
            Some((Indicator::ResidentialDemand, 4.0))
        );
        assert!(AreaIndicators::new().strongest().is_none());
    }

    #[rstest]
    #[case("transportation", Indicator::Transportation)]
    #[case(" culture_public ", Indicator::CulturePublic)]
    fn parses_configuration_keys(#[case] raw: &str, #[case] expected: Indicator) {
        assert_eq!(raw.parse::<Indicator>(), Ok(expected));
    }

    #[rstest]
    fn serialises_in_computation_order() {
        let indicators: AreaIndicators = [
            (Indicator::Transportation, 1.5),
            (Indicator::CommercialVitality, 0.5),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_string(&indicators).unwrap();
        assert_eq!(json, r#"{"transportation":1.5,"commercial_vitality":0.5}"#);
    }
}
