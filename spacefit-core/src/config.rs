//! Scoring configuration: indicator definitions, facility rules and the
//! constants shared by every scorer.
//!
//! The configuration is read once, validated, and then shared read-only
//! (typically behind an `Arc`) by every analysis. Declaration order of
//! indicators, category weights and facility rules is significant: it fixes
//! report order and breaks ranking ties, so the maps are [`IndexMap`]s.
//!
//! # Examples
//! ```
//! use spacefit_core::{AnalysisConfig, Indicator};
//!
//! let yaml = r#"
//! indicators:
//!   transportation:
//!     categories: [SW8, PK6]
//!     weights: { SW8: 3.0 }
//! facility_rules:
//!   parking_lot:
//!     description: Public parking lot
//!     indicator_weights: { transportation: 0.8 }
//!     penalty_category: PK6
//!     penalty_weight: 0.4
//! "#;
//!
//! let config = AnalysisConfig::from_yaml_str(yaml)?;
//! assert_eq!(config.scoring.max_possible_score, 50.0);
//! assert!(config.indicators.contains_key(&Indicator::Transportation));
//! # Ok::<(), spacefit_core::ConfigError>(())
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CategoryCode, Indicator};

/// Built-in configuration, kept in step with `config/public_facilities.yml`.
const DEFAULT_CONFIG_YAML: &str = include_str!("../../config/public_facilities.yml");

/// Errors raised while reading or validating scoring configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    #[error("failed to read configuration at {path}")]
    Read {
        /// Requested configuration path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// The file extension named no supported format.
    #[error("unsupported configuration format for {path}; expected .yml, .yaml or .json")]
    UnsupportedFormat {
        /// Requested configuration path.
        path: Utf8PathBuf,
    },
    /// YAML decoding failed.
    #[error("failed to parse YAML configuration")]
    Yaml {
        /// Source error from `serde_yaml`.
        #[source]
        source: serde_yaml::Error,
    },
    /// JSON decoding failed.
    #[error("failed to parse JSON configuration")]
    Json {
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// A normalisation scale was zero, negative or not finite.
    #[error("{name} must be a positive finite number, got {value}")]
    InvalidMaxScore {
        /// Name of the offending constant.
        name: &'static str,
        /// Configured value.
        value: f64,
    },
    /// `top_n_recommendations` was zero.
    #[error("top_n_recommendations must be at least 1")]
    ZeroTopN,
    /// The nearby radius was negative or not finite.
    #[error("nearby_radius_m must be a non-negative finite number, got {value}")]
    InvalidRadius {
        /// Configured value.
        value: f64,
    },
    /// A facility rule's penalty weight was outside `0.0..=1.0`.
    #[error("penalty_weight for {facility_type} must be within 0.0..=1.0, got {weight}")]
    InvalidPenaltyWeight {
        /// Facility rule key.
        facility_type: String,
        /// Configured value.
        weight: f64,
    },
    /// A category, indicator or baseline weight was negative or not finite.
    #[error("weight for {context} must be a non-negative finite number, got {weight}")]
    InvalidWeight {
        /// Where the weight was declared.
        context: String,
        /// Configured value.
        weight: f64,
    },
}

/// Global scoring constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// Normalisation scale for indicators and facility scores.
    pub max_possible_score: f64,
    /// Normalisation scale for the five-category baseline score.
    pub baseline_max_possible_score: f64,
    /// Number of facility recommendations to return.
    pub top_n_recommendations: usize,
    /// Radius used when counting nearby existing facilities, in metres.
    pub nearby_radius_m: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_possible_score: 50.0,
            baseline_max_possible_score: 30.0,
            top_n_recommendations: 5,
            nearby_radius_m: 500.0,
        }
    }
}

/// Fixed category weights used by the baseline livability score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BaselineWeights {
    /// Hospitals and clinics.
    pub medical: f64,
    /// Schools.
    pub school: f64,
    /// Convenience stores.
    pub convenience_store: f64,
    /// Subway stations.
    pub subway: f64,
    /// Cafes.
    pub cafe: f64,
}

impl Default for BaselineWeights {
    fn default() -> Self {
        Self {
            medical: 2.0,
            school: 1.5,
            convenience_store: 0.3,
            subway: 3.0,
            cafe: 0.5,
        }
    }
}

impl BaselineWeights {
    const fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("medical", self.medical),
            ("school", self.school),
            ("convenience_store", self.convenience_store),
            ("subway", self.subway),
            ("cafe", self.cafe),
        ]
    }
}

/// Categories aggregated into one indicator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndicatorDefinition {
    /// Provider category codes contributing to the indicator.
    pub categories: Vec<String>,
    /// Per-category weights; categories without an entry weigh `1.0`.
    #[serde(default)]
    pub weights: IndexMap<String, f64>,
}

impl IndicatorDefinition {
    /// Resolve configured categories into provider codes with their weights.
    ///
    /// Codes the provider does not know are skipped.
    pub fn resolved(&self) -> impl Iterator<Item = (CategoryCode, f64)> + '_ {
        self.categories.iter().filter_map(|raw| {
            let Some(code) = CategoryCode::lookup(raw) else {
                log::debug!("skipping unknown category code '{raw}'");
                return None;
            };
            let weight = self
                .weights
                .iter()
                .find(|(key, _)| CategoryCode::lookup(key) == Some(code))
                .map_or(1.0, |(_, weight)| *weight);
            Some((code, weight))
        })
    }
}

/// How a candidate facility type is scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FacilityRule {
    /// Human-readable facility name.
    pub description: String,
    /// Weights applied to raw indicator scores, keyed by indicator name.
    pub indicator_weights: IndexMap<String, f64>,
    /// Provider category whose nearby supply saturates this facility type.
    #[serde(default)]
    pub penalty_category: Option<String>,
    /// Maximum fraction removed by the saturation penalty.
    #[serde(default)]
    pub penalty_weight: f64,
}

impl FacilityRule {
    /// Return the penalty category when it names a known provider code.
    #[must_use]
    pub fn penalty_code(&self) -> Option<CategoryCode> {
        self.penalty_category
            .as_deref()
            .and_then(CategoryCode::lookup)
    }

    /// Resolve weighted indicator names in declaration order.
    ///
    /// Names that no computed indicator answers to are skipped, so they
    /// contribute nothing to the rule's score.
    pub fn resolved_weights(&self) -> impl Iterator<Item = (Indicator, f64)> + '_ {
        self.indicator_weights.iter().filter_map(|(name, weight)| {
            let Some(indicator) = Indicator::lookup(name) else {
                log::debug!("indicator '{name}' is not computed; contributing 0");
                return None;
            };
            Some((indicator, *weight))
        })
    }

    /// Return the weight applied to `indicator`, or `0.0` when unweighted.
    #[must_use]
    pub fn weight(&self, indicator: Indicator) -> f64 {
        self.resolved_weights()
            .find(|(candidate, _)| *candidate == indicator)
            .map_or(0.0, |(_, weight)| weight)
    }

    /// Return up to `n` indicators with the highest weights.
    ///
    /// Equal weights keep declaration order.
    #[must_use]
    pub fn top_indicators(&self, n: usize) -> Vec<(Indicator, f64)> {
        let mut weighted: Vec<_> = self.resolved_weights().collect();
        weighted.sort_by(|a, b| b.1.total_cmp(&a.1));
        weighted.truncate(n);
        weighted
    }
}

/// Complete scoring configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Global constants.
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// Baseline livability weights.
    #[serde(default)]
    pub baseline_weights: BaselineWeights,
    /// Indicator definitions keyed by name, in evaluation order.
    pub indicators: IndexMap<String, IndicatorDefinition>,
    /// Facility rules keyed by facility type, in declaration order.
    pub facility_rules: IndexMap<String, FacilityRule>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        // Checked by `built_in_config_is_valid`.
        Self::from_yaml_str(DEFAULT_CONFIG_YAML).unwrap_or_else(|err| {
            log::error!("built-in configuration is invalid: {err}");
            Self {
                scoring: ScoringConfig::default(),
                baseline_weights: BaselineWeights::default(),
                indicators: IndexMap::new(),
                facility_rules: IndexMap::new(),
            }
        })
    }
}

impl AnalysisConfig {
    /// Parse and validate a YAML document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Yaml`] for malformed input and a validation
    /// variant when constants or weights are out of range.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(source).map_err(|source| ConfigError::Yaml { source })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Json`] for malformed input and a validation
    /// variant when constants or weights are out of range.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(source).map_err(|source| ConfigError::Json { source })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a `.yml`, `.yaml` or `.json` file.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnsupportedFormat`] for other extensions,
    /// [`ConfigError::Read`] when the file cannot be read, and the parse or
    /// validation errors of the matching `from_*_str` function.
    pub fn from_path(path: &Utf8Path) -> Result<Self, ConfigError> {
        let extension = path.extension().map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Self, ConfigError> = match extension.as_deref() {
            Some("yml" | "yaml") => Self::from_yaml_str,
            Some("json") => Self::from_json_str,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                });
            }
        };
        let text = spacefit_fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        parse(&text)
    }

    /// Check constants and weights.
    ///
    /// # Errors
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scoring = &self.scoring;
        for (name, value) in [
            ("max_possible_score", scoring.max_possible_score),
            (
                "baseline_max_possible_score",
                scoring.baseline_max_possible_score,
            ),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidMaxScore { name, value });
            }
        }
        if scoring.top_n_recommendations == 0 {
            return Err(ConfigError::ZeroTopN);
        }
        if !scoring.nearby_radius_m.is_finite() || scoring.nearby_radius_m < 0.0 {
            return Err(ConfigError::InvalidRadius {
                value: scoring.nearby_radius_m,
            });
        }

        for (name, weight) in self.baseline_weights.entries() {
            check_weight(|| format!("baseline {name}"), weight)?;
        }
        for (indicator, definition) in &self.indicators {
            for (code, weight) in &definition.weights {
                check_weight(|| format!("{indicator}.{code}"), *weight)?;
            }
        }
        for (facility_type, rule) in &self.facility_rules {
            if !(0.0..=1.0).contains(&rule.penalty_weight) {
                return Err(ConfigError::InvalidPenaltyWeight {
                    facility_type: facility_type.clone(),
                    weight: rule.penalty_weight,
                });
            }
            for (indicator, weight) in &rule.indicator_weights {
                check_weight(|| format!("{facility_type}.{indicator}"), *weight)?;
            }
        }
        Ok(())
    }

    /// Indicator definitions whose names resolve, in declaration order.
    ///
    /// Definitions under unknown names are skipped.
    pub fn resolved_indicators(&self) -> impl Iterator<Item = (Indicator, &IndicatorDefinition)> {
        self.indicators.iter().filter_map(|(name, definition)| {
            let Some(indicator) = Indicator::lookup(name) else {
                log::debug!("skipping definition of unknown indicator '{name}'");
                return None;
            };
            Some((indicator, definition))
        })
    }

    /// Look up the rule for `facility_type`.
    #[must_use]
    pub fn rule(&self, facility_type: &str) -> Option<&FacilityRule> {
        self.facility_rules.get(facility_type)
    }
}

fn check_weight(context: impl FnOnce() -> String, weight: f64) -> Result<(), ConfigError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidWeight {
            context: context(),
            weight,
        })
    }
}
