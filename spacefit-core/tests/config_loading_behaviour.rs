//! Behavioural coverage for loading `AnalysisConfig` from disk.

use std::cell::RefCell;

use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use spacefit_core::{AnalysisConfig, ConfigError};
use tempfile::TempDir;

const PARKING_ONLY_JSON: &str = r#"{
  "indicators": {
    "transportation": { "categories": ["SW8", "PK6"], "weights": { "SW8": 3.0 } }
  },
  "facility_rules": {
    "parking_lot": {
      "description": "Public parking lot",
      "indicator_weights": { "transportation": 0.8 },
      "penalty_category": "PK6",
      "penalty_weight": 0.4
    }
  }
}"#;

/// Temporary directory for each scenario.
#[fixture]
pub fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("create temporary directory: {err}"),
    }
}

/// Path of the configuration file under test.
#[fixture]
pub fn config_path() -> RefCell<Option<Utf8PathBuf>> {
    RefCell::new(None)
}

/// Outcome of the load step.
#[fixture]
pub fn load_result() -> RefCell<Option<Result<AnalysisConfig, ConfigError>>> {
    RefCell::new(None)
}

fn write_config(temp_dir: &TempDir, name: &str, contents: &str) -> Utf8PathBuf {
    let path = Utf8PathBuf::from_path_buf(temp_dir.path().join(name))
        .unwrap_or_else(|_| panic!("temporary paths should be UTF-8"));
    if let Err(err) = std::fs::write(&path, contents) {
        panic!("write {path}: {err}");
    }
    path
}

#[given("the shipped configuration file")]
fn shipped_config(config_path: &RefCell<Option<Utf8PathBuf>>) {
    let path = Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../config/public_facilities.yml");
    *config_path.borrow_mut() = Some(path);
}

#[given("a JSON configuration with a single parking rule")]
fn json_config(temp_dir: &TempDir, config_path: &RefCell<Option<Utf8PathBuf>>) {
    let path = write_config(temp_dir, "scoring.json", PARKING_ONLY_JSON);
    *config_path.borrow_mut() = Some(path);
}

#[given("a YAML configuration whose penalty weight is {weight}")]
fn yaml_with_penalty(
    temp_dir: &TempDir,
    config_path: &RefCell<Option<Utf8PathBuf>>,
    weight: f64,
) {
    let yaml = format!(
        "indicators: {{}}\nfacility_rules:\n  daycare:\n    description: Daycare\n    indicator_weights: {{ residential_demand: 0.8 }}\n    penalty_category: PS3\n    penalty_weight: {weight}\n"
    );
    let path = write_config(temp_dir, "scoring.yaml", &yaml);
    *config_path.borrow_mut() = Some(path);
}

#[given("a TOML configuration file")]
fn toml_config(temp_dir: &TempDir, config_path: &RefCell<Option<Utf8PathBuf>>) {
    let path = write_config(temp_dir, "scoring.toml", "[scoring]\n");
    *config_path.borrow_mut() = Some(path);
}

#[when("I load the configuration")]
fn load_config(
    config_path: &RefCell<Option<Utf8PathBuf>>,
    load_result: &RefCell<Option<Result<AnalysisConfig, ConfigError>>>,
) {
    let path = config_path
        .borrow()
        .clone()
        .unwrap_or_else(|| panic!("configuration path must be initialised"));
    *load_result.borrow_mut() = Some(AnalysisConfig::from_path(&path));
}

#[then("the configuration defines {indicators} indicators and {rules} facility rules")]
fn defines_counts(
    load_result: &RefCell<Option<Result<AnalysisConfig, ConfigError>>>,
    indicators: usize,
    rules: usize,
) {
    let borrow = load_result.borrow();
    let Some(Ok(config)) = borrow.as_ref() else {
        panic!("expected a loaded configuration, got {borrow:?}");
    };
    assert_eq!(config.indicators.len(), indicators);
    assert_eq!(config.facility_rules.len(), rules);
}

#[then("the indicator scale is {indicator} and the baseline scale is {baseline}")]
fn scales(
    load_result: &RefCell<Option<Result<AnalysisConfig, ConfigError>>>,
    indicator: f64,
    baseline: f64,
) {
    let borrow = load_result.borrow();
    let Some(Ok(config)) = borrow.as_ref() else {
        panic!("expected a loaded configuration, got {borrow:?}");
    };
    assert_eq!(config.scoring.max_possible_score, indicator);
    assert_eq!(config.scoring.baseline_max_possible_score, baseline);
}

#[then("loading fails with an invalid penalty weight")]
fn fails_penalty(load_result: &RefCell<Option<Result<AnalysisConfig, ConfigError>>>) {
    let borrow = load_result.borrow();
    assert!(
        matches!(
            borrow.as_ref(),
            Some(Err(ConfigError::InvalidPenaltyWeight { .. }))
        ),
        "expected InvalidPenaltyWeight, got {borrow:?}"
    );
}

#[then("loading fails with an unsupported format")]
fn fails_format(load_result: &RefCell<Option<Result<AnalysisConfig, ConfigError>>>) {
    let borrow = load_result.borrow();
    assert!(
        matches!(
            borrow.as_ref(),
            Some(Err(ConfigError::UnsupportedFormat { .. }))
        ),
        "expected UnsupportedFormat, got {borrow:?}"
    );
}

#[scenario(path = "tests/features/config_loading.feature", index = 0)]
fn shipped_yaml_loads(
    temp_dir: TempDir,
    config_path: RefCell<Option<Utf8PathBuf>>,
    load_result: RefCell<Option<Result<AnalysisConfig, ConfigError>>>,
) {
    let _ = (temp_dir, config_path, load_result);
}

#[scenario(path = "tests/features/config_loading.feature", index = 1)]
fn json_loads(
    temp_dir: TempDir,
    config_path: RefCell<Option<Utf8PathBuf>>,
    load_result: RefCell<Option<Result<AnalysisConfig, ConfigError>>>,
) {
    let _ = (temp_dir, config_path, load_result);
}

#[scenario(path = "tests/features/config_loading.feature", index = 2)]
fn penalty_weight_rejected(
    temp_dir: TempDir,
    config_path: RefCell<Option<Utf8PathBuf>>,
    load_result: RefCell<Option<Result<AnalysisConfig, ConfigError>>>,
) {
    let _ = (temp_dir, config_path, load_result);
}

#[scenario(path = "tests/features/config_loading.feature", index = 3)]
fn unsupported_format_rejected(
    temp_dir: TempDir,
    config_path: RefCell<Option<Utf8PathBuf>>,
    load_result: RefCell<Option<Result<AnalysisConfig, ConfigError>>>,
) {
    let _ = (temp_dir, config_path, load_result);
}
