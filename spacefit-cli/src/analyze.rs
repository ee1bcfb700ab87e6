//! Analyze command implementation for the SpaceFit CLI.

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use spacefit_analyzer::{AreaAnalysis, AreaAnalyzer};
use spacefit_core::{AnalysisConfig, ExistingFacilities, LocationProvider};
use spacefit_data::JsonFacilityLoader;
use spacefit_data::kakao::{DEFAULT_BASE_URL, KakaoLocalProvider, KakaoProviderConfig};

use crate::{
    ARG_ADDRESS, ARG_CONFIG, ARG_FACILITIES, ARG_KAKAO_API_KEY, ARG_KAKAO_BASE_URL, ARG_OUTPUT,
    CliError, ENV_ADDRESS, ENV_KAKAO_API_KEY,
};

/// CLI arguments for the `analyze` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Geocode an address with the Kakao Local API, collect the \
                 points of interest within one kilometre and score the area. \
                 An optional facility register lowers the priority of public \
                 facilities the area already has.",
    about = "Score an address and recommend public facilities"
)]
#[ortho_config(prefix = "SPACEFIT")]
pub(crate) struct AnalyzeArgs {
    /// Address to analyse.
    #[arg(value_name = "address")]
    #[serde(default)]
    pub(crate) address: Option<String>,
    /// YAML or JSON scoring configuration replacing the built-in defaults.
    #[arg(long = ARG_CONFIG, value_name = "path")]
    #[serde(default)]
    pub(crate) scoring_config: Option<Utf8PathBuf>,
    /// JSON register of existing public facilities.
    #[arg(long = ARG_FACILITIES, value_name = "path")]
    #[serde(default)]
    pub(crate) facilities: Option<Utf8PathBuf>,
    /// Kakao REST API key.
    #[arg(long = ARG_KAKAO_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) kakao_api_key: Option<String>,
    /// Base URL of the Kakao Local API (e.g. "https://dapi.kakao.com").
    #[arg(long = ARG_KAKAO_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) kakao_base_url: Option<String>,
    /// Write the analysis to this file instead of stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl AnalyzeArgs {
    pub(crate) fn into_config(self) -> Result<AnalyzeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        AnalyzeConfig::try_from(merged)
    }
}

/// Resolved `analyze` command configuration.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct AnalyzeConfig {
    /// Address to analyse, trimmed.
    pub(crate) address: String,
    /// Optional scoring configuration file.
    pub(crate) scoring_config: Option<Utf8PathBuf>,
    /// Optional facility register.
    pub(crate) facilities: Option<Utf8PathBuf>,
    /// Kakao REST API key.
    pub(crate) kakao_api_key: String,
    /// Kakao Local API base URL.
    pub(crate) kakao_base_url: String,
    /// Optional output file.
    pub(crate) output: Option<Utf8PathBuf>,
}

impl fmt::Debug for AnalyzeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzeConfig")
            .field("address", &self.address)
            .field("scoring_config", &self.scoring_config)
            .field("facilities", &self.facilities)
            .field("kakao_api_key", &"<redacted>")
            .field("kakao_base_url", &self.kakao_base_url)
            .field("output", &self.output)
            .finish()
    }
}

impl AnalyzeConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        if let Some(path) = &self.scoring_config {
            Self::require_existing(path, ARG_CONFIG)?;
        }
        if let Some(path) = &self.facilities {
            Self::require_existing(path, ARG_FACILITIES)?;
        }
        Ok(())
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match spacefit_fs::is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn load_scoring_config(&self) -> Result<AnalysisConfig, CliError> {
        match &self.scoring_config {
            Some(path) => {
                log::debug!("loading scoring configuration from {path}");
                Ok(AnalysisConfig::from_path(path)?)
            }
            None => Ok(AnalysisConfig::default()),
        }
    }
}

impl TryFrom<AnalyzeArgs> for AnalyzeConfig {
    type Error = CliError;

    fn try_from(args: AnalyzeArgs) -> Result<Self, Self::Error> {
        let address = args
            .address
            .map(|address| address.trim().to_owned())
            .filter(|address| !address.is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_ADDRESS,
                env: ENV_ADDRESS,
            })?;
        let kakao_api_key = args
            .kakao_api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_KAKAO_API_KEY,
                env: ENV_KAKAO_API_KEY,
            })?;
        let kakao_base_url = args
            .kakao_base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());

        Ok(Self {
            address,
            scoring_config: args.scoring_config,
            facilities: args.facilities,
            kakao_api_key,
            kakao_base_url,
            output: args.output,
        })
    }
}

/// Builds the location provider for the current analyze invocation.
pub(super) trait ProviderBuilder {
    fn build(&self, config: &AnalyzeConfig) -> Result<Box<dyn LocationProvider>, CliError>;
}

pub(super) struct DefaultProviderBuilder;

impl ProviderBuilder for DefaultProviderBuilder {
    fn build(&self, config: &AnalyzeConfig) -> Result<Box<dyn LocationProvider>, CliError> {
        let provider_config = KakaoProviderConfig::new(config.kakao_api_key.clone())
            .with_base_url(config.kakao_base_url.clone());
        let provider = KakaoLocalProvider::with_config(provider_config).map_err(|source| {
            CliError::BuildProvider {
                base_url: config.kakao_base_url.clone(),
                source,
            }
        })?;
        Ok(Box::new(provider))
    }
}

pub(super) fn run_analyze(args: AnalyzeArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let builder = DefaultProviderBuilder;
    run_analyze_with(args, &builder, &mut stdout)
}

pub(super) fn run_analyze_with(
    args: AnalyzeArgs,
    builder: &dyn ProviderBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_analyze_config(args)?;
    let analysis = execute_analyze(&config, builder)?;
    let payload =
        serde_json::to_string_pretty(&analysis).map_err(CliError::SerialiseAnalysis)?;
    match &config.output {
        Some(path) => write_analysis_file(path, &payload),
        None => write_analysis(writer, &payload),
    }
}

fn resolve_analyze_config(args: AnalyzeArgs) -> Result<AnalyzeConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

fn execute_analyze(
    config: &AnalyzeConfig,
    builder: &dyn ProviderBuilder,
) -> Result<AreaAnalysis, CliError> {
    let scoring = Arc::new(config.load_scoring_config()?);
    let provider = builder.build(config)?;
    let analyzer = match &config.facilities {
        Some(path) => {
            let loader = JsonFacilityLoader::new(path.clone());
            AreaAnalyzer::with_loader(provider, scoring, &loader)
        }
        None => {
            log::info!("no facility register given; existing facilities are not considered");
            AreaAnalyzer::new(provider, scoring, Arc::new(ExistingFacilities::new()))
        }
    };
    log::info!("analysing {:?}", config.address);
    analyzer
        .analyze(&config.address)
        .map_err(|source| CliError::Analysis {
            address: config.address.clone(),
            source,
        })
}

fn write_analysis(writer: &mut dyn Write, payload: &str) -> Result<(), CliError> {
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteStdout)?;
    writer.write_all(b"\n").map_err(CliError::WriteStdout)?;
    Ok(())
}

fn write_analysis_file(path: &Utf8Path, payload: &str) -> Result<(), CliError> {
    spacefit_fs::write_string(path, &format!("{payload}\n")).map_err(|source| {
        CliError::WriteOutput {
            path: path.to_path_buf(),
            source,
        }
    })?;
    log::info!("wrote analysis to {path}");
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<AnalyzeConfig, CliError> {
    let merged = AnalyzeArgs::merge_from_layers(layers).map_err(CliError::from)?;
    AnalyzeConfig::try_from(merged)
}
