//! Error types emitted by the SpaceFit CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use spacefit_analyzer::AnalysisError;
use spacefit_core::ConfigError;
use spacefit_data::kakao::ProviderBuildError;
use thiserror::Error;

/// Errors emitted by the SpaceFit CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// A referenced input path does not exist on disk or is not a file.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        /// Flag naming the path.
        field: &'static str,
        /// Path as given.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the path.
        field: &'static str,
        /// Path as given.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// The scoring configuration could not be loaded.
    #[error(transparent)]
    ScoringConfig(#[from] ConfigError),
    /// Constructing the Kakao provider failed.
    #[error("failed to build Kakao provider for {base_url:?}: {source}")]
    BuildProvider {
        /// Base URL the provider was configured with.
        base_url: String,
        /// Underlying failure.
        #[source]
        source: ProviderBuildError,
    },
    /// The analysis itself failed.
    #[error("failed to analyse {address:?}: {source}")]
    Analysis {
        /// Address as given.
        address: String,
        /// Underlying failure.
        #[source]
        source: AnalysisError,
    },
    /// Serialising the analysis failed.
    #[error("failed to serialise analysis: {0}")]
    SerialiseAnalysis(#[source] serde_json::Error),
    /// Writing the analysis to a file failed.
    #[error("failed to write analysis to {path:?}: {source}")]
    WriteOutput {
        /// Destination path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// Writing the analysis to stdout failed.
    #[error("failed to write analysis: {0}")]
    WriteStdout(#[source] std::io::Error),
}
