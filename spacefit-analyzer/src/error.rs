use spacefit_core::ProviderError;
use thiserror::Error;

/// Failures surfaced by [`crate::AreaAnalyzer`].
///
/// Only problems with the request or the location provider reach callers.
/// Scoring and report assembly never fail: missing data degrades to zeroed
/// or empty sections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The address was blank or the provider rejected the request.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the request.
        message: String,
    },
    /// Geocoding found no location for the address.
    #[error("address not found: {address}")]
    AddressNotFound {
        /// Address as submitted.
        address: String,
    },
    /// The location provider failed.
    #[error("location provider unavailable: {source}")]
    ProviderUnavailable {
        /// Underlying provider failure.
        #[source]
        source: ProviderError,
    },
}

impl From<ProviderError> for AnalysisError {
    fn from(source: ProviderError) -> Self {
        match source {
            ProviderError::InvalidRequest { message } => Self::InvalidInput { message },
            other => Self::ProviderUnavailable { source: other },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn malformed_requests_become_invalid_input() {
        let err = AnalysisError::from(ProviderError::InvalidRequest {
            message: "query is empty".to_owned(),
        });
        assert_eq!(
            err,
            AnalysisError::InvalidInput {
                message: "query is empty".to_owned()
            }
        );
    }

    #[rstest]
    #[case(ProviderError::Unauthorized)]
    #[case(ProviderError::Timeout { message: "30s elapsed".to_owned() })]
    #[case(ProviderError::HttpStatus { status: 503, message: "maintenance".to_owned() })]
    fn other_failures_mean_the_provider_is_unavailable(#[case] source: ProviderError) {
        let err = AnalysisError::from(source.clone());
        assert_eq!(err, AnalysisError::ProviderUnavailable { source });
    }
}
