//! Error types for the DTP query builders.

use errors::{MappingError, RequestError};
use thiserror::Error;

/// Result type alias for platform calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that can occur while building or submitting a platform query.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An operation or ontology term is missing from the mappings.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// The platform call failed or returned an unusable body.
    #[error(transparent)]
    Request(#[from] RequestError)
}

impl ApiError {
    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }

    pub fn is_request(&self) -> bool {
        matches!(self, Self::Request(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_error_display_is_transparent() {
        let err: ApiError = MappingError::UnknownOperation {
            operation: "count_nodes".to_string()
        }
        .into();
        assert!(err.is_mapping());
        assert_eq!(err.to_string(), "API URL count_nodes not found");
    }

    #[test]
    fn test_request_error_conversion() {
        let err: ApiError = RequestError::Status {
            url: "https://dtp.example.org/count".to_string(),
            status: 500,
            body: String::new()
        }
        .into();
        assert!(err.is_request());
        assert!(!err.is_mapping());
    }
}
