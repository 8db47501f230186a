//! Unified error type for sessjson.

use sessjson_config::ConfigError;
use sessjson_ffi::BoundaryError;

/// Top-level error that wraps every crate-specific error.
///
/// Using the `sessjson` meta-crate, this is the one error type to match
/// on. The `#[from]` attributes let `?` convert sub-crate errors.
#[derive(Debug, thiserror::Error)]
pub enum SessjsonError {
    /// A config-level error (decode, bad id, blinding).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A boundary-level error (merge rejected, rendering).
    #[error(transparent)]
    Boundary(#[from] BoundaryError),

    /// A JSON document could not be written or read.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_error() {
        let err = ConfigError::InvalidSessionId("05zz".into());
        let sessjson_err: SessjsonError = err.into();
        assert!(matches!(sessjson_err, SessjsonError::Config(_)));
        assert!(sessjson_err.to_string().contains("05zz"));
    }

    #[test]
    fn test_from_boundary_error() {
        let err = BoundaryError::Merge(ConfigError::EmptyHash);
        let sessjson_err: SessjsonError = err.into();
        assert!(matches!(sessjson_err, SessjsonError::Boundary(_)));
        assert!(sessjson_err.to_string().starts_with("merge rejected"));
    }

    #[test]
    fn test_from_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let sessjson_err: SessjsonError = err.into();
        assert!(matches!(sessjson_err, SessjsonError::Json(_)));
    }
}
