//! Error types for the boundary layer.
//!
//! These only exist on the Rust side of the boundary. Every `extern "C"`
//! function turns them into its sentinel (a `false`, a null pointer, a
//! `"{}"` document) before returning.

use sessjson_config::ConfigError;

/// Errors that can occur while servicing a boundary call.
#[derive(Debug, thiserror::Error)]
pub enum BoundaryError {
    /// The config rejected the delta batch.
    #[error("merge rejected: {0}")]
    Merge(#[source] ConfigError),

    /// The blinding routine failed or returned a malformed id.
    #[error("blinded id derivation failed: {0}")]
    Blinding(#[source] ConfigError),

    /// A JSON document could not be rendered to text.
    #[error("json rendering failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Text bound for C contained a NUL byte.
    #[error("text contains an interior nul byte")]
    InteriorNul,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_error_message_includes_cause() {
        let err = BoundaryError::Merge(ConfigError::EmptyHash);
        assert_eq!(
            err.to_string(),
            "merge rejected: delta has data but no content hash"
        );
    }

    #[test]
    fn test_source_is_config_error() {
        use std::error::Error;

        let err = BoundaryError::Blinding(ConfigError::Blinding("bad key".into()));
        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("blinding failed: bad key"));
    }
}
