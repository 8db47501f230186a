//! Error types for the config layer.
//!
//! Everything that can go wrong while touching a config container lands
//! here: a delta that doesn't decode, an identifier with the wrong shape,
//! or a blinding routine that refused its input. Layers above convert
//! these into their own sentinel values; this crate only ever returns
//! `Result<_, ConfigError>`.

/// Errors that can occur while reading, mutating, or merging a config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A delta could not be decoded into the container's delta type.
    ///
    /// The message is what ends up in the caller's error buffer at the
    /// boundary, so it is kept as serde_json reports it.
    #[error("delta decode failed: {0}")]
    Decode(serde_json::Error),

    /// A delta could not be encoded.
    #[error("delta encode failed: {0}")]
    Encode(serde_json::Error),

    /// A non-empty delta arrived without a content hash.
    #[error("delta has data but no content hash")]
    EmptyHash,

    /// The string is not a `05`/`03` prefixed, 64 hex digit identifier.
    #[error("invalid session id: {0:?}")]
    InvalidSessionId(String),

    /// A public key was not 32 bytes of hex.
    #[error("invalid public key: {0:?}")]
    InvalidPubkey(String),

    /// The blinding routine rejected its input.
    #[error("blinding failed: {0}")]
    Blinding(String),
}
