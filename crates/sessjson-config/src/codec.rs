//! Codec for the deltas a container can merge.
//!
//! A delta arrives as opaque bytes addressed by a content hash. The
//! container doesn't care HOW those bytes encode its delta type, it just
//! needs something that implements [`Codec`]. [`JsonCodec`] is the only
//! implementation shipped; it is also what tests and the demo use to
//! produce valid deltas.

use serde::{Serialize, de::DeserializeOwned};

use crate::ConfigError;

/// Turns delta values into bytes and back.
///
/// The methods are generic so one codec value serves every container's
/// delta type:
/// - `encode<T: Serialize>` → T can be turned into bytes
/// - `decode<T: DeserializeOwned>` → T can be created from bytes, owning
///   all its data so the input buffer can be dropped right after.
pub trait Codec {
    /// Serializes a delta into bytes.
    ///
    /// # Errors
    /// Returns [`ConfigError::Encode`] if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ConfigError>;

    /// Deserializes bytes back into a delta.
    ///
    /// # Errors
    /// Returns [`ConfigError::Decode`] if the bytes are malformed or don't
    /// match the expected delta type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ConfigError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ## Example
///
/// ```rust
/// use sessjson_config::{Codec, CollectionDelta, JsonCodec};
///
/// let delta: CollectionDelta<String> = CollectionDelta {
///     set: vec!["a".into()],
///     erase: vec![],
/// };
///
/// let bytes = JsonCodec.encode(&delta).unwrap();
/// let decoded: CollectionDelta<String> = JsonCodec.decode(&bytes).unwrap();
/// assert_eq!(decoded.set, vec!["a".to_string()]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ConfigError> {
        serde_json::to_vec(value).map_err(ConfigError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ConfigError> {
        serde_json::from_slice(data).map_err(ConfigError::Decode)
    }
}
