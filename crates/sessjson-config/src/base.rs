//! Merge bookkeeping shared by every container.
//!
//! Each container embeds a [`ConfigBase`] that remembers which deltas it
//! has already merged (by content hash) and whether it changed since it
//! was last dumped. Containers then implement [`ConfigStore`], which
//! supplies everything [`ConfigObject`] needs through a blanket impl.
//!
//! # Merge rules
//!
//! ```text
//! for each (hash, data):
//!     data empty          → skip
//!     hash already merged → skip
//!     hash empty          → EmptyHash, whole batch rejected
//!     decode(data)        → Decode error, whole batch rejected
//! apply every decoded delta in order, record hashes, mark dirty
//! ```
//!
//! Decoding everything before applying anything keeps a failed batch from
//! leaving the container half-merged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{Codec, ConfigError, ConfigKind, ConfigObject, ConfigView, JsonCodec};

// ---------------------------------------------------------------------------
// CollectionDelta
// ---------------------------------------------------------------------------

/// Delta for containers that hold a keyed set of records.
///
/// `set` upserts records, `erase` removes them by key. Erasures are applied
/// after upserts. Most containers key by session id; the ones holding
/// several record shapes use a key enum instead. Missing fields decode as
/// empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned, K: DeserializeOwned"))]
pub struct CollectionDelta<T, K = String> {
    #[serde(default)]
    pub set: Vec<T>,
    #[serde(default)]
    pub erase: Vec<K>,
}

impl<T, K> Default for CollectionDelta<T, K> {
    fn default() -> Self {
        Self {
            set: Vec::new(),
            erase: Vec::new(),
        }
    }
}

impl<T, K: Ord> CollectionDelta<T, K> {
    /// Applies the delta to a map, deriving each record's key with `key`.
    pub fn apply_to(self, map: &mut BTreeMap<K, T>, key: impl Fn(&T) -> K) {
        for record in self.set {
            map.insert(key(&record), record);
        }
        for k in &self.erase {
            map.remove(k);
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigBase
// ---------------------------------------------------------------------------

/// Hash ledger and dirty flag embedded in every container.
#[derive(Debug, Clone, Default)]
pub struct ConfigBase {
    /// Accepted content hashes, in merge order.
    hashes: Vec<String>,
    /// Set by any change; cleared by `mark_dumped`.
    dirty: bool,
}

impl ConfigBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes the new deltas of a batch without applying any of them.
    ///
    /// Returns `(hash, delta)` pairs for the deltas that should be applied.
    /// Call [`record`](Self::record) with the hashes once they are.
    ///
    /// # Errors
    /// [`ConfigError::EmptyHash`] or [`ConfigError::Decode`]; the batch is
    /// then rejected as a whole.
    pub fn decode_batch<C: Codec, D: DeserializeOwned>(
        &self,
        codec: &C,
        kind: ConfigKind,
        deltas: &[(&str, &[u8])],
    ) -> Result<Vec<(String, D)>, ConfigError> {
        let mut batch: Vec<(String, D)> = Vec::new();

        for &(hash, data) in deltas {
            if data.is_empty() {
                tracing::debug!(%kind, hash, "skipping empty delta");
                continue;
            }
            if hash.is_empty() {
                tracing::warn!(%kind, "rejecting delta batch: delta without hash");
                return Err(ConfigError::EmptyHash);
            }
            if self.has_hash(hash) || batch.iter().any(|(h, _)| h == hash) {
                tracing::debug!(%kind, hash, "skipping already merged delta");
                continue;
            }

            let delta = codec.decode(data).inspect_err(|e| {
                tracing::warn!(%kind, hash, error = %e, "rejecting delta batch");
            })?;
            batch.push((hash.to_string(), delta));
        }

        Ok(batch)
    }

    /// Records hashes of applied deltas and marks the container dirty.
    pub fn record(&mut self, kind: ConfigKind, hashes: &[String]) {
        for hash in hashes {
            tracing::debug!(%kind, hash = %hash, "delta merged");
            self.hashes.push(hash.clone());
        }
        if !hashes.is_empty() {
            self.dirty = true;
        }
    }

    pub fn has_hash(&self, hash: &str) -> bool {
        self.hashes.iter().any(|h| h == hash)
    }

    pub fn hashes(&self) -> &[String] {
        &self.hashes
    }

    pub fn needs_dump(&self) -> bool {
        self.dirty
    }

    /// Marks a local change.
    pub fn touch(&mut self) {
        self.dirty = true;
    }

    pub fn mark_dumped(&mut self) {
        self.dirty = false;
    }
}

// ---------------------------------------------------------------------------
// ConfigStore
// ---------------------------------------------------------------------------

/// What a container provides so it can be used as a [`ConfigObject`].
///
/// Implementing this trait is all a container needs; the blanket impl
/// below wires merging, hash tracking, and the typed view together.
pub trait ConfigStore {
    /// What one delta decodes into.
    type Delta: DeserializeOwned;

    const KIND: ConfigKind;

    fn base(&self) -> &ConfigBase;

    fn base_mut(&mut self) -> &mut ConfigBase;

    /// Applies one decoded delta.
    fn apply_delta(&mut self, delta: Self::Delta);

    fn as_view(&self) -> ConfigView<'_>;
}

impl<T: ConfigStore> ConfigObject for T {
    fn kind_name(&self) -> &'static str {
        T::KIND.name()
    }

    fn view(&self) -> Option<ConfigView<'_>> {
        Some(self.as_view())
    }

    fn merge(&mut self, deltas: &[(&str, &[u8])]) -> Result<Vec<String>, ConfigError> {
        let batch = self
            .base()
            .decode_batch::<_, T::Delta>(&JsonCodec, T::KIND, deltas)?;

        let mut accepted = Vec::with_capacity(batch.len());
        for (hash, delta) in batch {
            self.apply_delta(delta);
            accepted.push(hash);
        }

        self.base_mut().record(T::KIND, &accepted);
        Ok(accepted)
    }

    fn current_hashes(&self) -> Vec<String> {
        self.base().hashes().to_vec()
    }

    fn needs_dump(&self) -> bool {
        self.base().needs_dump()
    }

    fn mark_dumped(&mut self) {
        self.base_mut().mark_dumped();
    }
}
