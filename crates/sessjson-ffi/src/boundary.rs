//! The safe half of the boundary adapter.
//!
//! These functions take Rust types and return Rust types, but already
//! follow the boundary's contract: dumping never fails, merge failures
//! come back as a bool plus a bounded message, and blinding failures come
//! back as empty ids. The C ABI in [`crate::c_api`] is a thin pointer
//! translation over this module.

use std::ffi::CString;

use sessjson_config::{BlindedId, Blinder, ConfigObject};

use crate::BoundaryError;

/// Rendered when a document can't be produced at all.
pub const EMPTY_DOCUMENT: &str = "{}";

/// Size of the error buffer callers have traditionally passed to merge.
pub const DEFAULT_ERROR_BUF_LEN: usize = 256;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// How [`dump_with`] renders text.
#[derive(Debug, Clone, Default)]
pub struct DumpOptions {
    /// Indent the document. Compact by default.
    pub pretty: bool,
}

/// Bounds applied by [`merge_reporting`].
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Size of the destination buffer, terminator included. The message
    /// is cut to at most `max_error_len - 1` bytes.
    pub max_error_len: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            max_error_len: DEFAULT_ERROR_BUF_LEN,
        }
    }
}

// ---------------------------------------------------------------------------
// Dump
// ---------------------------------------------------------------------------

/// Renders a config as JSON text.
///
/// # Errors
/// [`BoundaryError::Serialize`] if the document can't be written.
pub fn try_dump(config: &dyn ConfigObject, options: &DumpOptions) -> Result<String, BoundaryError> {
    let value = sessjson_json::to_json(config);
    let text = if options.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(text)
}

/// Compact JSON text for any config. Never fails.
pub fn dump(config: &dyn ConfigObject) -> String {
    dump_with(config, &DumpOptions::default())
}

/// Like [`dump`], with rendering options.
pub fn dump_with(config: &dyn ConfigObject, options: &DumpOptions) -> String {
    try_dump(config, options).unwrap_or_else(|e| {
        tracing::error!(kind = config.kind_name(), error = %e, "dump failed");
        EMPTY_DOCUMENT.to_string()
    })
}

/// The dump as an owned, NUL-terminated C string.
///
/// # Errors
/// [`BoundaryError::Serialize`] or [`BoundaryError::InteriorNul`].
pub fn try_dump_c_string(config: &dyn ConfigObject) -> Result<CString, BoundaryError> {
    let text = try_dump(config, &DumpOptions::default())?;
    CString::new(text).map_err(|_| BoundaryError::InteriorNul)
}

/// The dump as an owned C string. Never fails; worst case `{}`.
pub fn dump_c_string(config: &dyn ConfigObject) -> CString {
    try_dump_c_string(config).unwrap_or_else(|e| {
        tracing::error!(kind = config.kind_name(), error = %e, "dump failed");
        c"{}".to_owned()
    })
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// One retrieved config message: a content hash and the delta it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub hash: String,
    pub data: Vec<u8>,
}

impl Message {
    pub fn new(hash: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            hash: hash.into(),
            data: data.into(),
        }
    }
}

/// Outcome of [`merge_reporting`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MergeReport {
    /// At least one delta was accepted.
    pub accepted: bool,
    /// Failure text, already cut to fit. `None` on success or skip.
    pub error: Option<String>,
}

/// Merges one `(hash, delta)` pair.
///
/// Returns `true` iff the delta was accepted; an empty or already seen
/// delta gives `Ok(false)`.
///
/// # Errors
/// [`BoundaryError::Merge`] if the config rejected it.
pub fn merge(config: &mut dyn ConfigObject, delta: &[u8], hash: &str) -> Result<bool, BoundaryError> {
    let accepted = config
        .merge(&[(hash, delta)])
        .map_err(BoundaryError::Merge)?;
    Ok(!accepted.is_empty())
}

/// [`merge`] with the failure flattened into a bounded message.
pub fn merge_reporting(
    config: &mut dyn ConfigObject,
    delta: &[u8],
    hash: &str,
    options: &MergeOptions,
) -> MergeReport {
    match merge(config, delta, hash) {
        Ok(accepted) => MergeReport {
            accepted,
            error: None,
        },
        Err(e) => {
            let message = error_text(&e);
            let max = options.max_error_len.saturating_sub(1);
            MergeReport {
                accepted: false,
                error: Some(truncate_message(&message, max).to_string()),
            }
        }
    }
}

/// The text a caller's error buffer receives: the underlying config error
/// for merge and blinding failures, without the boundary's prefix.
pub fn error_text(err: &BoundaryError) -> String {
    match err {
        BoundaryError::Merge(cause) | BoundaryError::Blinding(cause) => cause.to_string(),
        other => other.to_string(),
    }
}

/// Merges messages one at a time and returns how many were accepted.
///
/// Messages that are skipped (empty or already merged) aren't counted.
///
/// # Errors
/// Stops at the first rejected message. Earlier messages stay merged.
pub fn merge_messages(config: &mut dyn ConfigObject, messages: &[Message]) -> Result<usize, BoundaryError> {
    let mut merged = 0;
    for msg in messages {
        if merge(config, &msg.data, &msg.hash)? {
            merged += 1;
        }
    }
    tracing::debug!(
        kind = config.kind_name(),
        merged,
        total = messages.len(),
        "messages merged"
    );
    Ok(merged)
}

/// Longest prefix of `message` that fits in `max_bytes` without splitting
/// a UTF-8 sequence.
pub fn truncate_message(message: &str, max_bytes: usize) -> &str {
    if message.len() <= max_bytes {
        return message;
    }
    let mut end = max_bytes;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    &message[..end]
}

/// Copies `message` into `buf` as a NUL-terminated string, truncating so
/// the terminator always fits. Returns the number of text bytes written.
///
/// Nothing is written to an empty buffer.
pub fn write_nul_terminated(buf: &mut [u8], message: &str) -> usize {
    let Some(max) = buf.len().checked_sub(1) else {
        return 0;
    };
    let text = truncate_message(message, max).as_bytes();
    buf[..text.len()].copy_from_slice(text);
    buf[text.len()] = 0;
    text.len()
}

// ---------------------------------------------------------------------------
// Blinding
// ---------------------------------------------------------------------------

/// Both candidate blinded ids, empty when derivation failed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlindedIds {
    pub id1: String,
    pub id2: String,
}

impl BlindedIds {
    pub fn is_empty(&self) -> bool {
        self.id1.is_empty() && self.id2.is_empty()
    }
}

/// Derives both blinded ids. On failure logs an error and returns empty
/// ids.
pub fn derive_blinded_ids(blinder: &dyn Blinder, session_id: &str, server_pk: &str) -> BlindedIds {
    match blinder.blind15_ids(session_id, server_pk) {
        Ok((id1, id2)) => BlindedIds { id1, id2 },
        Err(e) => {
            tracing::error!(session_id, server_pk, error = %e, "failed to derive blinded ids");
            BlindedIds::default()
        }
    }
}

/// Derives both blinded ids and checks they are well formed.
///
/// # Errors
/// [`BoundaryError::Blinding`] if the blinder fails or returns something
/// that isn't a `15` id.
pub fn try_blinded_ids(
    blinder: &dyn Blinder,
    session_id: &str,
    server_pk: &str,
) -> Result<(BlindedId, BlindedId), BoundaryError> {
    let (id1, id2) = blinder
        .blind15_ids(session_id, server_pk)
        .map_err(BoundaryError::Blinding)?;
    let id1: BlindedId = id1.parse().map_err(BoundaryError::Blinding)?;
    let id2: BlindedId = id2.parse().map_err(BoundaryError::Blinding)?;
    Ok((id1, id2))
}
