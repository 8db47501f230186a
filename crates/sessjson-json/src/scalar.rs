//! Leaf encoders: binary blobs, optionals, durations, and enum tokens.
//!
//! Everything a composite encoder emits bottoms out here. The rules are
//! small but easy to get subtly wrong, so each lives in one function:
//!
//! | Input | JSON |
//! |---|---|
//! | empty bytes | `""` |
//! | bytes | standard base64, padded |
//! | `None` | `null` |
//! | `Duration` | integer seconds |
//! | enum | fixed snake_case token |
//! | picture with empty url | `null` |

use std::time::Duration;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use sessjson_config::{ExpirationMode, NotifyMode, ProfilePic};

/// Encodes bytes as standard base64 with padding; empty input stays empty.
pub fn encode_binary(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        String::new()
    } else {
        BASE64_STANDARD.encode(bytes)
    }
}

/// Marks a byte slice as "serialize me as base64 text".
///
/// Useful when a record is fed through serde directly instead of the
/// encoders in this crate.
///
/// ```rust
/// use sessjson_json::Base64;
///
/// let json = serde_json::to_string(&Base64(b"hi")).unwrap();
/// assert_eq!(json, r#""aGk=""#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Base64<'a>(pub &'a [u8]);

impl Serialize for Base64<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_binary(self.0))
    }
}

impl From<Base64<'_>> for Value {
    fn from(b: Base64<'_>) -> Self {
        Value::String(encode_binary(b.0))
    }
}

/// `None` → `null`, `Some(v)` → `v`.
pub fn encode_optional<T: Into<Value>>(value: Option<T>) -> Value {
    value.map_or(Value::Null, Into::into)
}

/// Whole seconds, no unit.
pub fn encode_duration(d: Duration) -> Value {
    Value::from(d.as_secs())
}

pub fn notify_mode_token(mode: NotifyMode) -> &'static str {
    match mode {
        NotifyMode::Defaulted => "default",
        NotifyMode::All => "all",
        NotifyMode::Disabled => "disabled",
        NotifyMode::MentionsOnly => "mentions_only",
    }
}

pub fn expiration_mode_token(mode: ExpirationMode) -> &'static str {
    match mode {
        ExpirationMode::None => "none",
        ExpirationMode::AfterSend => "after_send",
        ExpirationMode::AfterRead => "after_read",
    }
}

/// `null` when no picture is set, otherwise `{url, key}`.
pub fn encode_profile_pic(pic: &ProfilePic) -> Value {
    if pic.is_empty() {
        return Value::Null;
    }
    Value::Object(object([
        ("url", Value::from(pic.url.as_str())),
        ("key", Base64(&pic.key).into()),
    ]))
}

/// Builds an object whose keys keep the given order.
pub(crate) fn object<const N: usize>(fields: [(&str, Value); N]) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}
