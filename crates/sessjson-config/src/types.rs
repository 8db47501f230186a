//! Shared value types used across every config container.
//!
//! These are the small building blocks the records are made of:
//! notification and expiration modes, profile pictures, and the
//! identifier formats (`05…` session ids, `03…` group ids, `15…`
//! blinded ids).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Number of hex digits after the two-character prefix of an identifier.
const ID_HEX_LEN: usize = 64;

/// Prefix of a one-to-one session id (an X25519 public key).
pub const SESSION_ID_PREFIX: &str = "05";

/// Prefix of a closed group id (an Ed25519 public key).
pub const GROUP_ID_PREFIX: &str = "03";

/// Prefix of a blinded id derived for a community server.
pub const BLINDED_ID_PREFIX: &str = "15";

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// How a conversation notifies the user about new messages.
///
/// `Defaulted` means "no explicit choice, follow the app setting".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum NotifyMode {
    #[default]
    Defaulted,
    All,
    Disabled,
    MentionsOnly,
}

/// When disappearing messages start their countdown.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ExpirationMode {
    /// Messages never disappear.
    #[default]
    None,
    /// Countdown starts when the message is sent.
    AfterSend,
    /// Countdown starts when the message is read.
    AfterRead,
}

// ---------------------------------------------------------------------------
// ProfilePic
// ---------------------------------------------------------------------------

/// A profile picture: where to download it and the key to decrypt it.
///
/// A picture with an empty `url` is "no picture"; the key carries no
/// meaning on its own in that case.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfilePic {
    pub url: String,
    #[serde(default)]
    pub key: Vec<u8>,
}

impl ProfilePic {
    pub fn new(url: impl Into<String>, key: impl Into<Vec<u8>>) -> Self {
        Self {
            url: url.into(),
            key: key.into(),
        }
    }

    /// Returns `true` if no picture is set.
    pub fn is_empty(&self) -> bool {
        self.url.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Checks that `id` is `prefix` followed by 64 hex digits.
fn check_prefixed_hex(id: &str, prefix: &str) -> bool {
    id.len() == prefix.len() + ID_HEX_LEN
        && id.starts_with(prefix)
        && id[prefix.len()..].bytes().all(|b| b.is_ascii_hexdigit())
}

/// Validates a one-to-one session id (`05` + 64 hex digits).
///
/// # Errors
/// Returns [`ConfigError::InvalidSessionId`] if the shape is wrong.
pub fn check_session_id(id: &str) -> Result<(), ConfigError> {
    if check_prefixed_hex(id, SESSION_ID_PREFIX) {
        Ok(())
    } else {
        Err(ConfigError::InvalidSessionId(id.to_string()))
    }
}

/// Validates a closed group id (`03` + 64 hex digits).
///
/// # Errors
/// Returns [`ConfigError::InvalidSessionId`] if the shape is wrong.
pub fn check_group_id(id: &str) -> Result<(), ConfigError> {
    if check_prefixed_hex(id, GROUP_ID_PREFIX) {
        Ok(())
    } else {
        Err(ConfigError::InvalidSessionId(id.to_string()))
    }
}

/// A blinded id (`15` + 64 hex digits) as produced by a [`Blinder`].
///
/// Newtype over the textual form so a blinded id can't be mixed up with
/// a plain session id in a function signature.
///
/// [`Blinder`]: crate::Blinder
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlindedId(String);

impl BlindedId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for BlindedId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if check_prefixed_hex(s, BLINDED_ID_PREFIX) {
            Ok(Self(s.to_ascii_lowercase()))
        } else {
            Err(ConfigError::InvalidSessionId(s.to_string()))
        }
    }
}

impl fmt::Display for BlindedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex64(c: char) -> String {
        std::iter::repeat_n(c, ID_HEX_LEN).collect()
    }

    #[test]
    fn test_check_session_id_accepts_05_prefix() {
        assert!(check_session_id(&format!("05{}", hex64('a'))).is_ok());
    }

    #[test]
    fn test_check_session_id_rejects_wrong_prefix_and_length() {
        assert!(check_session_id(&format!("03{}", hex64('a'))).is_err());
        assert!(check_session_id("05abcd").is_err());
        assert!(check_session_id(&format!("05{}", hex64('z'))).is_err());
    }

    #[test]
    fn test_check_group_id_accepts_03_prefix() {
        assert!(check_group_id(&format!("03{}", hex64('0'))).is_ok());
        assert!(check_group_id(&format!("05{}", hex64('0'))).is_err());
    }

    #[test]
    fn test_blinded_id_parse_and_display() {
        let raw = format!("15{}", hex64('B'));
        let id: BlindedId = raw.parse().expect("valid blinded id");
        assert_eq!(id.to_string(), raw.to_ascii_lowercase());
        assert!("".parse::<BlindedId>().is_err());
    }

    #[test]
    fn test_profile_pic_is_empty_only_by_url() {
        assert!(ProfilePic::new("", vec![1, 2, 3]).is_empty());
        assert!(!ProfilePic::new("http://x/y", Vec::new()).is_empty());
    }

    #[test]
    fn test_modes_default() {
        assert_eq!(NotifyMode::default(), NotifyMode::Defaulted);
        assert_eq!(ExpirationMode::default(), ExpirationMode::None);
    }
}
