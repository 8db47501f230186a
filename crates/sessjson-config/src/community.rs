//! Community (open group server room) references.
//!
//! A community is addressed by a server base URL, a room token, and the
//! server's public key. The same base URL can be written many ways
//! (`HTTPS://Example.org:443/` vs `https://example.org`), so anything that
//! uses the URL as an identity goes through [`CommunityRef::full_url`],
//! which canonicalises both halves.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Length in bytes of a community server's public key.
pub const PUBKEY_LEN: usize = 32;

/// Base URL, room, and server key of one community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityRef {
    /// Server base URL as it was given (not canonicalised).
    pub base_url: String,
    /// Room token as it was given (case preserved for display).
    pub room: String,
    /// Server X25519 public key.
    pub pubkey: [u8; PUBKEY_LEN],
}

impl CommunityRef {
    pub fn new(
        base_url: impl Into<String>,
        room: impl Into<String>,
        pubkey: [u8; PUBKEY_LEN],
    ) -> Self {
        Self {
            base_url: base_url.into(),
            room: room.into(),
            pubkey,
        }
    }

    /// Builds a reference from a hex-encoded server key.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidPubkey`] unless `pubkey_hex` is
    /// exactly 64 hex digits.
    pub fn parse(
        base_url: impl Into<String>,
        room: impl Into<String>,
        pubkey_hex: &str,
    ) -> Result<Self, ConfigError> {
        let mut pubkey = [0u8; PUBKEY_LEN];
        hex::decode_to_slice(pubkey_hex, &mut pubkey)
            .map_err(|_| ConfigError::InvalidPubkey(pubkey_hex.to_string()))?;
        Ok(Self::new(base_url, room, pubkey))
    }

    /// The base URL, canonicalised. See [`canonical_url`].
    pub fn canonical_base_url(&self) -> String {
        canonical_url(&self.base_url)
    }

    /// The room token, lowercased.
    pub fn room_norm(&self) -> String {
        self.room.to_lowercase()
    }

    /// The server key as lowercase hex.
    pub fn pubkey_hex(&self) -> String {
        hex::encode(self.pubkey)
    }

    /// `canonical base url` + `/` + `normalized room`.
    ///
    /// This is the identity of the community: two references with the
    /// same full URL are the same community.
    pub fn full_url(&self) -> String {
        format!("{}/{}", self.canonical_base_url(), self.room_norm())
    }
}

/// Canonicalises a community base URL.
///
/// - lowercased
/// - trailing `/` removed
/// - default port dropped (`:80` for http, `:443` for https)
pub fn canonical_url(url: &str) -> String {
    let mut out = url.trim().to_ascii_lowercase();
    while out.ends_with('/') {
        out.pop();
    }

    for (scheme, port) in [("http://", ":80"), ("https://", ":443")] {
        if let Some(host) = out
            .strip_prefix(scheme)
            .and_then(|rest| rest.strip_suffix(port))
        {
            out = format!("{scheme}{host}");
            break;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_HEX: &str =
        "00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff";

    #[test]
    fn test_canonical_url_lowercases_and_strips_slash() {
        assert_eq!(canonical_url("HTTP://Example.ORG/"), "http://example.org");
        assert_eq!(canonical_url("https://x.y///"), "https://x.y");
    }

    #[test]
    fn test_canonical_url_drops_default_ports_only() {
        assert_eq!(canonical_url("http://host:80"), "http://host");
        assert_eq!(canonical_url("https://host:443/"), "https://host");
        assert_eq!(canonical_url("http://host:443"), "http://host:443");
        assert_eq!(canonical_url("https://host:8443"), "https://host:8443");
    }

    #[test]
    fn test_parse_rejects_short_key() {
        let result = CommunityRef::parse("http://host", "room", "abcd");
        assert!(matches!(result, Err(ConfigError::InvalidPubkey(_))));
    }

    #[test]
    fn test_full_url_and_pubkey_hex_are_derived() {
        let community =
            CommunityRef::parse("HTTPS://Open.Host:443/", "Lobby", &KEY_HEX.to_uppercase())
                .expect("valid key");

        assert_eq!(community.full_url(), "https://open.host/lobby");
        assert_eq!(community.pubkey_hex(), KEY_HEX);
        // The stored fields keep what the caller gave us.
        assert_eq!(community.room, "Lobby");
    }
}
