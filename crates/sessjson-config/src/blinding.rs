//! Blinding hook for deriving community-scoped ids.
//!
//! sessjson doesn't implement blinding itself; the curve arithmetic
//! belongs to whatever crypto library the host application links.
//! Instead it defines the [`Blinder`] trait: one method that takes a
//! session id and a community server key and returns the two candidate
//! blinded ids. The boundary adapter forwards to it.

use crate::ConfigError;

/// Derives "blind15" ids for a session id on one community server.
///
/// Two ids come back because the session id's X25519 key maps to two
/// Ed25519 keys (differing in sign); the server may know the user by
/// either.
///
/// # Example
///
/// ```rust
/// use sessjson_config::{Blinder, ConfigError};
///
/// /// Refuses everything. Handy where blinding must never succeed.
/// struct NoBlinding;
///
/// impl Blinder for NoBlinding {
///     fn blind15_ids(
///         &self,
///         _session_id: &str,
///         _server_pk: &str,
///     ) -> Result<(String, String), ConfigError> {
///         Err(ConfigError::Blinding("blinding disabled".into()))
///     }
/// }
/// ```
pub trait Blinder {
    /// Returns `(id1, id2)`, each `15` + 64 hex digits.
    ///
    /// # Arguments
    /// - `session_id`: the user's `05` session id
    /// - `server_pk`: the community server's X25519 key, hex encoded
    ///
    /// # Errors
    /// [`ConfigError::Blinding`] (or an id error) if either input is
    /// unusable.
    fn blind15_ids(
        &self,
        session_id: &str,
        server_pk: &str,
    ) -> Result<(String, String), ConfigError>;
}

impl<B: Blinder + ?Sized> Blinder for &B {
    fn blind15_ids(
        &self,
        session_id: &str,
        server_pk: &str,
    ) -> Result<(String, String), ConfigError> {
        (**self).blind15_ids(session_id, server_pk)
    }
}
