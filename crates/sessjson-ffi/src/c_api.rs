//! C ABI over the safe boundary layer.
//!
//! Ownership rules:
//!
//! - `sessjson_config_new` returns a handle; release it with
//!   `sessjson_config_free`.
//! - `sessjson_config_dump_json` returns a string; release it with
//!   `sessjson_string_free`.
//! - `sessjson_create_blind15_id` returns two buffers; release them with
//!   `sessjson_blinded_ids_free`.
//!
//! Nothing is retained between calls. No function lets a panic unwind
//! into the caller; each one has a sentinel return instead.
//!
//! ```c
//! sessjson_config *cfg = sessjson_config_new(SESSJSON_CONTACTS, NULL, 0);
//! char err[256];
//! if (!sessjson_config_merge(cfg, data, data_len, hash, hash_len, err, sizeof err))
//!     fprintf(stderr, "merge: %s\n", err);
//! char *json = sessjson_config_dump_json(cfg);
//! puts(json);
//! sessjson_string_free(json);
//! sessjson_config_free(cfg);
//! ```

use std::ffi::{CString, c_char, c_void};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::ptr;

use sessjson_config::{
    Blinder, ConfigError, ConfigKind, ConfigObject, Contacts, ConvoInfoVolatile,
    Info, Members, UserGroups, UserProfile,
};

use crate::boundary::{self, BlindedIds, EMPTY_DOCUMENT};

/// Length of a textual blinded id (`15` + 64 hex digits).
pub const SESSJSON_BLINDED_ID_LEN: usize = 66;

/// Opaque config handle handed to C.
pub struct SessjsonConfig {
    inner: Box<dyn ConfigObject>,
}

/// Two blinded ids, each an independently allocated buffer with an
/// explicit length. Not NUL-terminated. Both null on failure.
#[repr(C)]
#[derive(Debug)]
pub struct SessjsonBlindedIds {
    pub id1: *mut c_char,
    pub id1_len: usize,
    pub id2: *mut c_char,
    pub id2_len: usize,
}

impl SessjsonBlindedIds {
    fn empty() -> Self {
        Self {
            id1: ptr::null_mut(),
            id1_len: 0,
            id2: ptr::null_mut(),
            id2_len: 0,
        }
    }
}

/// The caller's blinding routine.
///
/// Receives the session id and the server key (hex text, not
/// NUL-terminated) and must write exactly [`SESSJSON_BLINDED_ID_LEN`]
/// bytes to each of `id1_out` and `id2_out`. Returns `false` on failure.
pub type SessjsonBlindFn = unsafe extern "C" fn(
    user: *mut c_void,
    session_id: *const c_char,
    session_id_len: usize,
    server_pk: *const c_char,
    server_pk_len: usize,
    id1_out: *mut c_char,
    id2_out: *mut c_char,
) -> bool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Runs `f`, turning a panic into `fallback()`.
fn guard<T>(name: &'static str, fallback: impl FnOnce() -> T, f: impl FnOnce() -> T) -> T {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        tracing::error!(function = name, "panic caught at the C boundary");
        fallback()
    })
}

/// # Safety
/// Unless null or `len == 0`, `ptr` must be valid for `len` reads.
unsafe fn bytes<'a>(ptr: *const u8, len: usize) -> &'a [u8] {
    if ptr.is_null() || len == 0 {
        &[]
    } else {
        // SAFETY: upheld by the caller.
        unsafe { std::slice::from_raw_parts(ptr, len) }
    }
}

/// # Safety
/// Same as [`bytes`].
unsafe fn text<'a>(ptr: *const c_char, len: usize) -> Result<&'a str, std::str::Utf8Error> {
    // SAFETY: upheld by the caller.
    std::str::from_utf8(unsafe { bytes(ptr.cast(), len) })
}

/// Hands a byte buffer to C. Empty input gives `(null, 0)`.
fn into_raw_buffer(data: String) -> (*mut c_char, usize) {
    if data.is_empty() {
        return (ptr::null_mut(), 0);
    }
    let boxed = data.into_bytes().into_boxed_slice();
    let len = boxed.len();
    (Box::into_raw(boxed).cast::<c_char>(), len)
}

/// # Safety
/// `(ptr, len)` must come from [`into_raw_buffer`] and not be freed yet.
unsafe fn free_raw_buffer(ptr: *mut c_char, len: usize) {
    if !ptr.is_null() {
        // SAFETY: upheld by the caller.
        drop(unsafe { Box::from_raw(ptr::slice_from_raw_parts_mut(ptr.cast::<u8>(), len)) });
    }
}

fn new_config(kind: ConfigKind, id: &str) -> Result<Box<dyn ConfigObject>, ConfigError> {
    let config: Box<dyn ConfigObject> = match kind {
        ConfigKind::UserProfile => Box::new(UserProfile::new()),
        ConfigKind::ConvoInfoVolatile => Box::new(ConvoInfoVolatile::new()),
        ConfigKind::UserGroups => Box::new(UserGroups::new()),
        ConfigKind::Contacts => Box::new(Contacts::new()),
        ConfigKind::Members => Box::new(Members::new()),
        ConfigKind::Info => Box::new(Info::new(id)?),
    };
    Ok(config)
}

/// Adapts a C blinding callback to [`Blinder`].
struct CallbackBlinder {
    blind_fn: SessjsonBlindFn,
    user: *mut c_void,
}

impl Blinder for CallbackBlinder {
    fn blind15_ids(&self, session_id: &str, server_pk: &str) -> Result<(String, String), ConfigError> {
        let mut id1 = [0u8; SESSJSON_BLINDED_ID_LEN];
        let mut id2 = [0u8; SESSJSON_BLINDED_ID_LEN];

        // SAFETY: inputs are valid for their lengths and both outputs are
        // SESSJSON_BLINDED_ID_LEN bytes, as the callback contract requires.
        let ok = unsafe {
            (self.blind_fn)(
                self.user,
                session_id.as_ptr().cast(),
                session_id.len(),
                server_pk.as_ptr().cast(),
                server_pk.len(),
                id1.as_mut_ptr().cast(),
                id2.as_mut_ptr().cast(),
            )
        };
        if !ok {
            return Err(ConfigError::Blinding("blinding callback rejected its input".into()));
        }

        let decode = |raw: &[u8]| {
            String::from_utf8(raw.to_vec()).map_err(|e| ConfigError::Blinding(e.to_string()))
        };
        Ok((decode(&id1[..])?, decode(&id2[..])?))
    }
}

// ---------------------------------------------------------------------------
// FFI: new / free
// ---------------------------------------------------------------------------

/// Creates an empty config of kind `kind` (see `ConfigKind::code`).
///
/// `id` is only read for `Info`, which needs its `03` group id. Returns
/// null for an unknown kind or a bad id.
///
/// # Safety
/// Unless null, `id` must be valid for `id_len` reads.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sessjson_config_new(
    kind: u32,
    id: *const c_char,
    id_len: usize,
) -> *mut SessjsonConfig {
    guard("sessjson_config_new", ptr::null_mut, || {
        let Some(kind) = ConfigKind::from_code(kind) else {
            tracing::warn!(kind, "unknown config kind");
            return ptr::null_mut();
        };
        // SAFETY: upheld by the caller.
        let id = unsafe { text(id, id_len) }.unwrap_or_default();
        match new_config(kind, id) {
            Ok(inner) => Box::into_raw(Box::new(SessjsonConfig { inner })),
            Err(e) => {
                tracing::warn!(%kind, error = %e, "config construction failed");
                ptr::null_mut()
            }
        }
    })
}

/// Releases a handle from `sessjson_config_new`. Null is ignored.
///
/// # Safety
/// `cfg` must come from `sessjson_config_new` and not be freed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sessjson_config_free(cfg: *mut SessjsonConfig) {
    if cfg.is_null() {
        return;
    }
    // SAFETY: upheld by the caller.
    drop(unsafe { Box::from_raw(cfg) });
}

// ---------------------------------------------------------------------------
// FFI: dump
// ---------------------------------------------------------------------------

/// Dumps a config as a NUL-terminated JSON string. Never returns null;
/// a null handle dumps as `{}`.
///
/// # Safety
/// Unless null, `cfg` must be a live handle from `sessjson_config_new`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sessjson_config_dump_json(cfg: *const SessjsonConfig) -> *mut c_char {
    let empty = || CString::from(c"{}").into_raw();
    guard("sessjson_config_dump_json", empty, || {
        // SAFETY: upheld by the caller.
        match unsafe { cfg.as_ref() } {
            Some(cfg) => boundary::dump_c_string(cfg.inner.as_ref()).into_raw(),
            None => {
                tracing::debug!("null config handle, dumping {}", EMPTY_DOCUMENT);
                empty()
            }
        }
    })
}

/// Releases a string from `sessjson_config_dump_json`. Null is ignored.
///
/// # Safety
/// `s` must come from `sessjson_config_dump_json` and not be freed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sessjson_string_free(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    // SAFETY: upheld by the caller.
    drop(unsafe { CString::from_raw(s) });
}

// ---------------------------------------------------------------------------
// FFI: merge
// ---------------------------------------------------------------------------

/// Merges one `(hash, delta)` pair. Returns `true` iff it was accepted.
///
/// On failure the message is copied into `error_buf`, cut to
/// `error_buf_len - 1` bytes and NUL-terminated. Otherwise a single NUL
/// is written. Nothing is ever written past `error_buf_len`; a null
/// buffer is allowed.
///
/// # Safety
/// - `cfg` must be a live handle (or null).
/// - `data`/`hash` must be valid for their lengths (or null with length 0).
/// - Unless null, `error_buf` must be valid for `error_buf_len` writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sessjson_config_merge(
    cfg: *mut SessjsonConfig,
    data: *const u8,
    data_len: usize,
    hash: *const c_char,
    hash_len: usize,
    error_buf: *mut c_char,
    error_buf_len: usize,
) -> bool {
    let report = |message: &str| {
        if !error_buf.is_null() {
            // SAFETY: upheld by the caller.
            let buf = unsafe { std::slice::from_raw_parts_mut(error_buf.cast::<u8>(), error_buf_len) };
            boundary::write_nul_terminated(buf, message);
        }
    };

    let outcome = guard(
        "sessjson_config_merge",
        || Err("panic during merge".to_string()),
        || {
            // SAFETY: upheld by the caller.
            let Some(cfg) = (unsafe { cfg.as_mut() }) else {
                return Err("null config handle".to_string());
            };
            // SAFETY: upheld by the caller.
            let data = unsafe { bytes(data, data_len) };
            // SAFETY: upheld by the caller.
            let hash = unsafe { text(hash, hash_len) }
                .map_err(|e| format!("hash is not valid utf-8: {e}"))?;

            boundary::merge(cfg.inner.as_mut(), data, hash).map_err(|e| boundary::error_text(&e))
        },
    );

    match outcome {
        Ok(accepted) => {
            report("");
            accepted
        }
        Err(message) => {
            report(&message);
            false
        }
    }
}

// ---------------------------------------------------------------------------
// FFI: blinding
// ---------------------------------------------------------------------------

/// Derives both blinded ids for `session_id` on the server with key
/// `server_pk`, using the caller's `blind_fn`.
///
/// Returns both ids null with zero length if the callback is missing, an
/// input isn't UTF-8, or the callback fails.
///
/// # Safety
/// - `session_id`/`server_pk` must be valid for their lengths.
/// - `blind_fn` must honour [`SessjsonBlindFn`]'s contract; `user` is
///   passed through untouched.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sessjson_create_blind15_id(
    blind_fn: Option<SessjsonBlindFn>,
    user: *mut c_void,
    session_id: *const c_char,
    session_id_len: usize,
    server_pk: *const c_char,
    server_pk_len: usize,
) -> SessjsonBlindedIds {
    guard("sessjson_create_blind15_id", SessjsonBlindedIds::empty, || {
        let Some(blind_fn) = blind_fn else {
            tracing::error!("no blinding callback supplied");
            return SessjsonBlindedIds::empty();
        };
        // SAFETY: upheld by the caller.
        let inputs = unsafe { (text(session_id, session_id_len), text(server_pk, server_pk_len)) };
        let (Ok(session_id), Ok(server_pk)) = inputs else {
            tracing::error!("blinding inputs are not valid utf-8");
            return SessjsonBlindedIds::empty();
        };

        let blinder = CallbackBlinder { blind_fn, user };
        let BlindedIds { id1, id2 } = boundary::derive_blinded_ids(&blinder, session_id, server_pk);
        if id1.is_empty() || id2.is_empty() {
            return SessjsonBlindedIds::empty();
        }

        let (id1, id1_len) = into_raw_buffer(id1);
        let (id2, id2_len) = into_raw_buffer(id2);
        SessjsonBlindedIds {
            id1,
            id1_len,
            id2,
            id2_len,
        }
    })
}

/// Releases both buffers of a `SessjsonBlindedIds` and nulls them out.
///
/// # Safety
/// Unless null, `ids` must point to a value returned by
/// `sessjson_create_blind15_id` whose buffers haven't been freed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sessjson_blinded_ids_free(ids: *mut SessjsonBlindedIds) {
    // SAFETY: upheld by the caller.
    let Some(ids) = (unsafe { ids.as_mut() }) else {
        return;
    };
    // SAFETY: both buffers came from `into_raw_buffer`.
    unsafe {
        free_raw_buffer(ids.id1, ids.id1_len);
        free_raw_buffer(ids.id2, ids.id2_len);
    }
    *ids = SessjsonBlindedIds::empty();
}
