//! Boundary adapter for sessjson.
//!
//! Two layers:
//!
//! - [`boundary`]: safe Rust functions that already follow the boundary
//!   contract (dump never fails, merge reports through a bool and a
//!   bounded message, blinding failures give empty ids).
//! - [`c_api`]: `extern "C"` functions over raw pointers, for callers
//!   on the other side of a C interface.
//!
//! Errors stay [`BoundaryError`] values until the outermost call turns
//! them into sentinels.

pub mod boundary;
pub mod c_api;
mod error;

pub use boundary::{
    BlindedIds, DEFAULT_ERROR_BUF_LEN, DumpOptions, EMPTY_DOCUMENT, MergeOptions,
    MergeReport, Message, derive_blinded_ids, dump, dump_c_string, dump_with, error_text,
    merge, merge_messages, merge_reporting, truncate_message, try_blinded_ids,
    try_dump, try_dump_c_string, write_nul_terminated,
};
pub use error::BoundaryError;
