//! # sessjson
//!
//! Canonical JSON dumps of session config containers, plus delta merging
//! and blinded id derivation behind a boundary that never unwinds.
//!
//! The workspace is split in layers; this crate re-exports all of them:
//!
//! - [`config`]: containers, records, merge bookkeeping, [`Blinder`]
//! - [`json`]: kind dispatch and structural encoding
//! - [`ffi`]: safe boundary wrappers and the C ABI
//!
//! ## Quick Start
//!
//! ```rust
//! use sessjson::prelude::*;
//!
//! let mut contacts = Contacts::new();
//! let mut c = contacts
//!     .get_or_construct("050000000000000000000000000000000000000000000000000000000000000000")
//!     .unwrap();
//! c.name = "Test User".into();
//! contacts.set(c);
//!
//! let text = dump(&contacts);
//! assert!(text.contains(r#""name":"Test User""#));
//! ```

mod error;
pub mod logging;

pub use sessjson_config as config;
pub use sessjson_ffi as ffi;
pub use sessjson_json as json;

pub use error::SessjsonError;
pub use sessjson_config::Blinder;

/// The common imports for working with sessjson.
pub mod prelude {
    pub use crate::SessjsonError;
    pub use sessjson_config::{
        AnyGroup, Blinder, CollectionDelta, Codec, CommunityRef, ConfigKind,
        ConfigObject, ConfigView, Contact, Contacts, Conversation,
        ConvoInfoVolatile, ExpirationMode, GroupMember, Info, JsonCodec,
        Members, NotifyMode, ProfilePic, UserGroups, UserProfile,
    };
    pub use sessjson_ffi::{
        BlindedIds, DumpOptions, MergeOptions, MergeReport, Message,
        derive_blinded_ids, dump, dump_with, merge, merge_messages,
        merge_reporting,
    };
    pub use sessjson_json::to_json;
}
