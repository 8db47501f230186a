//! Config containers for sessjson.
//!
//! This crate holds the data the JSON layer walks:
//!
//! - **Containers** ([`Contacts`], [`ConvoInfoVolatile`], [`UserGroups`],
//!   [`Members`], [`Info`], [`UserProfile`]): the six config kinds, each
//!   with its records, accessors and natural iteration order.
//! - **Handle** ([`ConfigObject`], [`ConfigView`], [`ConfigKind`]): the
//!   opaque interface callers hold, and the closed sum type behind it.
//! - **Merging** ([`ConfigBase`], [`ConfigStore`], [`Codec`]): how
//!   `(hash, delta)` pairs are decoded and applied.
//! - **Blinding** ([`Blinder`]): hook for the external id derivation.
//! - **Errors** ([`ConfigError`]).
//!
//! # How it fits in the stack
//!
//! ```text
//! Boundary (sessjson-ffi)   ← C ABI, error buffers, ownership transfer
//!     ↕
//! JSON (sessjson-json)      ← dispatch + structural encoding
//!     ↕
//! Config (this crate)       ← containers, records, merge
//! ```

mod base;
mod blinding;
mod codec;
mod community;
mod contacts;
mod convo;
mod error;
mod groups;
mod object;
mod types;
mod user_groups;
mod user_profile;

pub use base::{CollectionDelta, ConfigBase, ConfigStore};
pub use blinding::Blinder;
pub use codec::{Codec, JsonCodec};
pub use community::{CommunityRef, PUBKEY_LEN, canonical_url};
pub use contacts::{Contact, Contacts};
pub use convo::{
    Community, Conversation, ConversationKey, ConvoInfoVolatile, Group,
    LegacyGroup, OneToOne,
};
pub use error::ConfigError;
pub use groups::{GroupMember, Info, InfoFields, Members};
pub use object::{ConfigKind, ConfigObject, ConfigView};
pub use types::{
    BLINDED_ID_PREFIX, BlindedId, ExpirationMode, GROUP_ID_PREFIX, NotifyMode,
    ProfilePic, SESSION_ID_PREFIX, check_group_id, check_session_id,
};
pub use user_groups::{
    AnyGroup, BaseGroupInfo, CommunityInfo, GroupInfo, GroupKey,
    LegacyGroupInfo, UserGroups,
};
pub use user_profile::{ProfileFields, UserProfile};
