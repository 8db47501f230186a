//! JSON rendering of sessjson configs.
//!
//! - **Scalars** ([`encode_binary`], [`Base64`], [`encode_optional`],
//!   [`encode_duration`], the mode token tables): leaf values.
//! - **Records** ([`EncodeJson`]): one object per record, fields in
//!   declaration order, variants tagged with `type`.
//! - **Collections** ([`encode_array`] and friends): one array per
//!   container, in the container's own iteration order.
//! - **Dispatch** ([`to_json`]): handle in, document out, for any kind.
//!
//! Output is deterministic: the same unchanged config always produces the
//! same document, key order included.

mod collection;
mod dispatch;
mod records;
mod scalar;

pub use collection::{
    encode_array, encode_contacts, encode_conversations, encode_members,
    encode_user_groups,
};
pub use dispatch::{encode_view, to_json};
pub use records::{EncodeJson, conversation_type, group_type};
pub use scalar::{
    Base64, encode_binary, encode_duration, encode_optional, encode_profile_pic,
    expiration_mode_token, notify_mode_token,
};
