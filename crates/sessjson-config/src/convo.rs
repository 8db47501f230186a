//! Volatile conversation info: last-read markers and unread flags.
//!
//! Unlike the other containers, this one holds four record shapes at once
//! (one-to-one chats, closed groups, legacy groups, communities). They are
//! kept in one map under a [`ConversationKey`] whose variant order is the
//! container's iteration order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    CollectionDelta, CommunityRef, ConfigBase, ConfigError, ConfigKind,
    ConfigStore, ConfigView, check_group_id, check_session_id,
};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A one-to-one conversation with another session id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneToOne {
    pub session_id: String,
    /// Unix timestamp (milliseconds) of the last message read.
    pub last_read: i64,
    /// Explicitly marked unread by the user.
    pub unread: bool,
}

/// A closed group conversation (`03` id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub last_read: i64,
    pub unread: bool,
}

/// A legacy closed group conversation (`05` id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyGroup {
    pub id: String,
    pub last_read: i64,
    pub unread: bool,
}

/// A community room conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
    pub community: CommunityRef,
    pub last_read: i64,
    pub unread: bool,
}

/// One conversation, exactly one of four shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conversation {
    OneToOne(OneToOne),
    Group(Group),
    LegacyGroup(LegacyGroup),
    Community(Community),
}

/// Identity of a conversation inside [`ConvoInfoVolatile`].
///
/// Variant order is iteration order: one-to-one, community, group,
/// legacy group. Within a variant, keys sort ascending.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationKey {
    OneToOne(String),
    /// Keyed by the community's full (canonical) URL.
    Community(String),
    Group(String),
    LegacyGroup(String),
}

impl Conversation {
    pub fn key(&self) -> ConversationKey {
        match self {
            Self::OneToOne(c) => ConversationKey::OneToOne(c.session_id.clone()),
            Self::Group(c) => ConversationKey::Group(c.id.clone()),
            Self::LegacyGroup(c) => ConversationKey::LegacyGroup(c.id.clone()),
            Self::Community(c) => ConversationKey::Community(c.community.full_url()),
        }
    }

    pub fn last_read(&self) -> i64 {
        match self {
            Self::OneToOne(c) => c.last_read,
            Self::Group(c) => c.last_read,
            Self::LegacyGroup(c) => c.last_read,
            Self::Community(c) => c.last_read,
        }
    }
}

impl From<OneToOne> for Conversation {
    fn from(c: OneToOne) -> Self {
        Self::OneToOne(c)
    }
}

impl From<Group> for Conversation {
    fn from(c: Group) -> Self {
        Self::Group(c)
    }
}

impl From<LegacyGroup> for Conversation {
    fn from(c: LegacyGroup) -> Self {
        Self::LegacyGroup(c)
    }
}

impl From<Community> for Conversation {
    fn from(c: Community) -> Self {
        Self::Community(c)
    }
}

// ---------------------------------------------------------------------------
// ConvoInfoVolatile
// ---------------------------------------------------------------------------

/// The conversation info container.
#[derive(Debug, Clone, Default)]
pub struct ConvoInfoVolatile {
    base: ConfigBase,
    convos: BTreeMap<ConversationKey, Conversation>,
}

impl ConvoInfoVolatile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ConversationKey) -> Option<&Conversation> {
        self.convos.get(key)
    }

    /// Returns the stored one-to-one conversation, or a fresh one.
    ///
    /// # Errors
    /// [`ConfigError::InvalidSessionId`] unless `session_id` is a `05` id.
    pub fn get_or_construct_one_to_one(
        &self,
        session_id: &str,
    ) -> Result<OneToOne, ConfigError> {
        check_session_id(session_id)?;
        match self.get(&ConversationKey::OneToOne(session_id.to_string())) {
            Some(Conversation::OneToOne(c)) => Ok(c.clone()),
            _ => Ok(OneToOne {
                session_id: session_id.to_string(),
                last_read: 0,
                unread: false,
            }),
        }
    }

    /// # Errors
    /// [`ConfigError::InvalidSessionId`] unless `id` is a `03` id.
    pub fn get_or_construct_group(&self, id: &str) -> Result<Group, ConfigError> {
        check_group_id(id)?;
        match self.get(&ConversationKey::Group(id.to_string())) {
            Some(Conversation::Group(c)) => Ok(c.clone()),
            _ => Ok(Group {
                id: id.to_string(),
                last_read: 0,
                unread: false,
            }),
        }
    }

    /// # Errors
    /// [`ConfigError::InvalidSessionId`] unless `id` is a `05` id.
    pub fn get_or_construct_legacy_group(
        &self,
        id: &str,
    ) -> Result<LegacyGroup, ConfigError> {
        check_session_id(id)?;
        match self.get(&ConversationKey::LegacyGroup(id.to_string())) {
            Some(Conversation::LegacyGroup(c)) => Ok(c.clone()),
            _ => Ok(LegacyGroup {
                id: id.to_string(),
                last_read: 0,
                unread: false,
            }),
        }
    }

    /// # Errors
    /// [`ConfigError::InvalidPubkey`] if `pubkey_hex` is not 32 bytes of hex.
    pub fn get_or_construct_community(
        &self,
        base_url: &str,
        room: &str,
        pubkey_hex: &str,
    ) -> Result<Community, ConfigError> {
        let community = CommunityRef::parse(base_url, room, pubkey_hex)?;
        match self.get(&ConversationKey::Community(community.full_url())) {
            Some(Conversation::Community(c)) => Ok(c.clone()),
            _ => Ok(Community {
                community,
                last_read: 0,
                unread: false,
            }),
        }
    }

    pub fn set(&mut self, convo: impl Into<Conversation>) {
        let convo = convo.into();
        self.convos.insert(convo.key(), convo);
        self.base.touch();
    }

    pub fn erase(&mut self, key: &ConversationKey) -> bool {
        let removed = self.convos.remove(key).is_some();
        if removed {
            self.base.touch();
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.convos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.convos.is_empty()
    }

    pub fn size_one_to_one(&self) -> usize {
        self.count(|c| matches!(c, Conversation::OneToOne(_)))
    }

    pub fn size_groups(&self) -> usize {
        self.count(|c| matches!(c, Conversation::Group(_)))
    }

    pub fn size_legacy_groups(&self) -> usize {
        self.count(|c| matches!(c, Conversation::LegacyGroup(_)))
    }

    pub fn size_communities(&self) -> usize {
        self.count(|c| matches!(c, Conversation::Community(_)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Conversation> {
        self.convos.values()
    }

    fn count(&self, pred: impl Fn(&Conversation) -> bool) -> usize {
        self.convos.values().filter(|c| pred(c)).count()
    }
}

impl ConfigStore for ConvoInfoVolatile {
    type Delta = CollectionDelta<Conversation, ConversationKey>;

    const KIND: ConfigKind = ConfigKind::ConvoInfoVolatile;

    fn base(&self) -> &ConfigBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ConfigBase {
        &mut self.base
    }

    fn apply_delta(&mut self, delta: Self::Delta) {
        delta.apply_to(&mut self.convos, Conversation::key);
    }

    fn as_view(&self) -> ConfigView<'_> {
        ConfigView::ConvoInfoVolatile(self)
    }
}
