//! The user groups config: every group and community the user belongs to.
//!
//! Three entry shapes share a common [`BaseGroupInfo`] (priority, name,
//! mute settings...) and add their own fields on top:
//!
//! - [`GroupInfo`]: a closed group, with its secret key / auth data
//! - [`LegacyGroupInfo`]: a legacy closed group, with its member list
//! - [`CommunityInfo`]: a community room

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    CollectionDelta, CommunityRef, ConfigBase, ConfigError, ConfigKind,
    ConfigStore, ConfigView, NotifyMode, check_group_id, check_session_id,
};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Fields shared by every user group entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseGroupInfo {
    pub priority: i32,
    pub name: String,
    /// The user was invited but hasn't accepted yet.
    pub invited: bool,
    /// Unix timestamp (seconds) of when the user joined.
    pub joined_at: i64,
    pub mute_until: Option<i64>,
    pub notifications: NotifyMode,
}

/// A closed group entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupInfo {
    pub base: BaseGroupInfo,
    /// `03` group id.
    pub id: String,
    /// Group Ed25519 secret key; empty unless the user is an admin.
    pub secret_key: Vec<u8>,
    /// Membership proof for non-admins; empty when `secret_key` is set.
    pub auth_data: Vec<u8>,
}

/// A legacy closed group entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyGroupInfo {
    pub base: BaseGroupInfo,
    pub session_id: String,
    pub enc_pubkey: Vec<u8>,
    pub enc_seckey: Vec<u8>,
    pub disappearing_timer: Duration,
    /// Member session id → admin flag, ascending by session id.
    members: BTreeMap<String, bool>,
}

impl LegacyGroupInfo {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            base: BaseGroupInfo::default(),
            session_id: session_id.into(),
            enc_pubkey: Vec::new(),
            enc_seckey: Vec::new(),
            disappearing_timer: Duration::ZERO,
            members: BTreeMap::new(),
        }
    }

    /// Adds a member or updates their admin flag.
    ///
    /// Returns `true` if anything changed.
    ///
    /// # Errors
    /// [`ConfigError::InvalidSessionId`] unless `session_id` is a `05` id.
    pub fn insert_member(
        &mut self,
        session_id: &str,
        admin: bool,
    ) -> Result<bool, ConfigError> {
        check_session_id(session_id)?;
        Ok(self.members.insert(session_id.to_string(), admin) != Some(admin))
    }

    pub fn erase_member(&mut self, session_id: &str) -> bool {
        self.members.remove(session_id).is_some()
    }

    /// `(session id, admin)` pairs in ascending session id order.
    pub fn members(&self) -> impl Iterator<Item = (&str, bool)> {
        self.members.iter().map(|(id, admin)| (id.as_str(), *admin))
    }

    /// Returns `(admins, non-admins)`.
    pub fn counts(&self) -> (usize, usize) {
        let admins = self.members.values().filter(|a| **a).count();
        (admins, self.members.len() - admins)
    }
}

/// A community entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityInfo {
    pub base: BaseGroupInfo,
    pub community: CommunityRef,
}

/// One user group entry, exactly one of three shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnyGroup {
    Group(GroupInfo),
    LegacyGroup(LegacyGroupInfo),
    Community(CommunityInfo),
}

/// Identity of an entry inside [`UserGroups`].
///
/// Variant order is iteration order: groups, communities, legacy groups.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Group(String),
    Community(String),
    LegacyGroup(String),
}

impl AnyGroup {
    pub fn key(&self) -> GroupKey {
        match self {
            Self::Group(g) => GroupKey::Group(g.id.clone()),
            Self::LegacyGroup(g) => GroupKey::LegacyGroup(g.session_id.clone()),
            Self::Community(g) => GroupKey::Community(g.community.full_url()),
        }
    }

    pub fn base(&self) -> &BaseGroupInfo {
        match self {
            Self::Group(g) => &g.base,
            Self::LegacyGroup(g) => &g.base,
            Self::Community(g) => &g.base,
        }
    }
}

impl From<GroupInfo> for AnyGroup {
    fn from(g: GroupInfo) -> Self {
        Self::Group(g)
    }
}

impl From<LegacyGroupInfo> for AnyGroup {
    fn from(g: LegacyGroupInfo) -> Self {
        Self::LegacyGroup(g)
    }
}

impl From<CommunityInfo> for AnyGroup {
    fn from(g: CommunityInfo) -> Self {
        Self::Community(g)
    }
}

// ---------------------------------------------------------------------------
// UserGroups
// ---------------------------------------------------------------------------

/// The user groups container.
#[derive(Debug, Clone, Default)]
pub struct UserGroups {
    base: ConfigBase,
    groups: BTreeMap<GroupKey, AnyGroup>,
}

impl UserGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &GroupKey) -> Option<&AnyGroup> {
        self.groups.get(key)
    }

    /// # Errors
    /// [`ConfigError::InvalidSessionId`] unless `id` is a `03` id.
    pub fn get_or_construct_group(&self, id: &str) -> Result<GroupInfo, ConfigError> {
        check_group_id(id)?;
        match self.get(&GroupKey::Group(id.to_string())) {
            Some(AnyGroup::Group(g)) => Ok(g.clone()),
            _ => Ok(GroupInfo {
                base: BaseGroupInfo::default(),
                id: id.to_string(),
                secret_key: Vec::new(),
                auth_data: Vec::new(),
            }),
        }
    }

    /// # Errors
    /// [`ConfigError::InvalidSessionId`] unless `session_id` is a `05` id.
    pub fn get_or_construct_legacy_group(
        &self,
        session_id: &str,
    ) -> Result<LegacyGroupInfo, ConfigError> {
        check_session_id(session_id)?;
        match self.get(&GroupKey::LegacyGroup(session_id.to_string())) {
            Some(AnyGroup::LegacyGroup(g)) => Ok(g.clone()),
            _ => Ok(LegacyGroupInfo::new(session_id)),
        }
    }

    /// # Errors
    /// [`ConfigError::InvalidPubkey`] if `pubkey_hex` is not 32 bytes of hex.
    pub fn get_or_construct_community(
        &self,
        base_url: &str,
        room: &str,
        pubkey_hex: &str,
    ) -> Result<CommunityInfo, ConfigError> {
        let community = CommunityRef::parse(base_url, room, pubkey_hex)?;
        match self.get(&GroupKey::Community(community.full_url())) {
            Some(AnyGroup::Community(g)) => Ok(g.clone()),
            _ => Ok(CommunityInfo {
                base: BaseGroupInfo::default(),
                community,
            }),
        }
    }

    pub fn set(&mut self, group: impl Into<AnyGroup>) {
        let group = group.into();
        self.groups.insert(group.key(), group);
        self.base.touch();
    }

    pub fn erase(&mut self, key: &GroupKey) -> bool {
        let removed = self.groups.remove(key).is_some();
        if removed {
            self.base.touch();
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnyGroup> {
        self.groups.values()
    }

    /// Just the communities, e.g. to derive a blinded id per server.
    pub fn communities(&self) -> impl Iterator<Item = &CommunityInfo> {
        self.groups.values().filter_map(|g| match g {
            AnyGroup::Community(c) => Some(c),
            _ => None,
        })
    }
}

impl ConfigStore for UserGroups {
    type Delta = CollectionDelta<AnyGroup, GroupKey>;

    const KIND: ConfigKind = ConfigKind::UserGroups;

    fn base(&self) -> &ConfigBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ConfigBase {
        &mut self.base
    }

    fn apply_delta(&mut self, delta: Self::Delta) {
        delta.apply_to(&mut self.groups, AnyGroup::key);
    }

    fn as_view(&self) -> ConfigView<'_> {
        ConfigView::UserGroups(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Codec, ConfigObject, JsonCodec};

    const KEY_HEX: &str =
        "ffeeddccbbaa99887766554433221100ffeeddccbbaa99887766554433221100";

    fn id(prefix: &str, c: char) -> String {
        format!("{prefix}{}", std::iter::repeat_n(c, 64).collect::<String>())
    }

    #[test]
    fn test_legacy_members_sorted_and_counted() {
        let mut g = LegacyGroupInfo::new(id("05", '0'));
        assert!(g.insert_member(&id("05", 'c'), false).unwrap());
        assert!(g.insert_member(&id("05", 'a'), true).unwrap());
        assert!(!g.insert_member(&id("05", 'a'), true).unwrap(), "no change");

        let ids: Vec<_> = g.members().map(|(id, _)| id.to_string()).collect();
        assert_eq!(ids, vec![id("05", 'a'), id("05", 'c')]);
        assert_eq!(g.counts(), (1, 1));

        assert!(g.erase_member(&id("05", 'c')));
        assert_eq!(g.counts(), (1, 0));
    }

    #[test]
    fn test_iteration_order_is_group_community_legacy() {
        let mut groups = UserGroups::new();
        groups.set(groups.get_or_construct_legacy_group(&id("05", '1')).unwrap());
        groups.set(
            groups
                .get_or_construct_community("https://c.host", "r", KEY_HEX)
                .unwrap(),
        );
        groups.set(groups.get_or_construct_group(&id("03", '1')).unwrap());

        let keys: Vec<_> = groups.iter().map(AnyGroup::key).collect();
        assert!(matches!(keys[0], GroupKey::Group(_)));
        assert!(matches!(keys[1], GroupKey::Community(_)));
        assert!(matches!(keys[2], GroupKey::LegacyGroup(_)));
        assert_eq!(groups.communities().count(), 1);
    }

    #[test]
    fn test_merge_erase_by_group_key() {
        let mut groups = UserGroups::new();
        let g = groups.get_or_construct_group(&id("03", '9')).unwrap();
        groups.set(g.clone());

        let delta: CollectionDelta<AnyGroup, GroupKey> = CollectionDelta {
            set: vec![],
            erase: vec![GroupKey::Group(g.id.clone())],
        };
        let data = JsonCodec.encode(&delta).unwrap();

        let accepted = groups.merge(&[("erase-1", &data)]).unwrap();
        assert_eq!(accepted.len(), 1);
        assert!(groups.is_empty());
    }
}
