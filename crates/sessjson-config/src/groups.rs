//! Closed group configs: the member list and the group info.
//!
//! Both live in the group's own swarm rather than the user's, so each
//! instance belongs to one `03` group id.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    CollectionDelta, ConfigBase, ConfigError, ConfigKind, ConfigStore,
    ConfigView, ProfilePic, check_group_id, check_session_id,
};

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

/// One member of a closed group.
///
/// The three status fields are small integers owned by the group
/// protocol (`0` means "nothing pending"); they're stored and reported
/// as-is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupMember {
    pub session_id: String,
    pub name: String,
    pub profile_picture: ProfilePic,
    pub admin: bool,
    /// Added as part of an admin re-key rather than an invite.
    pub supplement: bool,
    pub invite_status: i32,
    pub promotion_status: i32,
    pub removed_status: i32,
}

impl GroupMember {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            ..Self::default()
        }
    }
}

/// The group members container, iterated in ascending session id order.
#[derive(Debug, Clone, Default)]
pub struct Members {
    base: ConfigBase,
    members: BTreeMap<String, GroupMember>,
}

impl Members {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, session_id: &str) -> Option<&GroupMember> {
        self.members.get(session_id)
    }

    /// # Errors
    /// [`ConfigError::InvalidSessionId`] unless `session_id` is a `05` id.
    pub fn get_or_construct(&self, session_id: &str) -> Result<GroupMember, ConfigError> {
        check_session_id(session_id)?;
        Ok(self
            .get(session_id)
            .cloned()
            .unwrap_or_else(|| GroupMember::new(session_id)))
    }

    pub fn set(&mut self, member: GroupMember) {
        self.members.insert(member.session_id.clone(), member);
        self.base.touch();
    }

    pub fn erase(&mut self, session_id: &str) -> bool {
        let removed = self.members.remove(session_id).is_some();
        if removed {
            self.base.touch();
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupMember> {
        self.members.values()
    }
}

impl ConfigStore for Members {
    type Delta = CollectionDelta<GroupMember>;

    const KIND: ConfigKind = ConfigKind::Members;

    fn base(&self) -> &ConfigBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ConfigBase {
        &mut self.base
    }

    fn apply_delta(&mut self, delta: Self::Delta) {
        delta.apply_to(&mut self.members, |m| m.session_id.clone());
    }

    fn as_view(&self) -> ConfigView<'_> {
        ConfigView::Members(self)
    }
}

// ---------------------------------------------------------------------------
// Info
// ---------------------------------------------------------------------------

/// The mutable part of a group's info; also the shape of an info delta.
///
/// Optional fields are `None` until somebody sets them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub profile_pic: ProfilePic,
    /// Disappearing messages timer for the whole group.
    pub expiry_timer: Option<Duration>,
    /// Unix timestamp (seconds).
    pub created: Option<i64>,
    /// Messages older than this (unix seconds) should be deleted.
    pub delete_before: Option<i64>,
    /// Attachments older than this (unix seconds) should be deleted.
    pub delete_attach_before: Option<i64>,
}

/// The group info container (a singleton record).
#[derive(Debug, Clone)]
pub struct Info {
    base: ConfigBase,
    id: String,
    fields: InfoFields,
}

impl Info {
    /// Creates empty info for group `id`.
    ///
    /// # Errors
    /// [`ConfigError::InvalidSessionId`] unless `id` is a `03` id.
    pub fn new(id: &str) -> Result<Self, ConfigError> {
        check_group_id(id)?;
        Ok(Self {
            base: ConfigBase::new(),
            id: id.to_string(),
            fields: InfoFields::default(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn get_name(&self) -> Option<&str> {
        self.fields.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.fields.name = Some(name.into());
        self.base.touch();
    }

    pub fn get_description(&self) -> Option<&str> {
        self.fields.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.fields.description = Some(description.into());
        self.base.touch();
    }

    pub fn get_profile_pic(&self) -> &ProfilePic {
        &self.fields.profile_pic
    }

    pub fn set_profile_pic(&mut self, pic: ProfilePic) {
        self.fields.profile_pic = pic;
        self.base.touch();
    }

    pub fn get_expiry_timer(&self) -> Option<Duration> {
        self.fields.expiry_timer
    }

    pub fn set_expiry_timer(&mut self, timer: Duration) {
        self.fields.expiry_timer = Some(timer);
        self.base.touch();
    }

    pub fn get_created(&self) -> Option<i64> {
        self.fields.created
    }

    pub fn set_created(&mut self, created: i64) {
        self.fields.created = Some(created);
        self.base.touch();
    }

    pub fn get_delete_before(&self) -> Option<i64> {
        self.fields.delete_before
    }

    pub fn set_delete_before(&mut self, ts: i64) {
        self.fields.delete_before = Some(ts);
        self.base.touch();
    }

    pub fn get_delete_attach_before(&self) -> Option<i64> {
        self.fields.delete_attach_before
    }

    pub fn set_delete_attach_before(&mut self, ts: i64) {
        self.fields.delete_attach_before = Some(ts);
        self.base.touch();
    }
}

impl ConfigStore for Info {
    type Delta = InfoFields;

    const KIND: ConfigKind = ConfigKind::Info;

    fn base(&self) -> &ConfigBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ConfigBase {
        &mut self.base
    }

    fn apply_delta(&mut self, delta: InfoFields) {
        self.fields = delta;
    }

    fn as_view(&self) -> ConfigView<'_> {
        ConfigView::Info(self)
    }
}
