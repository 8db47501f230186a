//! The contacts config: one record per known session id.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    CollectionDelta, ConfigBase, ConfigError, ConfigKind, ConfigStore,
    ConfigView, ExpirationMode, NotifyMode, ProfilePic, check_session_id,
};

/// Everything the user's account remembers about one contact.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub session_id: String,
    /// The name the contact chose for themselves.
    pub name: String,
    /// The name the user gave the contact locally.
    pub nickname: String,
    pub profile_picture: ProfilePic,
    /// The user accepted this contact's message request.
    pub approved: bool,
    /// This contact accepted the user's message request.
    pub approved_me: bool,
    pub blocked: bool,
    /// Pinning hint: `0` unpinned, `> 0` pinned (higher first), `< 0` hidden.
    pub priority: i32,
    pub notifications: NotifyMode,
    /// Unix timestamp (seconds) until which notifications are muted.
    pub mute_until: Option<i64>,
    pub exp_mode: ExpirationMode,
    pub exp_timer: Duration,
    /// Unix timestamp (seconds) of when the contact was added.
    pub created: i64,
}

impl Contact {
    /// A contact with every field at its default.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            ..Self::default()
        }
    }
}

/// The contacts container, iterated in ascending session id order.
#[derive(Debug, Clone, Default)]
pub struct Contacts {
    base: ConfigBase,
    contacts: BTreeMap<String, Contact>,
}

impl Contacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, session_id: &str) -> Option<&Contact> {
        self.contacts.get(session_id)
    }

    /// Returns a copy of the stored contact, or a fresh default one.
    ///
    /// Nothing is stored until the result is passed to [`set`](Self::set).
    ///
    /// # Errors
    /// [`ConfigError::InvalidSessionId`] unless `session_id` is a `05` id.
    pub fn get_or_construct(&self, session_id: &str) -> Result<Contact, ConfigError> {
        check_session_id(session_id)?;
        Ok(self
            .get(session_id)
            .cloned()
            .unwrap_or_else(|| Contact::new(session_id)))
    }

    pub fn set(&mut self, contact: Contact) {
        self.contacts.insert(contact.session_id.clone(), contact);
        self.base.touch();
    }

    /// Removes a contact. Returns `true` if it existed.
    pub fn erase(&mut self, session_id: &str) -> bool {
        let removed = self.contacts.remove(session_id).is_some();
        if removed {
            self.base.touch();
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.values()
    }
}

impl ConfigStore for Contacts {
    type Delta = CollectionDelta<Contact>;

    const KIND: ConfigKind = ConfigKind::Contacts;

    fn base(&self) -> &ConfigBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ConfigBase {
        &mut self.base
    }

    fn apply_delta(&mut self, delta: Self::Delta) {
        delta.apply_to(&mut self.contacts, |c| c.session_id.clone());
    }

    fn as_view(&self) -> ConfigView<'_> {
        ConfigView::Contacts(self)
    }
}
