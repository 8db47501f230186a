//! The user profile config: the user's own name, picture and settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigBase, ConfigKind, ConfigStore, ConfigView, ProfilePic};

/// The profile record; also the shape of a profile delta.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileFields {
    pub name: Option<String>,
    pub profile_pic: ProfilePic,
    /// Whether message requests from blinded ids are accepted.
    /// `None` means the user never chose.
    pub blinded_msgreqs: Option<bool>,
    /// Priority of the "Note to Self" conversation.
    pub nts_priority: i32,
    /// Disappearing timer of the "Note to Self" conversation.
    pub nts_expiry: Option<Duration>,
}

/// The user profile container (a singleton record).
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    base: ConfigBase,
    fields: ProfileFields,
}

impl UserProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_name(&self) -> Option<&str> {
        self.fields.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.fields.name = Some(name.into());
        self.base.touch();
    }

    pub fn get_profile_pic(&self) -> &ProfilePic {
        &self.fields.profile_pic
    }

    pub fn set_profile_pic(&mut self, pic: ProfilePic) {
        self.fields.profile_pic = pic;
        self.base.touch();
    }

    pub fn get_blinded_msgreqs(&self) -> Option<bool> {
        self.fields.blinded_msgreqs
    }

    pub fn set_blinded_msgreqs(&mut self, accept: Option<bool>) {
        self.fields.blinded_msgreqs = accept;
        self.base.touch();
    }

    pub fn get_nts_priority(&self) -> i32 {
        self.fields.nts_priority
    }

    pub fn set_nts_priority(&mut self, priority: i32) {
        self.fields.nts_priority = priority;
        self.base.touch();
    }

    pub fn get_nts_expiry(&self) -> Option<Duration> {
        self.fields.nts_expiry
    }

    /// A zero duration clears the timer.
    pub fn set_nts_expiry(&mut self, expiry: Duration) {
        self.fields.nts_expiry = (!expiry.is_zero()).then_some(expiry);
        self.base.touch();
    }
}

impl ConfigStore for UserProfile {
    type Delta = ProfileFields;

    const KIND: ConfigKind = ConfigKind::UserProfile;

    fn base(&self) -> &ConfigBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ConfigBase {
        &mut self.base
    }

    fn apply_delta(&mut self, delta: ProfileFields) {
        self.fields = delta;
    }

    fn as_view(&self) -> ConfigView<'_> {
        ConfigView::UserProfile(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Codec, ConfigObject, JsonCodec};

    #[test]
    fn test_new_profile_is_unset() {
        let profile = UserProfile::new();
        assert_eq!(profile.get_name(), None);
        assert!(profile.get_profile_pic().is_empty());
        assert_eq!(profile.get_blinded_msgreqs(), None);
        assert_eq!(profile.get_nts_expiry(), None);
    }

    #[test]
    fn test_set_nts_expiry_zero_clears() {
        let mut profile = UserProfile::new();
        profile.set_nts_expiry(Duration::from_secs(60));
        assert_eq!(profile.get_nts_expiry(), Some(Duration::from_secs(60)));
        profile.set_nts_expiry(Duration::ZERO);
        assert_eq!(profile.get_nts_expiry(), None);
    }

    #[test]
    fn test_merge_same_hash_twice_applies_once() {
        let mut profile = UserProfile::new();
        let snapshot = ProfileFields {
            name: Some("Remote".into()),
            ..ProfileFields::default()
        };
        let data = JsonCodec.encode(&snapshot).unwrap();

        assert_eq!(profile.merge(&[("h", &data)]).unwrap().len(), 1);
        profile.set_name("Local");
        assert!(profile.merge(&[("h", &data)]).unwrap().is_empty());
        assert_eq!(profile.get_name(), Some("Local"));
    }
}
