//! Composite encoders: one JSON object per record.
//!
//! Keys come out in the order the record declares its fields. Records
//! that extend a shared base ([`BaseGroupInfo`]) emit the base fields
//! first. Variant records ([`Conversation`], [`AnyGroup`]) emit the
//! active shape's fields and then a `type` tag naming it.

use serde_json::{Map, Value};
use sessjson_config::{
    AnyGroup, BaseGroupInfo, Community, CommunityInfo, CommunityRef, Contact,
    Conversation, Group, GroupInfo, GroupMember, Info, LegacyGroup,
    LegacyGroupInfo, OneToOne, UserProfile,
};

use crate::scalar::{
    Base64, encode_duration, encode_optional, encode_profile_pic,
    expiration_mode_token, notify_mode_token, object,
};

/// A record that encodes as one JSON object.
pub trait EncodeJson {
    fn encode_object(&self) -> Map<String, Value>;

    fn encode_json(&self) -> Value {
        Value::Object(self.encode_object())
    }
}

// ---------------------------------------------------------------------------
// Contacts
// ---------------------------------------------------------------------------

impl EncodeJson for Contact {
    fn encode_object(&self) -> Map<String, Value> {
        object([
            ("session_id", self.session_id.as_str().into()),
            ("name", self.name.as_str().into()),
            ("nickname", self.nickname.as_str().into()),
            ("profile_picture", encode_profile_pic(&self.profile_picture)),
            ("approved", self.approved.into()),
            ("approved_me", self.approved_me.into()),
            ("blocked", self.blocked.into()),
            ("priority", self.priority.into()),
            ("notifications", notify_mode_token(self.notifications).into()),
            ("mute_until", encode_optional(self.mute_until)),
            ("exp_mode", expiration_mode_token(self.exp_mode).into()),
            ("exp_timer", encode_duration(self.exp_timer)),
            ("created", self.created.into()),
        ])
    }
}

// ---------------------------------------------------------------------------
// Conversations
// ---------------------------------------------------------------------------

/// `url` and `pub_key` of a community, both derived at encode time.
fn community_fields(community: &CommunityRef) -> Map<String, Value> {
    object([
        ("url", community.full_url().into()),
        ("pub_key", community.pubkey_hex().into()),
    ])
}

impl EncodeJson for OneToOne {
    fn encode_object(&self) -> Map<String, Value> {
        object([
            ("session_id", self.session_id.as_str().into()),
            ("last_read", self.last_read.into()),
            ("unread", self.unread.into()),
        ])
    }
}

impl EncodeJson for Group {
    fn encode_object(&self) -> Map<String, Value> {
        object([
            ("id", self.id.as_str().into()),
            ("last_read", self.last_read.into()),
            ("unread", self.unread.into()),
        ])
    }
}

impl EncodeJson for LegacyGroup {
    fn encode_object(&self) -> Map<String, Value> {
        object([
            ("id", self.id.as_str().into()),
            ("last_read", self.last_read.into()),
            ("unread", self.unread.into()),
        ])
    }
}

impl EncodeJson for Community {
    fn encode_object(&self) -> Map<String, Value> {
        let mut out = community_fields(&self.community);
        out.insert("last_read".into(), self.last_read.into());
        out.insert("unread".into(), self.unread.into());
        out
    }
}

/// The `type` tag of a conversation.
pub fn conversation_type(convo: &Conversation) -> &'static str {
    match convo {
        Conversation::OneToOne(_) => "one_to_one",
        Conversation::Group(_) => "group",
        Conversation::LegacyGroup(_) => "legacy_group",
        Conversation::Community(_) => "community",
    }
}

impl EncodeJson for Conversation {
    fn encode_object(&self) -> Map<String, Value> {
        let mut out = match self {
            Self::OneToOne(c) => c.encode_object(),
            Self::Group(c) => c.encode_object(),
            Self::LegacyGroup(c) => c.encode_object(),
            Self::Community(c) => c.encode_object(),
        };
        out.insert("type".into(), conversation_type(self).into());
        out
    }
}

// ---------------------------------------------------------------------------
// User groups
// ---------------------------------------------------------------------------

impl EncodeJson for BaseGroupInfo {
    fn encode_object(&self) -> Map<String, Value> {
        object([
            ("priority", self.priority.into()),
            ("name", self.name.as_str().into()),
            ("invited", self.invited.into()),
            ("joined_at", self.joined_at.into()),
            ("mute_until", encode_optional(self.mute_until)),
            ("notifications", notify_mode_token(self.notifications).into()),
        ])
    }
}

impl EncodeJson for GroupInfo {
    fn encode_object(&self) -> Map<String, Value> {
        let mut out = self.base.encode_object();
        out.extend(object([
            ("id", self.id.as_str().into()),
            ("secret_key", Base64(&self.secret_key).into()),
            ("auth_data", Base64(&self.auth_data).into()),
        ]));
        out
    }
}

impl EncodeJson for LegacyGroupInfo {
    fn encode_object(&self) -> Map<String, Value> {
        let members: Vec<Value> = self
            .members()
            .map(|(session_id, admin)| {
                Value::Object(object([
                    ("session_id", session_id.into()),
                    ("admin", admin.into()),
                ]))
            })
            .collect();

        let mut out = self.base.encode_object();
        out.extend(object([
            ("session_id", self.session_id.as_str().into()),
            ("enc_pubkey", Base64(&self.enc_pubkey).into()),
            ("enc_seckey", Base64(&self.enc_seckey).into()),
            ("disappearing_timer", encode_duration(self.disappearing_timer)),
            ("members", Value::Array(members)),
        ]));
        out
    }
}

impl EncodeJson for CommunityInfo {
    fn encode_object(&self) -> Map<String, Value> {
        let mut out = self.base.encode_object();
        out.extend(community_fields(&self.community));
        out
    }
}

/// The `type` tag of a user group entry.
pub fn group_type(group: &AnyGroup) -> &'static str {
    match group {
        AnyGroup::Group(_) => "group",
        AnyGroup::LegacyGroup(_) => "legacy_group",
        AnyGroup::Community(_) => "community",
    }
}

impl EncodeJson for AnyGroup {
    fn encode_object(&self) -> Map<String, Value> {
        let mut out = match self {
            Self::Group(g) => g.encode_object(),
            Self::LegacyGroup(g) => g.encode_object(),
            Self::Community(g) => g.encode_object(),
        };
        out.insert("type".into(), group_type(self).into());
        out
    }
}

// ---------------------------------------------------------------------------
// Closed group configs
// ---------------------------------------------------------------------------

impl EncodeJson for GroupMember {
    fn encode_object(&self) -> Map<String, Value> {
        object([
            ("session_id", self.session_id.as_str().into()),
            ("name", self.name.as_str().into()),
            ("profile_picture", encode_profile_pic(&self.profile_picture)),
            ("admin", self.admin.into()),
            ("supplement", self.supplement.into()),
            ("invite_status", self.invite_status.into()),
            ("promotion_status", self.promotion_status.into()),
            ("removed_status", self.removed_status.into()),
        ])
    }
}

impl EncodeJson for Info {
    fn encode_object(&self) -> Map<String, Value> {
        object([
            ("id", self.id().into()),
            ("name", encode_optional(self.get_name())),
            ("description", encode_optional(self.get_description())),
            ("profile_pic", encode_profile_pic(self.get_profile_pic())),
            (
                "expiry_timer",
                self.get_expiry_timer().map_or(Value::Null, encode_duration),
            ),
            ("created", encode_optional(self.get_created())),
            ("delete_before", encode_optional(self.get_delete_before())),
            (
                "delete_attach_before",
                encode_optional(self.get_delete_attach_before()),
            ),
        ])
    }
}

// ---------------------------------------------------------------------------
// User profile
// ---------------------------------------------------------------------------

impl EncodeJson for UserProfile {
    fn encode_object(&self) -> Map<String, Value> {
        object([
            ("name", encode_optional(self.get_name())),
            ("profile_pic", encode_profile_pic(self.get_profile_pic())),
            ("blinded_msgreqs", encode_optional(self.get_blinded_msgreqs())),
            ("nts_priority", self.get_nts_priority().into()),
            (
                "nts_expiry",
                self.get_nts_expiry().map_or(Value::Null, encode_duration),
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use sessjson_config::{NotifyMode, ProfilePic};

    use super::*;

    // -- Helpers --

    const KEY_HEX: &str =
        "00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff";

    fn id(prefix: &str, c: char) -> String {
        format!("{prefix}{}", std::iter::repeat_n(c, 64).collect::<String>())
    }

    fn keys(map: &Map<String, Value>) -> Vec<&str> {
        map.keys().map(String::as_str).collect()
    }

    // =====================================================================
    // Contact
    // =====================================================================

    #[test]
    fn test_contact_defaults_encode_every_field() {
        let contact = Contact::new(id("05", 'a'));
        let out = contact.encode_json();

        assert_eq!(out["profile_picture"], Value::Null);
        assert_eq!(out["notifications"], "default");
        assert_eq!(out["mute_until"], Value::Null);
        assert_eq!(out["exp_mode"], "none");
        assert_eq!(out["exp_timer"], 0);
        assert_eq!(out.as_object().map(Map::len), Some(13));
    }

    #[test]
    fn test_contact_keys_follow_declaration_order() {
        let out = Contact::new(id("05", 'a')).encode_object();
        assert_eq!(
            keys(&out),
            [
                "session_id", "name", "nickname", "profile_picture", "approved",
                "approved_me", "blocked", "priority", "notifications",
                "mute_until", "exp_mode", "exp_timer", "created",
            ]
        );
    }

    // =====================================================================
    // Conversation
    // =====================================================================

    #[test]
    fn test_community_conversation_derives_url_and_key() {
        let community = CommunityRef::parse("HTTPS://Example.org:443/", "Lobby", KEY_HEX)
            .expect("valid key");
        let convo = Conversation::Community(Community {
            community,
            last_read: 5,
            unread: true,
        });

        assert_eq!(
            convo.encode_json(),
            json!({
                "url": "https://example.org/lobby",
                "pub_key": KEY_HEX,
                "last_read": 5,
                "unread": true,
                "type": "community",
            })
        );
    }

    #[test]
    fn test_conversation_type_is_last_key() {
        let convo = Conversation::LegacyGroup(LegacyGroup {
            id: id("05", 'b'),
            last_read: 0,
            unread: false,
        });
        let out = convo.encode_object();
        assert_eq!(keys(&out), ["id", "last_read", "unread", "type"]);
        assert_eq!(out["type"], "legacy_group");
    }

    // =====================================================================
    // User groups
    // =====================================================================

    #[test]
    fn test_group_info_flattens_base_first() {
        let group = AnyGroup::Group(GroupInfo {
            base: BaseGroupInfo {
                name: "g".into(),
                notifications: NotifyMode::Disabled,
                ..BaseGroupInfo::default()
            },
            id: id("03", 'c'),
            secret_key: vec![0xff; 3],
            auth_data: Vec::new(),
        });
        let out = group.encode_object();

        assert_eq!(
            keys(&out),
            [
                "priority", "name", "invited", "joined_at", "mute_until",
                "notifications", "id", "secret_key", "auth_data", "type",
            ]
        );
        assert_eq!(out["secret_key"], "////");
        assert_eq!(out["auth_data"], "");
        assert_eq!(out["notifications"], "disabled");
    }

    #[test]
    fn test_legacy_group_members_encode_in_order() {
        let mut legacy = LegacyGroupInfo::new(id("05", '0'));
        legacy.disappearing_timer = Duration::from_secs(3600);
        legacy.insert_member(&id("05", 'f'), false).expect("valid id");
        legacy.insert_member(&id("05", '1'), true).expect("valid id");

        let out = AnyGroup::LegacyGroup(legacy).encode_json();
        assert_eq!(out["disappearing_timer"], 3600);
        assert_eq!(
            out["members"],
            json!([
                {"session_id": id("05", '1'), "admin": true},
                {"session_id": id("05", 'f'), "admin": false},
            ])
        );
        assert_eq!(out["type"], "legacy_group");
    }

    #[test]
    fn test_legacy_group_without_members_is_empty_array() {
        let out = LegacyGroupInfo::new(id("05", '0')).encode_json();
        assert_eq!(out["members"], json!([]));
    }

    // =====================================================================
    // Member / Info / UserProfile
    // =====================================================================

    #[test]
    fn test_member_encodes_statuses_as_integers() {
        let member = GroupMember {
            invite_status: 2,
            profile_picture: ProfilePic::new("http://p", vec![1]),
            ..GroupMember::new(id("05", 'd'))
        };
        let out = member.encode_json();
        assert_eq!(out["invite_status"], 2);
        assert_eq!(out["profile_picture"], json!({"url": "http://p", "key": "AQ=="}));
    }

    #[test]
    fn test_fresh_info_has_nulls_for_unset_fields() {
        let info = Info::new(&id("03", 'e')).expect("valid group id");
        assert_eq!(
            info.encode_json(),
            json!({
                "id": id("03", 'e'),
                "name": null,
                "description": null,
                "profile_pic": null,
                "expiry_timer": null,
                "created": null,
                "delete_before": null,
                "delete_attach_before": null,
            })
        );
    }

    #[test]
    fn test_user_profile_encodes_set_fields() {
        let mut profile = UserProfile::new();
        profile.set_name("Me");
        profile.set_blinded_msgreqs(Some(true));
        profile.set_nts_expiry(Duration::from_secs(86_400));

        let out = profile.encode_json();
        assert_eq!(out["name"], "Me");
        assert_eq!(out["blinded_msgreqs"], true);
        assert_eq!(out["nts_priority"], 0);
        assert_eq!(out["nts_expiry"], 86_400);
    }
}
