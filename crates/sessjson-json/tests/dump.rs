//! Integration tests for dumping every config kind through the dispatcher.

use std::time::Duration;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use serde_json::{Value, json};
use sessjson_config::{
    CollectionDelta, Codec, ConfigObject, Contact, Contacts, Conversation,
    ConversationKey, ConvoInfoVolatile, GroupMember, Info, JsonCodec, Members,
    NotifyMode, ProfilePic, UserGroups, UserProfile,
};
use sessjson_json::{encode_binary, to_json};

// =========================================================================
// Helpers
// =========================================================================

const KEY_HEX: &str = "a1b2c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f60718293a4b5c6d7e8f90";

fn id(prefix: &str, c: char) -> String {
    format!("{prefix}{}", std::iter::repeat_n(c, 64).collect::<String>())
}

fn boxed<T: ConfigObject + 'static>(config: T) -> Box<dyn ConfigObject> {
    Box::new(config)
}

fn types(out: &Value) -> Vec<&str> {
    out.as_array()
        .into_iter()
        .flatten()
        .map(|v| v["type"].as_str().unwrap_or("<missing>"))
        .collect()
}

// =========================================================================
// End-to-end scenarios
// =========================================================================

#[test]
fn test_dump_contacts_single_contact() {
    let mut contacts = Contacts::new();
    let mut c = contacts.get_or_construct(&id("05", 'a')).unwrap();
    c.name = "Test User".into();
    c.nickname = "testuser".into();
    contacts.set(c);

    let out = to_json(&contacts);
    let arr = out.as_array().expect("contacts dump is an array");
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["name"], "Test User");
    assert_eq!(arr[0]["nickname"], "testuser");
    assert_eq!(arr[0]["approved"], false);
    assert_eq!(arr[0]["blocked"], false);
    assert_eq!(arr[0]["notifications"], "default");
}

#[test]
fn test_dump_convos_one_to_one_and_group() {
    let mut convos = ConvoInfoVolatile::new();
    convos.set(convos.get_or_construct_one_to_one(&id("05", '1')).unwrap());
    convos.set(convos.get_or_construct_group(&id("03", '2')).unwrap());

    let out = to_json(&convos);
    let arr = out.as_array().expect("convo dump is an array");
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["type"], "one_to_one");
    assert_eq!(arr[0]["session_id"], id("05", '1'));
    assert_eq!(arr[1]["type"], "group");
    assert_eq!(arr[1]["id"], id("03", '2'));
}

// =========================================================================
// Dispatch totality
// =========================================================================

#[test]
fn test_dump_every_kind_has_expected_shape() {
    let info = Info::new(&id("03", 'f')).unwrap();
    let handles = vec![
        (boxed(UserProfile::new()), false),
        (boxed(ConvoInfoVolatile::new()), true),
        (boxed(UserGroups::new()), true),
        (boxed(Contacts::new()), true),
        (boxed(Members::new()), true),
        (boxed(info), false),
    ];

    for (handle, is_array) in handles {
        let out = to_json(handle.as_ref());
        assert_eq!(out.is_array(), is_array, "kind {}", handle.kind_name());
        assert_eq!(out.is_object(), !is_array, "kind {}", handle.kind_name());
    }
}

#[test]
fn test_dump_user_profile_has_every_field() {
    let out = to_json(&UserProfile::new());
    for key in ["name", "profile_pic", "blinded_msgreqs", "nts_priority", "nts_expiry"] {
        assert!(out.get(key).is_some(), "missing {key}");
    }
}

// =========================================================================
// Variant tags and ordering
// =========================================================================

#[test]
fn test_dump_convos_type_tags_follow_natural_order() {
    let mut convos = ConvoInfoVolatile::new();
    convos.set(convos.get_or_construct_legacy_group(&id("05", '4')).unwrap());
    convos.set(convos.get_or_construct_group(&id("03", '3')).unwrap());
    convos.set(
        convos
            .get_or_construct_community("https://open.example", "room", KEY_HEX)
            .unwrap(),
    );
    convos.set(convos.get_or_construct_one_to_one(&id("05", '1')).unwrap());

    let out = to_json(&convos);
    assert_eq!(types(&out), ["one_to_one", "community", "group", "legacy_group"]);
    assert_eq!(out[1]["url"], "https://open.example/room");
    assert_eq!(out[1]["pub_key"], KEY_HEX);
}

#[test]
fn test_dump_user_groups_tags_match_populated_fields() {
    let mut groups = UserGroups::new();
    let mut legacy = groups.get_or_construct_legacy_group(&id("05", '7')).unwrap();
    legacy.insert_member(&id("05", '8'), true).unwrap();
    groups.set(legacy);
    let mut community = groups
        .get_or_construct_community("http://chat.host:80", "Main", KEY_HEX)
        .unwrap();
    community.base.notifications = NotifyMode::MentionsOnly;
    groups.set(community);
    groups.set(groups.get_or_construct_group(&id("03", '6')).unwrap());

    let out = to_json(&groups);
    assert_eq!(types(&out), ["group", "community", "legacy_group"]);
    assert!(out[0].get("secret_key").is_some());
    assert_eq!(out[1]["url"], "http://chat.host/main");
    assert_eq!(out[1]["notifications"], "mentions_only");
    assert_eq!(out[2]["members"], json!([{"session_id": id("05", '8'), "admin": true}]));
}

#[test]
fn test_dump_convos_after_merged_community_erase() {
    let mut convos = ConvoInfoVolatile::new();
    let community = convos
        .get_or_construct_community("https://open.example/", "Lobby", KEY_HEX)
        .unwrap();
    let one_to_one = convos.get_or_construct_one_to_one(&id("05", '5')).unwrap();
    let upsert = CollectionDelta::<Conversation, ConversationKey> {
        set: vec![community.into(), one_to_one.into()],
        erase: vec![],
    };
    let data = JsonCodec.encode(&upsert).unwrap();
    convos.merge(&[("c1", &data)]).unwrap();
    assert_eq!(types(&to_json(&convos)), ["one_to_one", "community"]);

    let erase = CollectionDelta::<Conversation, ConversationKey> {
        set: vec![],
        erase: vec![ConversationKey::Community("https://open.example/lobby".into())],
    };
    let data = JsonCodec.encode(&erase).unwrap();
    convos.merge(&[("c2", &data)]).unwrap();

    let out = to_json(&convos);
    assert_eq!(types(&out), ["one_to_one"]);
    assert_eq!(out[0]["session_id"], id("05", '5'));
}

#[test]
fn test_dump_members_after_merge() {
    let mut members = Members::new();
    let delta = CollectionDelta::<GroupMember, String> {
        set: vec![
            GroupMember {
                name: "zed".into(),
                ..GroupMember::new(id("05", 'e'))
            },
            GroupMember {
                admin: true,
                ..GroupMember::new(id("05", 'b'))
            },
        ],
        erase: vec![],
    };
    let data = JsonCodec.encode(&delta).unwrap();
    assert_eq!(members.merge(&[("m1", &data)]).unwrap(), ["m1"]);

    let out = to_json(&members);
    assert_eq!(out[0]["session_id"], id("05", 'b'));
    assert_eq!(out[0]["admin"], true);
    assert_eq!(out[1]["name"], "zed");
}

// =========================================================================
// Binary encoding and determinism
// =========================================================================

#[test]
fn test_binary_fields_round_trip_through_base64() {
    let key: Vec<u8> = (0u8..=255).collect();
    let mut contacts = Contacts::new();
    let mut c = Contact::new(id("05", 'c'));
    c.profile_picture = ProfilePic::new("http://files/p", key.clone());
    contacts.set(c);

    let out = to_json(&contacts);
    let encoded = out[0]["profile_picture"]["key"].as_str().expect("key is text");
    assert_eq!(BASE64_STANDARD.decode(encoded).unwrap(), key);

    for len in [1usize, 2, 3, 31, 32, 33] {
        let bytes = vec![0xA5u8; len];
        assert_eq!(BASE64_STANDARD.decode(encode_binary(&bytes)).unwrap(), bytes);
    }
}

#[test]
fn test_dump_unchanged_handle_is_identical() {
    let mut profile = UserProfile::new();
    profile.set_name("Same");
    profile.set_nts_expiry(Duration::from_secs(30));

    let first = to_json(&profile).to_string();
    let second = to_json(&profile).to_string();
    assert_eq!(first, second);
}
