//! Builds a few configs, merges a remote delta, and prints each dump.
//!
//! ```text
//! RUST_LOG=sessjson_config=debug cargo run -p dump-demo
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use sessjson::config::ProfileFields;
use sessjson::prelude::*;

const PERSON: &str = "0550f2b3b0c1a4e7d9c8b7a6f5e4d3c2b1a0918273645546372819a0b1c2d3e4f5";
const GROUP: &str = "03a1b2c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f60718293a4b5c6d7e8f90";

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

fn print_dump(label: &str, config: &dyn ConfigObject) {
    println!("{label}: {}", dump(config));
}

fn main() -> Result<(), SessjsonError> {
    sessjson::logging::init("info");

    // Contacts
    let mut contacts = Contacts::new();
    let mut contact = contacts.get_or_construct(PERSON)?;
    contact.name = "Test User".into();
    contact.nickname = "testuser".into();
    contacts.set(contact);
    print_dump("contacts", &contacts);

    // Conversations
    let mut convos = ConvoInfoVolatile::new();
    let mut one_to_one = convos.get_or_construct_one_to_one(PERSON)?;
    one_to_one.last_read = now_millis();
    convos.set(one_to_one);
    let mut group = convos.get_or_construct_group(GROUP)?;
    group.last_read = now_millis();
    convos.set(group);
    tracing::info!(
        one_to_one = convos.size_one_to_one(),
        groups = convos.size_groups(),
        "conversations built"
    );
    print_dump("conversations", &convos);

    // User profile, set from a delta as if it came from another device
    let mut profile = UserProfile::new();
    let delta = JsonCodec.encode(&ProfileFields {
        name: Some("Test User".into()),
        ..ProfileFields::default()
    })?;
    let report = merge_reporting(&mut profile, &delta, "profile-1", &MergeOptions::default());
    if let Some(error) = &report.error {
        tracing::warn!(%error, "profile merge failed");
    }
    println!(
        "user profile (accepted: {}): {}",
        report.accepted,
        dump_with(&profile, &DumpOptions { pretty: true })
    );

    // A delta that doesn't decode
    let report = merge_reporting(&mut profile, b"\x00garbage", "profile-2", &MergeOptions::default());
    println!("bad delta: accepted={} error={:?}", report.accepted, report.error);

    Ok(())
}
