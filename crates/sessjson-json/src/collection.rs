//! Collection encoders: containers that dump as a JSON array.

use serde_json::Value;
use sessjson_config::{Contacts, ConvoInfoVolatile, Members, UserGroups};

use crate::EncodeJson;

/// Encodes records in the order given. Nothing is re-sorted here.
pub fn encode_array<'a, T, I>(records: I) -> Value
where
    T: EncodeJson + 'a,
    I: IntoIterator<Item = &'a T>,
{
    Value::Array(records.into_iter().map(|r| r.encode_json()).collect())
}

pub fn encode_contacts(contacts: &Contacts) -> Value {
    encode_array(contacts.iter())
}

pub fn encode_conversations(convos: &ConvoInfoVolatile) -> Value {
    encode_array(convos.iter())
}

pub fn encode_user_groups(groups: &UserGroups) -> Value {
    encode_array(groups.iter())
}

pub fn encode_members(members: &Members) -> Value {
    encode_array(members.iter())
}
