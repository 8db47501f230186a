//! The kind dispatcher.
//!
//! Given any config handle, pick the encoder for its kind and run it.
//! This never fails: a handle whose kind isn't one of the six known ones
//! becomes `{}`.
//!
//! ```text
//! UserProfile        → object
//! ConvoInfoVolatile  → array
//! UserGroups         → array
//! Contacts           → array
//! Members            → array
//! Info               → object
//! anything else      → {}
//! ```

use serde_json::{Map, Value};
use sessjson_config::{ConfigObject, ConfigView};

use crate::EncodeJson;
use crate::collection::{
    encode_contacts, encode_conversations, encode_members, encode_user_groups,
};

/// Encodes one typed view.
pub fn encode_view(view: ConfigView<'_>) -> Value {
    match view {
        ConfigView::UserProfile(p) => p.encode_json(),
        ConfigView::ConvoInfoVolatile(c) => encode_conversations(c),
        ConfigView::UserGroups(g) => encode_user_groups(g),
        ConfigView::Contacts(c) => encode_contacts(c),
        ConfigView::Members(m) => encode_members(m),
        ConfigView::Info(i) => i.encode_json(),
    }
}

/// Dumps any config handle as a JSON value.
pub fn to_json(config: &dyn ConfigObject) -> Value {
    match config.view() {
        Some(view) => {
            tracing::trace!(kind = %view.kind(), "dumping config");
            encode_view(view)
        }
        None => {
            tracing::debug!(
                kind = config.kind_name(),
                "unrecognised config kind, dumping empty object"
            );
            Value::Object(Map::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sessjson_config::{ConfigError, Contacts, UserProfile};

    /// A handle of a kind the dispatcher doesn't know.
    struct Opaque;

    impl ConfigObject for Opaque {
        fn kind_name(&self) -> &'static str {
            "Opaque"
        }

        fn view(&self) -> Option<ConfigView<'_>> {
            None
        }

        fn merge(&mut self, _: &[(&str, &[u8])]) -> Result<Vec<String>, ConfigError> {
            Ok(Vec::new())
        }

        fn current_hashes(&self) -> Vec<String> {
            Vec::new()
        }

        fn needs_dump(&self) -> bool {
            false
        }

        fn mark_dumped(&mut self) {}
    }

    #[test]
    fn test_to_json_unrecognised_kind_is_empty_object() {
        assert_eq!(to_json(&Opaque), serde_json::json!({}));
    }

    #[test]
    fn test_to_json_shape_follows_kind() {
        assert!(to_json(&Contacts::new()).is_array());
        assert!(to_json(&UserProfile::new()).is_object());
    }
}
