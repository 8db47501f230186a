//! The opaque config handle and the closed set of kinds behind it.
//!
//! Callers above this crate hold a `&dyn ConfigObject` and never need to
//! know which container it is. Code that *does* care (the JSON
//! dispatcher) asks for a [`ConfigView`], which borrows the concrete
//! container as one arm of a sum type. Dispatch is then a single `match`.

use std::fmt;

use crate::{
    ConfigError, Contacts, ConvoInfoVolatile, Info, Members, UserGroups,
    UserProfile,
};

// ---------------------------------------------------------------------------
// ConfigKind
// ---------------------------------------------------------------------------

/// The six config kinds this crate knows how to represent.
///
/// The numeric codes are stable: the C boundary uses them to choose which
/// container `sessjson_config_new` creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKind {
    UserProfile,
    ConvoInfoVolatile,
    UserGroups,
    Contacts,
    Members,
    Info,
}

impl ConfigKind {
    /// Every kind, in dispatch priority order.
    pub const ALL: [ConfigKind; 6] = [
        Self::UserProfile,
        Self::ConvoInfoVolatile,
        Self::UserGroups,
        Self::Contacts,
        Self::Members,
        Self::Info,
    ];

    pub fn code(self) -> u32 {
        match self {
            Self::UserProfile => 0,
            Self::ConvoInfoVolatile => 1,
            Self::UserGroups => 2,
            Self::Contacts => 3,
            Self::Members => 4,
            Self::Info => 5,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::UserProfile => "UserProfile",
            Self::ConvoInfoVolatile => "ConvoInfoVolatile",
            Self::UserGroups => "UserGroups",
            Self::Contacts => "Contacts",
            Self::Members => "Members",
            Self::Info => "Info",
        }
    }
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// ConfigView
// ---------------------------------------------------------------------------

/// A borrowed, typed view of one config container.
#[derive(Debug, Clone, Copy)]
pub enum ConfigView<'a> {
    UserProfile(&'a UserProfile),
    ConvoInfoVolatile(&'a ConvoInfoVolatile),
    UserGroups(&'a UserGroups),
    Contacts(&'a Contacts),
    Members(&'a Members),
    Info(&'a Info),
}

impl ConfigView<'_> {
    pub fn kind(&self) -> ConfigKind {
        match self {
            Self::UserProfile(_) => ConfigKind::UserProfile,
            Self::ConvoInfoVolatile(_) => ConfigKind::ConvoInfoVolatile,
            Self::UserGroups(_) => ConfigKind::UserGroups,
            Self::Contacts(_) => ConfigKind::Contacts,
            Self::Members(_) => ConfigKind::Members,
            Self::Info(_) => ConfigKind::Info,
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigObject
// ---------------------------------------------------------------------------

/// An opaque handle to one config container.
///
/// Every container in this crate implements it through the
/// [`ConfigStore`](crate::ConfigStore) blanket impl. Other types may
/// implement it directly; such a handle returns `None` from
/// [`view`](Self::view) and is treated as an unrecognised kind.
///
/// No locking happens here. Callers serialise access to a given handle.
pub trait ConfigObject {
    /// Human-readable kind name, for logs.
    fn kind_name(&self) -> &'static str;

    /// The typed view of this container, or `None` for a kind outside the
    /// six known ones.
    fn view(&self) -> Option<ConfigView<'_>>;

    /// Merges `(content hash, delta bytes)` pairs into the container.
    ///
    /// Returns the hashes that were accepted. An empty result means
    /// nothing new was merged (every pair was empty or already seen).
    ///
    /// # Errors
    /// Fails if any delta in the batch can't be decoded or a non-empty
    /// delta has no hash. A failed batch leaves the container unchanged.
    fn merge(&mut self, deltas: &[(&str, &[u8])]) -> Result<Vec<String>, ConfigError>;

    /// Hashes of every delta merged so far, in merge order.
    fn current_hashes(&self) -> Vec<String>;

    /// `true` once the container changed since the last
    /// [`mark_dumped`](Self::mark_dumped).
    fn needs_dump(&self) -> bool;

    fn mark_dumped(&mut self);
}
