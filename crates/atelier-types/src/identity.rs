//! Account identity and creator profile structures.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque principal identifier (wallet/key/account id).
///
/// The marketplace never interprets the contents; equality is the only
/// operation the core relies on. Authentication of the caller behind an
/// id happens outside the core.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A registered creator profile.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Creator {
    pub account_id: AccountId,
    /// 1–50 characters.
    pub username: String,
    /// 0–500 characters.
    pub bio: String,
    pub created_at: u64,
    /// Never reset to false; there is no creator deletion.
    pub active: bool,
}
