//! Identifier types for auction entities
//!
//! Token ids come from the catalog source data as plain integers; player
//! names are the keys participants register under at the table. Both get
//! newtypes so the engine cannot confuse them with loose numbers and
//! strings, and both order deterministically for use as `BTreeMap` keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a catalog item (token).
///
/// Backed by the integer id column of the source data, so it sorts in
/// catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(u64);

impl TokenId {
    /// Create a TokenId from its raw integer value
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw integer value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TokenId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Key an auction participant registers under
///
/// Names are free-form but must not be empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerName(String);

impl PlayerName {
    /// Create a new PlayerName from a string
    ///
    /// # Panics
    /// Panics if the name is empty
    pub fn new(name: impl Into<String>) -> Self {
        let s = name.into();
        assert!(!s.is_empty(), "PlayerName must not be empty");
        Self(s)
    }

    /// Try to create a PlayerName, returning None if empty
    pub fn try_new(name: impl Into<String>) -> Option<Self> {
        let s = name.into();
        if s.is_empty() {
            None
        } else {
            Some(Self(s))
        }
    }

    /// Get the name string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
