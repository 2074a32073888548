//! Catalog item model
//!
//! An item is one auctionable token: its background trait, its fur trait
//! and its rarity score. Items are immutable once the catalog is loaded;
//! ownership and sale state live in the auction ledger, not here.

use crate::ids::TokenId;
use crate::numeric::Score;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Background trait of an item (e.g. "Blue", "Aquamarine")
///
/// Compared case-sensitively, exactly as spelled in the source data.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Background(String);

impl Background {
    /// Create a new Background from a string
    ///
    /// # Panics
    /// Panics if the name is empty
    pub fn new(name: impl Into<String>) -> Self {
        let s = name.into();
        assert!(!s.is_empty(), "Background must not be empty");
        Self(s)
    }

    /// Try to create a Background, returning None if empty
    pub fn try_new(name: impl Into<String>) -> Option<Self> {
        let s = name.into();
        if s.is_empty() {
            None
        } else {
            Some(Self(s))
        }
    }

    /// Get the trait string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Background {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Fur trait of an item (e.g. "Solid Gold", "Brown")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fur(String);

impl Fur {
    /// Create a new Fur from a string
    ///
    /// # Panics
    /// Panics if the name is empty
    pub fn new(name: impl Into<String>) -> Self {
        let s = name.into();
        assert!(!s.is_empty(), "Fur must not be empty");
        Self(s)
    }

    /// Try to create a Fur, returning None if empty
    pub fn try_new(name: impl Into<String>) -> Option<Self> {
        let s = name.into();
        if s.is_empty() {
            None
        } else {
            Some(Self(s))
        }
    }

    /// Get the trait string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Fur {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One auctionable token from the collection catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Catalog identifier
    pub token_id: TokenId,
    /// Background trait
    pub background: Background,
    /// Fur trait
    pub fur: Fur,
    /// Rarity score (higher is rarer)
    pub score: Score,
}

impl Item {
    pub fn new(token_id: TokenId, background: Background, fur: Fur, score: Score) -> Self {
        Self {
            token_id,
            background,
            fur,
            score,
        }
    }
}
