//! Error types for the auction advisor
//!
//! Comprehensive error taxonomy using thiserror

use crate::ids::{PlayerName, TokenId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Top-level advisor error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdvisorError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),

    #[error("Sale error: {0}")]
    Sale(#[from] SaleError),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),
}

/// Errors raised while loading the item catalog
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Duplicate token in catalog: {token}")]
    DuplicateToken { token: TokenId },

    #[error("Token {token} has an empty {attribute} trait")]
    EmptyTrait { token: TokenId, attribute: String },

    #[error("Token {token} has no score and no trait rarities to derive one from")]
    MissingScore { token: TokenId },

    #[error("Token {token} has a negative score: {value}")]
    NegativeScore { token: TokenId, value: Decimal },

    #[error("Token {token} has non-positive rarity for trait {attribute}: {value}")]
    NonPositiveRarity {
        token: TokenId,
        attribute: String,
        value: Decimal,
    },
}

/// Errors raised while registering players
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RosterError {
    #[error("Player already registered: {name}")]
    DuplicatePlayer { name: PlayerName },

    #[error("Starting budget must be non-negative, got {value}")]
    NegativeBudget { value: Decimal },
}

/// Errors raised while recording sales
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SaleError {
    #[error("Token already sold: {token}")]
    AlreadySold { token: TokenId },

    #[error("Token not in catalog: {token}")]
    UnknownToken { token: TokenId },

    #[error("Player not registered: {name}")]
    UnknownPlayer { name: PlayerName },

    #[error("Sale price must be non-negative, got {value}")]
    NegativePrice { value: Decimal },
}

/// Errors raised by advisor queries
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Token not in catalog: {token}")]
    UnknownToken { token: TokenId },

    #[error("Player not registered: {name}")]
    UnknownPlayer { name: PlayerName },
}
