//! Types library for the collection-auction advisor
//!
//! This library provides all core type definitions shared by the advisor
//! engine and the simulation tooling, ensuring type safety and
//! deterministic behavior.
//!
//! # Modules
//! - `ids`: Identifiers (TokenId, PlayerName)
//! - `numeric`: Fixed-point decimal types (Money, Score)
//! - `item`: Catalog item and trait types
//! - `catalog`: Catalog loading and score derivation
//! - `rules`: Collection game rules and requirements
//! - `player`: Player budget and holdings state
//! - `errors`: Error taxonomy

// Public modules
pub mod catalog;
pub mod errors;
pub mod ids;
pub mod item;
pub mod numeric;
pub mod player;
pub mod rules;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::catalog::*;
    pub use crate::errors::*;
    pub use crate::ids::*;
    pub use crate::item::*;
    pub use crate::numeric::*;
    pub use crate::player::*;
    pub use crate::rules::*;
}
