//! Auction Simulation Harness
//!
//! Deterministic simulation framework for the collection-auction advisor.
//! Seats advisor-driven and seeded random bidders around one shared
//! session, runs the sequential auction lot by lot, and reports final
//! standings.
//!
//! # Modules
//! - `auction` — Sequential lot runner with nomination and price resolution
//! - `bidders` — Advisor-driven and seeded random bidder seats
//! - `reports` — Final standings and JSON export

pub mod auction;
pub mod bidders;
pub mod reports;

/// Crate version constant
pub const VERSION: &str = "1.0.0";
