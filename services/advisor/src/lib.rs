//! Auction Advisor Service
//!
//! The valuation, scarcity, and bid-allocation engine for the collection
//! auction game. Tracks ownership and budgets through a single transactional
//! ledger and answers, for any unsold item:
//! - how much the item is worth to a given player (utility),
//! - how much of the remaining budget to commit to it (max bid),
//! - which items to nominate for auction to exploit valuation edges.

pub mod allocation;
pub mod engine;
pub mod events;
pub mod ledger;
pub mod nomination;
pub mod scarcity;
pub mod session;
pub mod valuation;
