//! Scarcity estimation
//!
//! Demand over supply per collection requirement, computed against the
//! remaining pool at query time and never cached across sales. Demand is
//! the number of players for whom the requirement is still unmet; supply
//! is the number of remaining-pool items that would fill it.

use rust_decimal::Decimal;
use types::item::Item;
use types::rules::{GameRules, Requirement};

use crate::ledger::AuctionLedger;

/// Scarcity multiplier for a requirement.
///
/// `factor = 1 + scale × demand / supply`
///
/// A supply of zero is treated as 1: the degenerate "none left" case
/// yields the scarcity ceiling instead of a division error. The factor is
/// always ≥ 1, grows with demand and shrinks as supply recovers.
pub fn scarcity_factor(demand: usize, supply: usize, scale: Decimal) -> Decimal {
    let effective_supply = supply.max(1);
    let pressure = Decimal::from(demand as u64) / Decimal::from(effective_supply as u64);
    Decimal::ONE + scale * pressure
}

/// Scarcity factor for a requirement, read from the ledger indices
pub fn factor_for(ledger: &AuctionLedger, scale: Decimal, requirement: &Requirement) -> Decimal {
    scarcity_factor(
        ledger.demand(requirement),
        ledger.supply(requirement),
        scale,
    )
}

/// The requirement whose scarcity applies when valuing an item: the
/// special-fur requirement if the item carries the fur, else the item's
/// background
pub fn relevant_requirement(rules: &GameRules, item: &Item) -> Requirement {
    if rules.is_special(item) {
        Requirement::SpecialFur
    } else {
        Requirement::Background(item.background.clone())
    }
}


// ── Property-Based Tests ────────────────────────────────────────────────
