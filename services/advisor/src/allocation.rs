//! Bid allocation
//!
//! Converts item utility into a bounded monetary recommendation. Cash is
//! allocated proportionally between this item and the best remaining
//! candidates for the player's other unmet requirements, after holding
//! back a small reserve so later required items can still draw a bid.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use std::collections::BTreeMap;
use types::errors::QueryError;
use types::ids::PlayerName;
use types::item::{Background, Item};
use types::numeric::Money;
use types::rules::Requirement;

use crate::engine::{AdvisorConfig, BidRounding, CompletionPolicy};
use crate::ledger::AuctionLedger;
use crate::valuation;

/// Maximum recommended bid for the item, in `[0, budget]`.
///
/// `bid = free_cash × utility / (utility + alternative_total)`
///
/// Free cash is the budget minus one reserve unit per other unmet
/// requirement. Each alternative requirement contributes the utility of
/// its best remaining candidate, or a fallback constant when none remain.
/// An item covering the player's last unmet requirement draws the entire
/// remaining budget. A finished collector bids per the completion policy:
/// nothing on standby, or proportionally across remaining upgrades.
pub fn max_bid(
    ledger: &AuctionLedger,
    config: &AdvisorConfig,
    item: &Item,
    player: &PlayerName,
) -> Result<Money, QueryError> {
    let budget = ledger
        .player(player)
        .ok_or_else(|| QueryError::UnknownPlayer {
            name: player.clone(),
        })?
        .budget;
    if budget <= Money::ZERO {
        return Ok(Money::ZERO);
    }

    let need = ledger.need_state(player)?;
    if need.is_complete() {
        return match config.completion {
            CompletionPolicy::Standby => Ok(Money::ZERO),
            CompletionPolicy::KeepUpgrading => upgrade_bid(ledger, config, item, player, budget),
        };
    }

    let utility = valuation::utility(ledger, config, item, player)?;
    if utility.is_zero() {
        return Ok(Money::ZERO);
    }

    let rules = ledger.rules();
    let alternatives: Vec<Requirement> = need
        .unmet(rules)
        .into_iter()
        .filter(|requirement| !rules.satisfies(item, requirement))
        .collect();

    // Last unmet requirement: go for it
    if alternatives.is_empty() {
        return Ok(budget);
    }

    let mut alternative_total = Decimal::ZERO;
    for requirement in &alternatives {
        alternative_total += best_alternative_utility(ledger, config, requirement, player)?;
    }

    let reserve = config.reserve_per_requirement * Decimal::from(alternatives.len() as u64);
    let free = (budget - reserve).max(Money::ZERO);
    let raw = free.as_decimal() * utility / (utility + alternative_total);

    Ok(round_bid(raw, budget, config.rounding))
}

/// Bid for a finished collector under `KeepUpgrading`.
///
/// The opportunity cost of an upgrade is the best remaining upgrade in
/// each other mandatory background; requirements are all met, so nothing
/// is reserved and exhausted backgrounds contribute nothing.
fn upgrade_bid(
    ledger: &AuctionLedger,
    config: &AdvisorConfig,
    item: &Item,
    player: &PlayerName,
    budget: Money,
) -> Result<Money, QueryError> {
    let utility = valuation::utility(ledger, config, item, player)?;
    if utility.is_zero() {
        return Ok(Money::ZERO);
    }

    let rules = ledger.rules();
    let mut best_by_background: BTreeMap<&Background, Decimal> = BTreeMap::new();
    for candidate in ledger.remaining_pool() {
        if candidate.background == item.background || !rules.is_mandatory(&candidate.background) {
            continue;
        }
        let candidate_utility = valuation::utility(ledger, config, candidate, player)?;
        let best = best_by_background
            .entry(&candidate.background)
            .or_insert(Decimal::ZERO);
        if candidate_utility > *best {
            *best = candidate_utility;
        }
    }
    let alternative_total: Decimal = best_by_background.values().copied().sum();

    let raw = budget.as_decimal() * utility / (utility + alternative_total);
    Ok(round_bid(raw, budget, config.rounding))
}

// ── Helpers ──────────────────────────────────────────────────────────────

/// Utility of the best remaining candidate for the requirement, or the
/// configured fallback when the pool holds none.
fn best_alternative_utility(
    ledger: &AuctionLedger,
    config: &AdvisorConfig,
    requirement: &Requirement,
    player: &PlayerName,
) -> Result<Decimal, QueryError> {
    let mut best: Option<Decimal> = None;
    for candidate in ledger.remaining_pool() {
        if !ledger.rules().satisfies(candidate, requirement) {
            continue;
        }
        let utility = valuation::utility(ledger, config, candidate, player)?;
        best = Some(match best {
            Some(current) if current >= utility => current,
            _ => utility,
        });
    }
    Ok(best.unwrap_or(config.fallback_requirement_utility))
}

/// Clamp to `[0, budget]` and round down to the table's denomination.
///
/// Rounding moves toward zero, keeping the result inside the clamp.
/// Whole rounding floors at one unit whenever a positive bid is
/// warranted, still bounded by the budget; a budget below one unit
/// leaves that floor fractional at the budget itself.
fn round_bid(raw: Decimal, budget: Money, rounding: BidRounding) -> Money {
    let clamped = raw.clamp(Decimal::ZERO, budget.as_decimal());
    match rounding {
        BidRounding::Tenths => {
            Money::new(clamped.round_dp_with_strategy(1, RoundingStrategy::ToZero))
        }
        BidRounding::Whole => {
            let floored = clamped.floor();
            if floored.is_zero() && clamped > Decimal::ZERO {
                Money::ONE.min(budget)
            } else {
                Money::new(floored)
            }
        }
    }
}


// ── Property-Based Tests ────────────────────────────────────────────────
