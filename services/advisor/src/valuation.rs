//! Item valuation
//!
//! Computes a player-specific utility for any catalog item:
//!
//! `utility = (gain × upgrade_multiplier + need_bonus) × scarcity + block`
//!
//! where `gain` is the marginal score improvement over the best owned item
//! in the same background, the need bonus rewards filling an unmet
//! collection slot, scarcity scales contested requirements, and the block
//! term rewards denying an item rivals still need. Utility is an internal
//! desirability score, not a currency amount.

use rust_decimal::Decimal;
use types::errors::QueryError;
use types::ids::PlayerName;
use types::item::Item;
use types::rules::GameRules;

use crate::engine::AdvisorConfig;
use crate::ledger::{AuctionLedger, NeedState};
use crate::scarcity;

/// Marginal score improvement the item offers over the best owned item in
/// its background, floored at zero.
///
/// `gain = max(score − best_owned_in_background, 0)`
///
/// Zero when the player already owns something at least as good, which
/// keeps redundant downgrades worthless.
pub fn marginal_gain(need: &NeedState, item: &Item) -> Decimal {
    let best = need.best_owned_score(&item.background);
    (item.score.as_decimal() - best.as_decimal()).max(Decimal::ZERO)
}

/// Fixed bonus for filling an unmet collection slot.
///
/// The background and special-fur bonuses stack when one item fills both
/// (a special-fur item in a missing mandatory background).
pub fn need_bonus(
    config: &AdvisorConfig,
    need: &NeedState,
    rules: &GameRules,
    item: &Item,
) -> Decimal {
    let mut bonus = Decimal::ZERO;
    if rules.is_mandatory(&item.background)
        && need.missing_backgrounds().contains(&item.background)
    {
        bonus += config.need_bonus_background;
    }
    if rules.is_special(item) && !need.has_special_fur() {
        bonus += config.need_bonus_special_fur;
    }
    bonus
}

/// Rivals for whom the item would fill a currently-unmet requirement
pub fn rivals_needing(ledger: &AuctionLedger, item: &Item, player: &PlayerName) -> usize {
    ledger
        .need_states()
        .filter(|(name, need)| *name != player && need.fills_unmet_need(ledger.rules(), item))
        .count()
}

/// Player-specific utility of acquiring the item, always ≥ 0.
///
/// A finished collector (every requirement met) is valued on marginal
/// gain alone, with no need, scarcity, or block terms. An item that fills
/// no unmet need and offers no positive gain has utility zero and the
/// block term never applies to it.
pub fn utility(
    ledger: &AuctionLedger,
    config: &AdvisorConfig,
    item: &Item,
    player: &PlayerName,
) -> Result<Decimal, QueryError> {
    let need = ledger.need_state(player)?;
    let rules = ledger.rules();

    let gain = marginal_gain(need, item);

    if need.is_complete() {
        return Ok(gain * config.upgrade_multiplier);
    }

    let bonus = need_bonus(config, need, rules, item);
    if gain.is_zero() && bonus.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let base = gain * config.upgrade_multiplier + bonus;
    let requirement = scarcity::relevant_requirement(rules, item);
    let factor = scarcity::factor_for(ledger, config.scarcity_scale, &requirement);
    let block = config.block_weight * Decimal::from(rivals_needing(ledger, item, player) as u64);

    Ok(base * factor + block)
}


// ── Property-Based Tests ────────────────────────────────────────────────
