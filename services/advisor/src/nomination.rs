//! Nomination ranking
//!
//! Ranks remaining items by `edge = self_utility − best_rival_utility`.
//! High-edge items are the ones to put up for auction: the querying
//! player values them far more than any rival appears to. Rivals get a
//! simplified valuation, score scaled by a need weight when the item
//! fills one of their unmet requirements, since their true weights are
//! not observable.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::errors::QueryError;
use types::ids::{PlayerName, TokenId};
use types::item::Item;
use types::rules::GameRules;

use crate::engine::AdvisorConfig;
use crate::ledger::{AuctionLedger, NeedState};
use crate::valuation;

/// One ranked nomination candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NominationAdvice {
    pub token: TokenId,
    /// Self utility minus the best rival utility; may be negative
    pub edge: Decimal,
    pub self_utility: Decimal,
    pub best_rival_utility: Decimal,
}

/// Simplified valuation of the item from a rival's seat.
///
/// `rival_utility = rival_need_weight × score` when the item fills one
/// of the rival's unmet requirements, zero otherwise.
pub fn rival_utility(
    config: &AdvisorConfig,
    need: &NeedState,
    rules: &GameRules,
    item: &Item,
) -> Decimal {
    if need.fills_unmet_need(rules, item) {
        config.rival_need_weight * item.score.as_decimal()
    } else {
        Decimal::ZERO
    }
}

/// Highest simplified valuation among the player's rivals, zero when
/// alone at the table
pub fn best_rival_utility(
    ledger: &AuctionLedger,
    config: &AdvisorConfig,
    item: &Item,
    player: &PlayerName,
) -> Decimal {
    ledger
        .need_states()
        .filter(|(name, _)| *name != player)
        .map(|(_, need)| rival_utility(config, need, ledger.rules(), item))
        .max()
        .unwrap_or(Decimal::ZERO)
}

/// Rank the remaining pool by edge, descending, and keep the top n.
///
/// Equal edges resolve to the lower token id so repeated queries over
/// the same snapshot return the same order.
pub fn rank(
    ledger: &AuctionLedger,
    config: &AdvisorConfig,
    player: &PlayerName,
    top_n: usize,
) -> Result<Vec<NominationAdvice>, QueryError> {
    ledger.need_state(player)?;

    let mut ranked = Vec::with_capacity(ledger.remaining_count());
    for item in ledger.remaining_pool() {
        let self_utility = valuation::utility(ledger, config, item, player)?;
        let best_rival = best_rival_utility(ledger, config, item, player);
        ranked.push(NominationAdvice {
            token: item.token_id,
            edge: self_utility - best_rival,
            self_utility,
            best_rival_utility: best_rival,
        });
    }

    ranked.sort_by(|a, b| b.edge.cmp(&a.edge).then(a.token.cmp(&b.token)));
    ranked.truncate(top_n);
    Ok(ranked)
}


// ── Property-Based Tests ────────────────────────────────────────────────
