//! Advisor — orchestrator
//!
//! Ties together valuation, bid allocation, nomination ranking, and
//! scarcity queries over a ledger snapshot, under one tunable weight
//! configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::errors::QueryError;
use types::ids::{PlayerName, TokenId};
use types::numeric::Money;
use types::rules::Requirement;

use crate::allocation;
use crate::ledger::AuctionLedger;
use crate::nomination::{self, NominationAdvice};
use crate::scarcity;
use crate::valuation;

/// Denomination bids are rounded down to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BidRounding {
    /// One decimal place of the budget unit
    Tenths,
    /// Whole units, flooring at one unit when a positive bid is warranted
    Whole,
}

/// What a finished collector does with the rest of the auction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionPolicy {
    /// Stop bidding once every requirement is met
    Standby,
    /// Keep bidding on items that upgrade an owned background
    KeepUpgrading,
}

/// Advisor weight configuration
///
/// Every weight is non-negative. Changing the configuration affects only
/// future queries, never recorded sales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Weight on marginal score gain in the utility base
    pub upgrade_multiplier: Decimal,
    /// Bonus for filling an unmet mandatory background
    pub need_bonus_background: Decimal,
    /// Bonus for a first special-fur item; larger than the background
    /// bonus because one such item covers the whole collection
    pub need_bonus_special_fur: Decimal,
    /// Weight on the demand/supply ratio in the scarcity factor
    pub scarcity_scale: Decimal,
    /// Utility per rival who still needs the item
    pub block_weight: Decimal,
    /// Score multiplier in the simplified rival valuation
    pub rival_need_weight: Decimal,
    /// Stand-in utility for an unmet requirement with nothing left in
    /// the pool
    pub fallback_requirement_utility: Decimal,
    /// Cash held back per other unmet requirement when allocating a bid
    pub reserve_per_requirement: Money,
    /// Denomination recommended bids are rounded to
    pub rounding: BidRounding,
    /// Behavior once the collection is complete
    pub completion: CompletionPolicy,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            upgrade_multiplier: Decimal::ONE,
            need_bonus_background: Decimal::from(8),
            need_bonus_special_fur: Decimal::from(15),
            scarcity_scale: Decimal::ONE,
            block_weight: Decimal::from_str_exact("0.5").unwrap(),
            rival_need_weight: Decimal::from_str_exact("1.5").unwrap(),
            fallback_requirement_utility: Decimal::ONE,
            reserve_per_requirement: Money::ONE,
            rounding: BidRounding::Tenths,
            completion: CompletionPolicy::Standby,
        }
    }
}

impl AdvisorConfig {
    /// Weight invariant: every tunable is non-negative
    pub fn check_invariant(&self) -> bool {
        self.upgrade_multiplier >= Decimal::ZERO
            && self.need_bonus_background >= Decimal::ZERO
            && self.need_bonus_special_fur >= Decimal::ZERO
            && self.scarcity_scale >= Decimal::ZERO
            && self.block_weight >= Decimal::ZERO
            && self.rival_need_weight >= Decimal::ZERO
            && self.fallback_requirement_utility >= Decimal::ZERO
            && !self.reserve_per_requirement.is_negative()
    }
}

/// Auction advisor service
#[derive(Debug, Clone)]
pub struct Advisor {
    config: AdvisorConfig,
}

impl Advisor {
    /// Create a new advisor with default weights
    pub fn new() -> Self {
        Self {
            config: AdvisorConfig::default(),
        }
    }

    /// Create a new advisor with custom weights
    ///
    /// # Panics
    /// Panics if any weight is negative
    pub fn with_config(config: AdvisorConfig) -> Self {
        assert!(
            config.check_invariant(),
            "AdvisorConfig weights must be non-negative"
        );
        Self { config }
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Player-specific utility of acquiring the token
    pub fn utility(
        &self,
        ledger: &AuctionLedger,
        token: TokenId,
        player: &PlayerName,
    ) -> Result<Decimal, QueryError> {
        let item = ledger.item(token)?;
        valuation::utility(ledger, &self.config, item, player)
    }

    /// Maximum recommended bid on the token, bounded by the player's
    /// remaining budget
    pub fn max_bid(
        &self,
        ledger: &AuctionLedger,
        token: TokenId,
        player: &PlayerName,
    ) -> Result<Money, QueryError> {
        let item = ledger.item(token)?;
        allocation::max_bid(ledger, &self.config, item, player)
    }

    /// Top-n remaining items the player should put up for auction,
    /// ranked by edge over the best rival
    pub fn rank_nominations(
        &self,
        ledger: &AuctionLedger,
        player: &PlayerName,
        top_n: usize,
    ) -> Result<Vec<NominationAdvice>, QueryError> {
        nomination::rank(ledger, &self.config, player, top_n)
    }

    /// Current scarcity factor for a requirement over the remaining pool
    pub fn scarcity_factor(&self, ledger: &AuctionLedger, requirement: &Requirement) -> Decimal {
        scarcity::factor_for(ledger, self.config.scarcity_scale, requirement)
    }
}

impl Default for Advisor {
    fn default() -> Self {
        Self::new()
    }
}
