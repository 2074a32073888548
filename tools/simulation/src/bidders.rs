//! Bidder seats
//!
//! Two strategies for the simulated auction room: one bids exactly the
//! advisor's recommended ceiling, the other bids a seeded random share of
//! its remaining budget. Both are deterministic for a fixed seed.

use advisor::engine::Advisor;
use advisor::ledger::AuctionLedger;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::ids::{PlayerName, TokenId};
use types::numeric::Money;

/// One seat in the simulated auction room.
pub trait Bidder {
    /// The player this seat bids for.
    fn player(&self) -> &PlayerName;

    /// Token this seat puts up when it is their turn to nominate.
    ///
    /// `None` when the remaining pool is empty.
    fn nominate(&mut self, ledger: &AuctionLedger) -> Option<TokenId>;

    /// The most this seat will pay for the token. Zero sits the lot out.
    fn ceiling(&mut self, ledger: &AuctionLedger, token: TokenId) -> Money;
}

/// Seat that follows the advisor's recommendations exactly.
///
/// Nominates its best-edge token and bids up to `max_bid`, so a room of
/// these seats exercises the whole engine end to end.
pub struct AdvisorBidder {
    pub name: PlayerName,
    advisor: Advisor,
}

impl AdvisorBidder {
    /// Create a seat driven by the given advisor.
    pub fn new(name: PlayerName, advisor: Advisor) -> Self {
        Self { name, advisor }
    }
}

impl Bidder for AdvisorBidder {
    fn player(&self) -> &PlayerName {
        &self.name
    }

    fn nominate(&mut self, ledger: &AuctionLedger) -> Option<TokenId> {
        let rows = self.advisor.rank_nominations(ledger, &self.name, 1).ok()?;
        rows.first().map(|row| row.token)
    }

    fn ceiling(&mut self, ledger: &AuctionLedger, token: TokenId) -> Money {
        self.advisor
            .max_bid(ledger, token, &self.name)
            .unwrap_or(Money::ZERO)
    }
}

/// Configuration for the random seat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomBidderConfig {
    /// Probability of sitting a lot out entirely (0.0 to 1.0)
    pub sit_out_ratio: f64,
    /// Largest share of the remaining budget put on one lot, in percent
    pub max_budget_percent: u32,
}

impl Default for RandomBidderConfig {
    fn default() -> Self {
        Self {
            sit_out_ratio: 0.25,
            max_budget_percent: 60,
        }
    }
}

/// Seat that bids a random share of its remaining budget.
///
/// Ignores the advisor entirely; stands in for the table's unmodeled
/// opponents. Deterministic for a fixed seed.
pub struct RandomBidder {
    pub name: PlayerName,
    pub config: RandomBidderConfig,
    rng: ChaCha8Rng,
}

impl RandomBidder {
    /// Create a random seat with a deterministic seed.
    pub fn new(name: PlayerName, config: RandomBidderConfig, seed: u64) -> Self {
        Self {
            name,
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Bidder for RandomBidder {
    fn player(&self) -> &PlayerName {
        &self.name
    }

    fn nominate(&mut self, ledger: &AuctionLedger) -> Option<TokenId> {
        let pool: Vec<TokenId> = ledger.remaining_pool().map(|item| item.token_id).collect();
        if pool.is_empty() {
            return None;
        }
        let pick = self.rng.gen_range(0..pool.len());
        Some(pool[pick])
    }

    fn ceiling(&mut self, ledger: &AuctionLedger, _token: TokenId) -> Money {
        let budget = match ledger.player(&self.name) {
            Some(player) => player.budget,
            None => return Money::ZERO,
        };
        if budget <= Money::ZERO {
            return Money::ZERO;
        }

        if self.config.max_budget_percent == 0 || self.rng.gen_bool(self.config.sit_out_ratio) {
            return Money::ZERO;
        }

        let percent = self.rng.gen_range(1..=self.config.max_budget_percent);
        let raw = budget.as_decimal() * Decimal::from(percent) / Decimal::from(100u32);
        Money::new(raw.round_dp_with_strategy(1, RoundingStrategy::ToZero))
    }
}
