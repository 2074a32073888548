//! Sequential auction runner
//!
//! One full collection auction: seats take turns nominating a token,
//! every seat submits a sealed ceiling against the same pre-lot ledger
//! snapshot, and the lot clears one tick above the runner-up ceiling,
//! capped by the winner's own. Hammers go through the shared session
//! transaction, so each outcome carries the advisor events derived from
//! its sale.

use crate::bidders::Bidder;
use advisor::events::AdvisorEvent;
use advisor::session::AuctionSession;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::catalog::Catalog;
use types::errors::RosterError;
use types::ids::{PlayerName, TokenId};
use types::numeric::Money;
use types::rules::GameRules;

/// Configuration for one auction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionConfig {
    /// Smallest price increment; also the opening price for an
    /// uncontested lot
    pub tick: Money,
    /// Hard cap on lots run, sold or passed
    pub max_lots: usize,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            tick: Money::new(Decimal::from_str_exact("0.1").unwrap()),
            max_lots: 1_000,
        }
    }
}

/// Outcome of one auctioned lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotOutcome {
    /// Lot number, counted from 1
    pub lot: u64,
    pub token: TokenId,
    pub nominator: PlayerName,
    /// Winning player; `None` when every ceiling stayed below the tick
    pub winner: Option<PlayerName>,
    /// Price paid; zero for a passed lot
    pub hammer_price: Money,
    /// Sealed ceilings in seat order
    pub ceilings: Vec<(PlayerName, Money)>,
    /// Advisor events derived from the sale
    pub events: Vec<AdvisorEvent>,
}

/// Deterministic sequential auction over one shared session.
///
/// Seat order is fixed for the whole run: nomination rotates through it
/// and ceiling ties resolve toward the earliest seat, so a run is fully
/// reproducible for a fixed seat list and bidder seeds.
pub struct Auction {
    session: AuctionSession,
    config: AuctionConfig,
    clock: i64,
    pub outcomes: Vec<LotOutcome>,
}

impl Auction {
    /// Create an auction over a fresh session.
    pub fn new(catalog: Catalog, rules: GameRules, config: AuctionConfig) -> Self {
        Self::with_session(AuctionSession::new(catalog, rules), config)
    }

    /// Create an auction over an existing session, keeping any sales and
    /// players already recorded in it.
    pub fn with_session(session: AuctionSession, config: AuctionConfig) -> Self {
        Self {
            session,
            config,
            clock: 0,
            outcomes: Vec::new(),
        }
    }

    /// Register every seat's player with the rule-book starting budget.
    pub fn seat_all(&self, bidders: &[Box<dyn Bidder>]) -> Result<(), RosterError> {
        let budget = self.session.with_ledger(|ledger| ledger.rules().starting_budget);
        for bidder in bidders {
            self.session.register_player(bidder.player().clone(), budget)?;
        }
        Ok(())
    }

    /// Run a single lot.
    ///
    /// Returns `None` once the pool is exhausted or the rotating
    /// nominator has nothing to put up.
    ///
    /// # Panics
    /// Panics if `bidders` is empty or contains an unregistered seat.
    pub fn run_lot(&mut self, bidders: &mut [Box<dyn Bidder>]) -> Option<LotOutcome> {
        assert!(!bidders.is_empty(), "Auction needs at least one seat");

        let snapshot = self.session.snapshot();
        if snapshot.remaining_count() == 0 {
            return None;
        }
        for bidder in bidders.iter() {
            assert!(
                snapshot.player(bidder.player()).is_some(),
                "Every seat must be registered before the first lot"
            );
        }

        let lot = self.outcomes.len() as u64 + 1;
        let nominator_index = ((lot - 1) as usize) % bidders.len();
        let token = bidders[nominator_index].nominate(&snapshot)?;
        let nominator = bidders[nominator_index].player().clone();

        // Sealed bids: every ceiling reads the same pre-lot snapshot.
        let ceilings: Vec<(PlayerName, Money)> = bidders
            .iter_mut()
            .map(|bidder| {
                let ceiling = bidder.ceiling(&snapshot, token).max(Money::ZERO);
                (bidder.player().clone(), ceiling)
            })
            .collect();

        self.clock += 1;
        let outcome = self.settle(lot, token, nominator, ceilings);
        self.outcomes.push(outcome.clone());
        Some(outcome)
    }

    /// Run lots until the pool is exhausted, a full rotation passes with
    /// no sale, or the lot cap is reached. Returns the number of lots run.
    pub fn run(&mut self, bidders: &mut [Box<dyn Bidder>]) -> usize {
        let mut lots_run = 0;
        let mut consecutive_passes = 0;

        while lots_run < self.config.max_lots {
            let outcome = match self.run_lot(bidders) {
                Some(outcome) => outcome,
                None => break,
            };
            lots_run += 1;

            if outcome.winner.is_some() {
                consecutive_passes = 0;
            } else {
                consecutive_passes += 1;
                if consecutive_passes >= bidders.len() {
                    break;
                }
            }
        }

        lots_run
    }

    /// Award the lot and record the hammer.
    ///
    /// The winner pays one tick above the runner-up ceiling, never more
    /// than their own; an uncontested lot clears at the opening tick.
    /// Ties stay with the earliest seat. No ceiling at or above the tick
    /// means the lot passes unsold.
    fn settle(
        &self,
        lot: u64,
        token: TokenId,
        nominator: PlayerName,
        ceilings: Vec<(PlayerName, Money)>,
    ) -> LotOutcome {
        let mut winner_index = 0;
        for (i, (_, ceiling)) in ceilings.iter().enumerate() {
            if *ceiling > ceilings[winner_index].1 {
                winner_index = i;
            }
        }

        let best = ceilings[winner_index].1;
        if best < self.config.tick {
            return LotOutcome {
                lot,
                token,
                nominator,
                winner: None,
                hammer_price: Money::ZERO,
                ceilings,
                events: Vec::new(),
            };
        }

        let runner_up = ceilings
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != winner_index)
            .map(|(_, (_, ceiling))| *ceiling)
            .max()
            .unwrap_or(Money::ZERO);

        let winner = ceilings[winner_index].0.clone();
        let hammer = (runner_up + self.config.tick).min(best);

        // The nominated token came out of the pre-lot snapshot and the
        // seats were checked against the roster, so the transaction
        // cannot fail here.
        let (record, events) = self
            .session
            .record_sale(token, &winner, hammer, self.clock)
            .unwrap();

        LotOutcome {
            lot,
            token,
            nominator,
            winner: Some(record.buyer),
            hammer_price: record.price,
            ceilings,
            events,
        }
    }

    /// The session driving this auction.
    pub fn session(&self) -> &AuctionSession {
        &self.session
    }

    /// Lots that found a buyer.
    pub fn lots_sold(&self) -> usize {
        self.outcomes.iter().filter(|o| o.winner.is_some()).count()
    }

    /// Lots that passed unsold.
    pub fn lots_passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.winner.is_none()).count()
    }

    /// Total of all hammer prices.
    pub fn hammer_volume(&self) -> Money {
        self.outcomes.iter().map(|o| o.hammer_price).sum()
    }
}
