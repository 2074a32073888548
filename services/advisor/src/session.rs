//! Shared auction session
//!
//! Wraps the ledger in a mutex so concurrent callers (several seats
//! watching one live table) serialize sales, with the sold-set check and
//! the mutation under the same lock. Queries lock briefly and read a
//! consistent state; heavier read paths can take a `snapshot` and query
//! it lock-free, accepting a slightly stale view.

use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::sync::Mutex;
use types::catalog::Catalog;
use types::errors::{QueryError, RosterError, SaleError};
use types::ids::{PlayerName, TokenId};
use types::item::Background;
use types::numeric::{Money, Score};
use types::rules::GameRules;

use crate::engine::Advisor;
use crate::events::{self, AdvisorEvent};
use crate::ledger::{AuctionLedger, SaleRecord};
use crate::nomination::NominationAdvice;

/// One live auction: a locked ledger plus the advisor answering queries
/// over it
#[derive(Debug)]
pub struct AuctionSession {
    ledger: Mutex<AuctionLedger>,
    advisor: Advisor,
}

impl AuctionSession {
    /// Open a session over a loaded catalog with default advisor weights
    pub fn new(catalog: Catalog, rules: GameRules) -> Self {
        Self::with_advisor(catalog, rules, Advisor::new())
    }

    /// Open a session with custom advisor weights
    pub fn with_advisor(catalog: Catalog, rules: GameRules, advisor: Advisor) -> Self {
        Self {
            ledger: Mutex::new(AuctionLedger::new(catalog, rules)),
            advisor,
        }
    }

    pub fn advisor(&self) -> &Advisor {
        &self.advisor
    }

    // ── Mutations ────────────────────────────────────────────────────────

    pub fn register_player(&self, name: PlayerName, budget: Money) -> Result<(), RosterError> {
        self.ledger.lock().unwrap().register_player(name, budget)
    }

    /// Record a sale and derive its events in one atomic step.
    ///
    /// The already-sold check and the mutation run under the same lock,
    /// so two seats reporting the same hammer can never both succeed.
    pub fn record_sale(
        &self,
        token: TokenId,
        buyer: &PlayerName,
        price: Money,
        timestamp: i64,
    ) -> Result<(SaleRecord, Vec<AdvisorEvent>), SaleError> {
        let mut ledger = self.ledger.lock().unwrap();
        let record = ledger.record_sale(token, buyer, price, timestamp)?;
        let events = events::events_for_sale(&ledger, &record);
        Ok((record, events))
    }

    /// Reverse the most recent sale, if any
    pub fn undo_last_sale(&self) -> Option<SaleRecord> {
        self.ledger.lock().unwrap().undo_last_sale()
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub fn utility(&self, token: TokenId, player: &PlayerName) -> Result<Decimal, QueryError> {
        let ledger = self.ledger.lock().unwrap();
        self.advisor.utility(&ledger, token, player)
    }

    pub fn max_bid(&self, token: TokenId, player: &PlayerName) -> Result<Money, QueryError> {
        let ledger = self.ledger.lock().unwrap();
        self.advisor.max_bid(&ledger, token, player)
    }

    pub fn rank_nominations(
        &self,
        player: &PlayerName,
        top_n: usize,
    ) -> Result<Vec<NominationAdvice>, QueryError> {
        let ledger = self.ledger.lock().unwrap();
        self.advisor.rank_nominations(&ledger, player, top_n)
    }

    pub fn missing_backgrounds(
        &self,
        player: &PlayerName,
    ) -> Result<BTreeSet<Background>, QueryError> {
        let ledger = self.ledger.lock().unwrap();
        Ok(ledger.missing_backgrounds(player)?.clone())
    }

    pub fn has_special_fur(&self, player: &PlayerName) -> Result<bool, QueryError> {
        self.ledger.lock().unwrap().has_special_fur(player)
    }

    pub fn collection_score(&self, player: &PlayerName) -> Result<Score, QueryError> {
        self.ledger.lock().unwrap().collection_score(player)
    }

    /// Copy of the current ledger for lock-free reading
    pub fn snapshot(&self) -> AuctionLedger {
        self.ledger.lock().unwrap().clone()
    }

    /// Run a closure against the live ledger without cloning it
    pub fn with_ledger<R>(&self, f: impl FnOnce(&AuctionLedger) -> R) -> R {
        let ledger = self.ledger.lock().unwrap();
        f(&ledger)
    }
}
