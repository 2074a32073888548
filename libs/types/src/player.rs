//! Player state
//!
//! A player is one auction participant: a name, a remaining budget and the
//! set of tokens they have won so far. Which requirements those tokens
//! cover is derived state owned by the ledger, not stored here.

use crate::ids::{PlayerName, TokenId};
use crate::numeric::Money;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One auction participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: PlayerName,
    /// Remaining budget; goes negative when the player overdraws
    pub budget: Money,
    /// Tokens won so far, in token order
    pub holdings: BTreeSet<TokenId>,
}

impl Player {
    /// Create a new player with a starting budget and no holdings
    pub fn new(name: PlayerName, budget: Money) -> Self {
        Self {
            name,
            budget,
            holdings: BTreeSet::new(),
        }
    }

    /// True when the player owns the token
    pub fn owns(&self, token: TokenId) -> bool {
        self.holdings.contains(&token)
    }

    /// Deduct a purchase price from the budget
    ///
    /// The budget is allowed to go negative; overdraft is the caller's
    /// problem to report, not this type's to reject.
    ///
    /// # Panics
    /// Panics if the amount is negative
    pub fn debit(&mut self, amount: Money) {
        assert!(!amount.is_negative(), "Debit amount must be non-negative");
        self.budget -= amount;
    }

    /// Return a refunded price to the budget
    ///
    /// # Panics
    /// Panics if the amount is negative
    pub fn credit(&mut self, amount: Money) {
        assert!(!amount.is_negative(), "Credit amount must be non-negative");
        self.budget += amount;
    }

    /// Record a won token
    ///
    /// # Panics
    /// Panics if the player already owns the token
    pub fn add_token(&mut self, token: TokenId) {
        let inserted = self.holdings.insert(token);
        assert!(inserted, "Player already owns token");
    }

    /// Remove a token (used when a sale is undone)
    ///
    /// # Panics
    /// Panics if the player does not own the token
    pub fn remove_token(&mut self, token: TokenId) {
        let removed = self.holdings.remove(&token);
        assert!(removed, "Player does not own token");
    }
}
