//! Auction event definitions
//!
//! Notable moments derived from a recorded sale: an overdrawn budget, a
//! completed collection, the special fur leaving the pool, a mandatory
//! background selling out. Derived from the ledger state after the sale
//! has been applied, for table commentary and simulation reports.

use serde::{Deserialize, Serialize};
use types::ids::{PlayerName, TokenId};
use types::item::{Background, Item};
use types::numeric::Money;
use types::rules::Requirement;
use uuid::Uuid;

use crate::ledger::{AuctionLedger, SaleRecord};

/// Event raised by a recorded sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorEvent {
    pub event_id: Uuid,
    pub kind: AdvisorEventKind,
    pub token: TokenId,
    pub buyer: PlayerName,
    pub timestamp: i64,
}

/// Event classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvisorEventKind {
    /// The sale pushed the buyer's budget below zero
    BudgetOverdrawn { budget_after: Money },
    /// The sale completed the buyer's collection
    CollectionCompleted,
    /// The sold item carries the special fur
    SpecialFurClaimed,
    /// The sale emptied a mandatory background from the pool
    LastOfBackground { background: Background },
}

impl AdvisorEvent {
    /// Create an event tied to the sale that raised it
    pub fn new(kind: AdvisorEventKind, record: &SaleRecord) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            kind,
            token: record.token,
            buyer: record.buyer.clone(),
            timestamp: record.timestamp,
        }
    }
}

/// Events raised by a sale, inspected against the ledger after the sale
/// was applied.
///
/// A record that no longer matches the ledger (unknown token or buyer)
/// raises nothing.
pub fn events_for_sale(ledger: &AuctionLedger, record: &SaleRecord) -> Vec<AdvisorEvent> {
    let mut events = Vec::new();

    let item = match ledger.item(record.token) {
        Ok(item) => item,
        Err(_) => return events,
    };

    if let Some(player) = ledger.player(&record.buyer) {
        if player.budget.is_negative() {
            events.push(AdvisorEvent::new(
                AdvisorEventKind::BudgetOverdrawn {
                    budget_after: player.budget,
                },
                record,
            ));
        }
    }

    if let Ok(need) = ledger.need_state(&record.buyer) {
        if need.is_complete() && finishing_piece(ledger, record, item) {
            events.push(AdvisorEvent::new(AdvisorEventKind::CollectionCompleted, record));
        }
    }

    if ledger.rules().is_special(item) {
        events.push(AdvisorEvent::new(AdvisorEventKind::SpecialFurClaimed, record));
    }

    if ledger.rules().is_mandatory(&item.background)
        && ledger.supply(&Requirement::Background(item.background.clone())) == 0
    {
        events.push(AdvisorEvent::new(
            AdvisorEventKind::LastOfBackground {
                background: item.background.clone(),
            },
            record,
        ));
    }

    events
}

/// True when the sold item covers a requirement none of the buyer's
/// other holdings cover, meaning this sale finished the collection
fn finishing_piece(ledger: &AuctionLedger, record: &SaleRecord, item: &Item) -> bool {
    let rules = ledger.rules();
    let player = match ledger.player(&record.buyer) {
        Some(player) => player,
        None => return false,
    };

    rules.requirements().any(|requirement| {
        if !rules.satisfies(item, &requirement) {
            return false;
        }
        let covered_elsewhere = player.holdings.iter().any(|token| {
            *token != record.token
                && ledger
                    .catalog()
                    .get(*token)
                    .map_or(false, |other| rules.satisfies(other, &requirement))
        });
        !covered_elsewhere
    })
}
