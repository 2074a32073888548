//! Ownership ledger
//!
//! The single mutable state of an auction session: who owns which tokens,
//! how much budget everyone has left, and which tokens are still in the
//! pool. All mutation goes through the `record_sale` transaction (and its
//! inverse `undo_last_sale`); every advisory computation reads a consistent
//! snapshot of this ledger.
//!
//! Per-background remaining pools and per-player need state are maintained
//! as indices, refreshed only inside the transactions, so scarcity and
//! valuation queries never rescan the full catalog.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};
use types::catalog::Catalog;
use types::errors::{QueryError, RosterError, SaleError};
use types::ids::{PlayerName, TokenId};
use types::item::{Background, Item};
use types::numeric::{Money, Score};
use types::player::Player;
use types::rules::{GameRules, Requirement};

/// One completed sale, as appended to the auction log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub token: TokenId,
    pub buyer: PlayerName,
    pub price: Money,
    pub timestamp: i64,
}

/// Derived collection progress for one player
///
/// Rebuilt only inside the ledger transactions. `best_owned` tracks the
/// highest owned score per background for every background the player
/// owns, mandatory or not; upgrade gains read from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeedState {
    missing_backgrounds: BTreeSet<Background>,
    has_special_fur: bool,
    best_owned: BTreeMap<Background, Score>,
}

impl NeedState {
    /// Need state of a player with no holdings
    fn new(rules: &GameRules) -> Self {
        Self {
            missing_backgrounds: rules.mandatory_backgrounds.iter().cloned().collect(),
            has_special_fur: false,
            best_owned: BTreeMap::new(),
        }
    }

    /// Rebuild from scratch over a player's holdings
    fn recompute(player: &Player, catalog: &Catalog, rules: &GameRules) -> Self {
        let mut state = Self::new(rules);
        for token in &player.holdings {
            if let Some(item) = catalog.get(*token) {
                state.absorb(item, rules);
            }
        }
        state
    }

    /// Fold one newly acquired item into the state
    fn absorb(&mut self, item: &Item, rules: &GameRules) {
        if rules.is_mandatory(&item.background) {
            self.missing_backgrounds.remove(&item.background);
        }
        if rules.is_special(item) {
            self.has_special_fur = true;
        }
        let best = self
            .best_owned
            .entry(item.background.clone())
            .or_insert(Score::ZERO);
        if item.score > *best {
            *best = item.score;
        }
    }

    /// Mandatory backgrounds with no owned item yet
    pub fn missing_backgrounds(&self) -> &BTreeSet<Background> {
        &self.missing_backgrounds
    }

    pub fn has_special_fur(&self) -> bool {
        self.has_special_fur
    }

    /// Highest owned score in the given background, zero if none owned
    pub fn best_owned_score(&self, background: &Background) -> Score {
        self.best_owned
            .get(background)
            .copied()
            .unwrap_or(Score::ZERO)
    }

    /// True when every requirement is met
    pub fn is_complete(&self) -> bool {
        self.missing_backgrounds.is_empty() && self.has_special_fur
    }

    /// True when the given requirement is still unmet
    pub fn needs(&self, requirement: &Requirement) -> bool {
        match requirement {
            Requirement::Background(bg) => self.missing_backgrounds.contains(bg),
            Requirement::SpecialFur => !self.has_special_fur,
        }
    }

    /// Unmet requirements in rule order
    pub fn unmet(&self, rules: &GameRules) -> Vec<Requirement> {
        rules.requirements().filter(|r| self.needs(r)).collect()
    }

    /// True when the item would fill at least one unmet requirement
    pub fn fills_unmet_need(&self, rules: &GameRules, item: &Item) -> bool {
        let fills_background = rules.is_mandatory(&item.background)
            && self.missing_backgrounds.contains(&item.background);
        let fills_fur = rules.is_special(item) && !self.has_special_fur;
        fills_background || fills_fur
    }
}

/// Auction session state: catalog, roster, sold set, sale log, indices
#[derive(Debug, Clone, PartialEq)]
pub struct AuctionLedger {
    catalog: Catalog,
    rules: GameRules,
    players: BTreeMap<PlayerName, Player>,
    needs: BTreeMap<PlayerName, NeedState>,
    sold: BTreeSet<TokenId>,
    sales: Vec<SaleRecord>,
    /// Remaining-pool token ids per background; empty entries are removed
    remaining_by_background: BTreeMap<Background, BTreeSet<TokenId>>,
    /// Remaining-pool token ids carrying the special fur
    remaining_special: BTreeSet<TokenId>,
}

impl AuctionLedger {
    /// Create a ledger over a loaded catalog with an empty roster
    pub fn new(catalog: Catalog, rules: GameRules) -> Self {
        let mut remaining_by_background: BTreeMap<Background, BTreeSet<TokenId>> = BTreeMap::new();
        let mut remaining_special = BTreeSet::new();

        for item in catalog.iter() {
            remaining_by_background
                .entry(item.background.clone())
                .or_default()
                .insert(item.token_id);
            if rules.is_special(item) {
                remaining_special.insert(item.token_id);
            }
        }

        Self {
            catalog,
            rules,
            players: BTreeMap::new(),
            needs: BTreeMap::new(),
            sold: BTreeSet::new(),
            sales: Vec::new(),
            remaining_by_background,
            remaining_special,
        }
    }

    // ── Roster ───────────────────────────────────────────────────────────

    /// Register a player with a starting budget
    pub fn register_player(&mut self, name: PlayerName, budget: Money) -> Result<(), RosterError> {
        if budget.is_negative() {
            return Err(RosterError::NegativeBudget {
                value: budget.as_decimal(),
            });
        }
        if self.players.contains_key(&name) {
            return Err(RosterError::DuplicatePlayer { name });
        }

        debug!(player = %name, budget = %budget, "Player registered");
        self.needs.insert(name.clone(), NeedState::new(&self.rules));
        self.players.insert(name.clone(), Player::new(name, budget));
        Ok(())
    }

    // ── Transactions ─────────────────────────────────────────────────────

    /// Record a completed sale.
    ///
    /// All precondition checks complete before the first mutation, so a
    /// rejected sale leaves the ledger untouched. On success the token is
    /// marked sold, added to the buyer's holdings, the price is debited,
    /// and the indices are refreshed, as one atomic step.
    ///
    /// The buyer's budget is allowed to go negative; the overdraft is
    /// logged and surfaced as an event rather than rejected.
    pub fn record_sale(
        &mut self,
        token: TokenId,
        buyer: &PlayerName,
        price: Money,
        timestamp: i64,
    ) -> Result<SaleRecord, SaleError> {
        let item = self
            .catalog
            .get(token)
            .ok_or(SaleError::UnknownToken { token })?;
        if self.sold.contains(&token) {
            return Err(SaleError::AlreadySold { token });
        }
        if price.is_negative() {
            return Err(SaleError::NegativePrice {
                value: price.as_decimal(),
            });
        }
        let player = self
            .players
            .get_mut(buyer)
            .ok_or_else(|| SaleError::UnknownPlayer {
                name: buyer.clone(),
            })?;

        player.add_token(token);
        player.debit(price);
        let budget_after = player.budget;

        self.sold.insert(token);

        let mut background_exhausted = false;
        if let Some(ids) = self.remaining_by_background.get_mut(&item.background) {
            ids.remove(&token);
            background_exhausted = ids.is_empty();
        }
        if background_exhausted {
            self.remaining_by_background.remove(&item.background);
        }
        if self.rules.is_special(item) {
            self.remaining_special.remove(&token);
        }

        if let Some(need) = self.needs.get_mut(buyer) {
            need.absorb(item, &self.rules);
        }

        let record = SaleRecord {
            token,
            buyer: buyer.clone(),
            price,
            timestamp,
        };
        self.sales.push(record.clone());

        debug!(
            token = %token,
            buyer = %buyer,
            price = %price,
            budget = %budget_after,
            "Sale recorded"
        );
        if budget_after.is_negative() {
            warn!(buyer = %buyer, budget = %budget_after, "Budget overdrawn");
        }

        Ok(record)
    }

    /// Reverse the most recent sale exactly.
    ///
    /// Returns the reversed record, or `None` when the sale log is empty.
    pub fn undo_last_sale(&mut self) -> Option<SaleRecord> {
        let record = self.sales.pop()?;

        if let Some(player) = self.players.get_mut(&record.buyer) {
            player.remove_token(record.token);
            player.credit(record.price);
        }
        self.sold.remove(&record.token);

        if let Some(item) = self.catalog.get(record.token) {
            self.remaining_by_background
                .entry(item.background.clone())
                .or_default()
                .insert(record.token);
            if self.rules.is_special(item) {
                self.remaining_special.insert(record.token);
            }
        }

        // The reversed item may or may not have been the best in its
        // background, so the buyer's need state is rebuilt from scratch.
        if let Some(player) = self.players.get(&record.buyer) {
            let need = NeedState::recompute(player, &self.catalog, &self.rules);
            self.needs.insert(record.buyer.clone(), need);
        }

        debug!(
            token = %record.token,
            buyer = %record.buyer,
            price = %record.price,
            "Sale reversed"
        );
        Some(record)
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn player(&self, name: &PlayerName) -> Option<&Player> {
        self.players.get(name)
    }

    /// Players in name order
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn need_state(&self, name: &PlayerName) -> Result<&NeedState, QueryError> {
        self.needs
            .get(name)
            .ok_or_else(|| QueryError::UnknownPlayer { name: name.clone() })
    }

    /// Need states of every player, in name order
    pub fn need_states(&self) -> impl Iterator<Item = (&PlayerName, &NeedState)> {
        self.needs.iter()
    }

    pub fn missing_backgrounds(
        &self,
        name: &PlayerName,
    ) -> Result<&BTreeSet<Background>, QueryError> {
        Ok(self.need_state(name)?.missing_backgrounds())
    }

    pub fn has_special_fur(&self, name: &PlayerName) -> Result<bool, QueryError> {
        Ok(self.need_state(name)?.has_special_fur())
    }

    /// Unmet requirements in rule order
    pub fn unmet_requirements(&self, name: &PlayerName) -> Result<Vec<Requirement>, QueryError> {
        Ok(self.need_state(name)?.unmet(&self.rules))
    }

    /// Projected final score: sum of the best owned score per mandatory
    /// background, gated to zero until the special fur is held
    pub fn collection_score(&self, name: &PlayerName) -> Result<Score, QueryError> {
        let need = self.need_state(name)?;
        if !need.has_special_fur() {
            return Ok(Score::ZERO);
        }
        let total = self
            .rules
            .mandatory_backgrounds
            .iter()
            .map(|bg| need.best_owned_score(bg).as_decimal())
            .sum();
        Ok(Score::new(total))
    }

    pub fn is_sold(&self, token: TokenId) -> bool {
        self.sold.contains(&token)
    }

    pub fn item(&self, token: TokenId) -> Result<&Item, QueryError> {
        self.catalog
            .get(token)
            .ok_or(QueryError::UnknownToken { token })
    }

    /// The append-only sale log, oldest first
    pub fn sales(&self) -> &[SaleRecord] {
        &self.sales
    }

    /// Catalog items not yet sold, in token order
    pub fn remaining_pool(&self) -> impl Iterator<Item = &Item> {
        self.catalog
            .iter()
            .filter(move |item| !self.sold.contains(&item.token_id))
    }

    pub fn remaining_count(&self) -> usize {
        self.catalog.len() - self.sold.len()
    }

    /// Remaining-pool items matching the requirement
    pub fn supply(&self, requirement: &Requirement) -> usize {
        match requirement {
            Requirement::Background(bg) => self
                .remaining_by_background
                .get(bg)
                .map_or(0, BTreeSet::len),
            Requirement::SpecialFur => self.remaining_special.len(),
        }
    }

    /// Players for whom the requirement is still unmet
    pub fn demand(&self, requirement: &Requirement) -> usize {
        self.needs
            .values()
            .filter(|need| need.needs(requirement))
            .count()
    }

    /// Highest-scoring remaining item matching the requirement.
    ///
    /// Ties resolve to the lowest token id for determinism.
    pub fn best_remaining(&self, requirement: &Requirement) -> Option<&Item> {
        let ids = match requirement {
            Requirement::Background(bg) => self.remaining_by_background.get(bg)?,
            Requirement::SpecialFur => &self.remaining_special,
        };

        let mut best: Option<&Item> = None;
        for token in ids {
            if let Some(item) = self.catalog.get(*token) {
                match best {
                    Some(current) if item.score <= current.score => {}
                    _ => best = Some(item),
                }
            }
        }
        best
    }

    /// The top-n remaining items by score, descending; ties resolve to the
    /// lowest token id
    pub fn top_remaining(&self, n: usize) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.remaining_pool().collect();
        items.sort_by(|a, b| b.score.cmp(&a.score).then(a.token_id.cmp(&b.token_id)));
        items.truncate(n);
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use types::catalog::ItemRecord;

    fn record(id: u64, background: &str, fur: &str, score: &str) -> ItemRecord {
        ItemRecord {
            id,
            background: background.to_string(),
            fur: fur.to_string(),
            total_score: Some(Decimal::from_str_exact(score).unwrap()),
            attribute_rarities: BTreeMap::new(),
        }
    }

    fn make_catalog() -> Catalog {
        Catalog::from_records(vec![
            record(1, "Blue", "Brown", "120"),
            record(2, "Blue", "Cream", "180"),
            record(3, "Aquamarine", "Brown", "90"),
            record(4, "Yellow", "Solid Gold", "310"),
            record(5, "Yellow", "Brown", "150"),
            record(6, "Purple", "Brown", "200"),
            record(7, "Aquamarine", "Cream", "90"),
        ])
        .unwrap()
    }

    fn make_ledger() -> AuctionLedger {
        let mut ledger = AuctionLedger::new(make_catalog(), GameRules::default());
        ledger
            .register_player(alice(), Money::from_units(50))
            .unwrap();
        ledger
            .register_player(bob(), Money::from_units(50))
            .unwrap();
        ledger
    }

    fn alice() -> PlayerName {
        PlayerName::new("alice")
    }

    fn bob() -> PlayerName {
        PlayerName::new("bob")
    }

    fn blue() -> Requirement {
        Requirement::Background(Background::new("Blue"))
    }

    fn aquamarine() -> Requirement {
        Requirement::Background(Background::new("Aquamarine"))
    }

    // ── Roster tests ──

    #[test]
    fn test_register_duplicate_player_rejected() {
        let mut ledger = make_ledger();
        let err = ledger
            .register_player(alice(), Money::from_units(50))
            .unwrap_err();
        assert_eq!(err, RosterError::DuplicatePlayer { name: alice() });
    }

    #[test]
    fn test_register_negative_budget_rejected() {
        let mut ledger = make_ledger();
        let err = ledger
            .register_player(PlayerName::new("carol"), Money::new(Decimal::from(-5)))
            .unwrap_err();
        assert!(matches!(err, RosterError::NegativeBudget { .. }));
    }

    // ── Sale transaction tests ──

    #[test]
    fn test_record_sale_updates_state() {
        let mut ledger = make_ledger();
        ledger
            .record_sale(TokenId::new(4), &alice(), Money::from_units(18), 1708123456789000000)
            .unwrap();

        let player = ledger.player(&alice()).unwrap();
        assert_eq!(player.budget, Money::from_units(32)); // 50 - 18
        assert!(player.owns(TokenId::new(4)));
        assert!(ledger.is_sold(TokenId::new(4)));

        // Token 4 is Yellow with the special fur
        let missing = ledger.missing_backgrounds(&alice()).unwrap();
        assert!(!missing.contains(&Background::new("Yellow")));
        assert!(missing.contains(&Background::new("Blue")));
        assert!(missing.contains(&Background::new("Aquamarine")));
        assert!(ledger.has_special_fur(&alice()).unwrap());
    }

    #[test]
    fn test_record_sale_unknown_token() {
        let mut ledger = make_ledger();
        let err = ledger
            .record_sale(TokenId::new(99), &alice(), Money::from_units(5), 1708123456789000000)
            .unwrap_err();
        assert_eq!(
            err,
            SaleError::UnknownToken {
                token: TokenId::new(99)
            }
        );
    }

    #[test]
    fn test_record_sale_unknown_player() {
        let mut ledger = make_ledger();
        let err = ledger
            .record_sale(
                TokenId::new(1),
                &PlayerName::new("mallory"),
                Money::from_units(5),
                1708123456789000000,
            )
            .unwrap_err();
        assert!(matches!(err, SaleError::UnknownPlayer { .. }));
    }

    #[test]
    fn test_record_sale_negative_price() {
        let mut ledger = make_ledger();
        let err = ledger
            .record_sale(
                TokenId::new(1),
                &alice(),
                Money::new(Decimal::from(-3)),
                1708123456789000000,
            )
            .unwrap_err();
        assert!(matches!(err, SaleError::NegativePrice { .. }));
        assert!(!ledger.is_sold(TokenId::new(1)));
    }

    #[test]
    fn test_double_sale_rejected_state_unchanged() {
        let mut ledger = make_ledger();
        ledger
            .record_sale(TokenId::new(1), &alice(), Money::from_units(10), 1708123456789000000)
            .unwrap();

        let snapshot = ledger.clone();
        let err = ledger
            .record_sale(TokenId::new(1), &bob(), Money::from_units(7), 1708123456790000000)
            .unwrap_err();

        assert_eq!(
            err,
            SaleError::AlreadySold {
                token: TokenId::new(1)
            }
        );
        assert_eq!(ledger, snapshot);
    }

    #[test]
    fn test_budget_decreases_by_exact_price() {
        let mut ledger = make_ledger();
        let before = ledger.player(&alice()).unwrap().budget;
        let price = Money::from_str("7.3").unwrap();
        ledger
            .record_sale(TokenId::new(2), &alice(), price, 1708123456789000000)
            .unwrap();
        let after = ledger.player(&alice()).unwrap().budget;
        assert_eq!(before - after, price);
    }

    #[test]
    fn test_overdraft_allowed() {
        let mut ledger = make_ledger();
        ledger
            .record_sale(TokenId::new(4), &alice(), Money::from_units(60), 1708123456789000000)
            .unwrap();
        let budget = ledger.player(&alice()).unwrap().budget;
        assert!(budget.is_negative());
        assert_eq!(budget, Money::new(Decimal::from(-10))); // 50 - 60
    }

    #[test]
    fn test_missing_backgrounds_idempotent() {
        let ledger = make_ledger();
        let first = ledger.missing_backgrounds(&alice()).unwrap().clone();
        let second = ledger.missing_backgrounds(&alice()).unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    // ── Index tests ──

    #[test]
    fn test_supply_tracks_pool() {
        let mut ledger = make_ledger();
        assert_eq!(ledger.supply(&blue()), 2); // tokens 1, 2
        assert_eq!(ledger.supply(&Requirement::SpecialFur), 1); // token 4

        ledger
            .record_sale(TokenId::new(1), &bob(), Money::from_units(5), 1708123456789000000)
            .unwrap();
        assert_eq!(ledger.supply(&blue()), 1);

        ledger
            .record_sale(TokenId::new(4), &bob(), Money::from_units(20), 1708123456790000000)
            .unwrap();
        assert_eq!(ledger.supply(&Requirement::SpecialFur), 0);
    }

    #[test]
    fn test_demand_counts_needing_players() {
        let mut ledger = make_ledger();
        assert_eq!(ledger.demand(&blue()), 2); // alice and bob both missing Blue

        ledger
            .record_sale(TokenId::new(1), &alice(), Money::from_units(5), 1708123456789000000)
            .unwrap();
        assert_eq!(ledger.demand(&blue()), 1); // only bob now
    }

    #[test]
    fn test_best_remaining_prefers_high_score_low_id() {
        let ledger = make_ledger();

        // Yellow: token 4 (310) beats token 5 (150)
        let best = ledger
            .best_remaining(&Requirement::Background(Background::new("Yellow")))
            .unwrap();
        assert_eq!(best.token_id, TokenId::new(4));

        // Aquamarine: tokens 3 and 7 tie at 90; lowest id wins
        let best = ledger.best_remaining(&aquamarine()).unwrap();
        assert_eq!(best.token_id, TokenId::new(3));
    }

    #[test]
    fn test_best_remaining_empty_requirement() {
        let mut ledger = make_ledger();
        ledger
            .record_sale(TokenId::new(4), &bob(), Money::from_units(20), 1708123456789000000)
            .unwrap();
        assert!(ledger.best_remaining(&Requirement::SpecialFur).is_none());
    }

    // ── Derived query tests ──

    #[test]
    fn test_unmet_requirements_in_rule_order() {
        let ledger = make_ledger();
        let unmet = ledger.unmet_requirements(&alice()).unwrap();
        assert_eq!(
            unmet,
            vec![
                Requirement::Background(Background::new("Blue")),
                Requirement::Background(Background::new("Aquamarine")),
                Requirement::Background(Background::new("Yellow")),
                Requirement::SpecialFur,
            ]
        );
    }

    #[test]
    fn test_collection_score_requires_special_fur() {
        let mut ledger = make_ledger();
        let ts = 1708123456789000000;
        ledger.record_sale(TokenId::new(1), &alice(), Money::from_units(5), ts).unwrap();
        ledger.record_sale(TokenId::new(3), &alice(), Money::from_units(5), ts).unwrap();
        ledger.record_sale(TokenId::new(5), &alice(), Money::from_units(5), ts).unwrap();

        // All three backgrounds covered but no special fur yet
        assert_eq!(ledger.collection_score(&alice()).unwrap(), Score::ZERO);

        ledger.record_sale(TokenId::new(4), &alice(), Money::from_units(20), ts).unwrap();
        // 120 (Blue) + 90 (Aquamarine) + max(150, 310) (Yellow) = 520
        assert_eq!(
            ledger.collection_score(&alice()).unwrap(),
            Score::new(Decimal::from(520))
        );
    }

    #[test]
    fn test_remaining_pool_excludes_sold() {
        let mut ledger = make_ledger();
        assert_eq!(ledger.remaining_count(), 7);

        ledger
            .record_sale(TokenId::new(6), &bob(), Money::from_units(9), 1708123456789000000)
            .unwrap();
        assert_eq!(ledger.remaining_count(), 6);
        assert!(ledger
            .remaining_pool()
            .all(|item| item.token_id != TokenId::new(6)));
    }

    #[test]
    fn test_top_remaining_sorted_by_score() {
        let ledger = make_ledger();
        let top: Vec<u64> = ledger
            .top_remaining(3)
            .iter()
            .map(|item| item.token_id.as_u64())
            .collect();
        // 310 (token 4), 200 (token 6), 180 (token 2)
        assert_eq!(top, vec![4, 6, 2]);
    }

    #[test]
    fn test_need_state_unknown_player() {
        let ledger = make_ledger();
        let err = ledger.need_state(&PlayerName::new("mallory")).unwrap_err();
        assert!(matches!(err, QueryError::UnknownPlayer { .. }));
    }

    // ── Undo tests ──

    #[test]
    fn test_undo_restores_state_exactly() {
        let mut ledger = make_ledger();
        ledger
            .record_sale(TokenId::new(2), &alice(), Money::from_units(12), 1708123456789000000)
            .unwrap();
        let snapshot = ledger.clone();

        ledger
            .record_sale(TokenId::new(4), &bob(), Money::from_units(25), 1708123456790000000)
            .unwrap();
        let reversed = ledger.undo_last_sale().unwrap();

        assert_eq!(reversed.token, TokenId::new(4));
        assert_eq!(reversed.buyer, bob());
        assert_eq!(ledger, snapshot);
    }

    #[test]
    fn test_undo_empty_log() {
        let mut ledger = make_ledger();
        assert!(ledger.undo_last_sale().is_none());
    }

    #[test]
    fn test_undo_recomputes_best_owned() {
        let mut ledger = make_ledger();
        let ts = 1708123456789000000;
        ledger.record_sale(TokenId::new(5), &alice(), Money::from_units(8), ts).unwrap();
        ledger.record_sale(TokenId::new(1), &alice(), Money::from_units(6), ts).unwrap();
        ledger.record_sale(TokenId::new(3), &alice(), Money::from_units(4), ts).unwrap();
        ledger.record_sale(TokenId::new(4), &alice(), Money::from_units(20), ts).unwrap();

        // Token 4 (Yellow, 310) upgraded over token 5 (Yellow, 150)
        // 120 + 90 + 310 = 520
        assert_eq!(
            ledger.collection_score(&alice()).unwrap(),
            Score::new(Decimal::from(520))
        );

        ledger.undo_last_sale().unwrap();

        // Best Yellow falls back to 150, and the special fur is gone,
        // which gates the whole score to zero
        assert_eq!(ledger.collection_score(&alice()).unwrap(), Score::ZERO);
        assert!(!ledger.has_special_fur(&alice()).unwrap());
        let need = ledger.need_state(&alice()).unwrap();
        assert_eq!(
            need.best_owned_score(&Background::new("Yellow")),
            Score::new(Decimal::from(150))
        );
    }

    #[test]
    fn test_undo_restores_supply() {
        let mut ledger = make_ledger();
        ledger
            .record_sale(TokenId::new(4), &bob(), Money::from_units(22), 1708123456789000000)
            .unwrap();
        assert_eq!(ledger.supply(&Requirement::SpecialFur), 0);

        ledger.undo_last_sale().unwrap();
        assert_eq!(ledger.supply(&Requirement::SpecialFur), 1);
    }
}
