//! Final standings report
//!
//! Summarizes one finished auction run: per-seat budget line, holdings,
//! completion state and collection score, plus run-level totals. Exports
//! as JSON for external consumption.

use crate::auction::LotOutcome;
use advisor::events::AdvisorEventKind;
use advisor::ledger::AuctionLedger;
use serde::{Deserialize, Serialize};
use types::numeric::{Money, Score};

/// Final line for one seat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStanding {
    pub player: String,
    pub budget_left: String,
    pub spent: String,
    pub tokens_won: Vec<u64>,
    pub missing_backgrounds: Vec<String>,
    pub has_special_fur: bool,
    pub complete: bool,
    pub collection_score: String,
}

/// Aggregated report over one auction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionReport {
    pub version: String,
    pub lots_run: usize,
    pub lots_sold: usize,
    pub lots_passed: usize,
    pub hammer_volume: String,
    pub overdrafts: usize,
    pub completions: usize,
    pub standings: Vec<PlayerStanding>,
}

/// Build the report from the final ledger and the lot outcomes.
///
/// Standings are ordered by collection score, best first, with ties
/// broken by player name.
pub fn analyze(ledger: &AuctionLedger, outcomes: &[LotOutcome]) -> AuctionReport {
    let lots_sold = outcomes.iter().filter(|o| o.winner.is_some()).count();
    let hammer_volume: Money = outcomes.iter().map(|o| o.hammer_price).sum();

    let all_events = outcomes.iter().flat_map(|o| o.events.iter());
    let mut overdrafts = 0;
    let mut completions = 0;
    for event in all_events {
        match event.kind {
            AdvisorEventKind::BudgetOverdrawn { .. } => overdrafts += 1,
            AdvisorEventKind::CollectionCompleted => completions += 1,
            _ => {}
        }
    }

    let mut ranked: Vec<(Score, PlayerStanding)> = ledger
        .players()
        .map(|player| {
            let name = &player.name;
            let spent: Money = ledger
                .sales()
                .iter()
                .filter(|sale| sale.buyer == *name)
                .map(|sale| sale.price)
                .sum();

            let (missing, has_fur, complete) = match ledger.need_state(name) {
                Ok(need) => (
                    need.missing_backgrounds()
                        .iter()
                        .map(|bg| bg.as_str().to_string())
                        .collect(),
                    need.has_special_fur(),
                    need.is_complete(),
                ),
                Err(_) => (Vec::new(), false, false),
            };
            let score = ledger.collection_score(name).unwrap_or(Score::ZERO);

            let standing = PlayerStanding {
                player: name.as_str().to_string(),
                budget_left: player.budget.to_string(),
                spent: spent.to_string(),
                tokens_won: player.holdings.iter().map(|t| t.as_u64()).collect(),
                missing_backgrounds: missing,
                has_special_fur: has_fur,
                complete,
                collection_score: score.as_decimal().to_string(),
            };
            (score, standing)
        })
        .collect();

    ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.player.cmp(&b.1.player)));

    AuctionReport {
        version: crate::VERSION.to_string(),
        lots_run: outcomes.len(),
        lots_sold,
        lots_passed: outcomes.len() - lots_sold,
        hammer_volume: hammer_volume.to_string(),
        overdrafts,
        completions,
        standings: ranked.into_iter().map(|(_, standing)| standing).collect(),
    }
}

/// Export the report as JSON.
pub fn export_json(report: &AuctionReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_default()
}

/// Write the report to a file path.
pub fn write_to_file(report: &AuctionReport, path: &str) -> std::io::Result<()> {
    std::fs::write(path, export_json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor::events::events_for_sale;
    use rust_decimal::Decimal;
    use std::collections::BTreeMap;
    use types::catalog::{Catalog, ItemRecord};
    use types::ids::{PlayerName, TokenId};
    use types::rules::GameRules;

    fn record(id: u64, background: &str, fur: &str, score: u64) -> ItemRecord {
        ItemRecord {
            id,
            background: background.to_string(),
            fur: fur.to_string(),
            total_score: Some(Decimal::from(score)),
            attribute_rarities: BTreeMap::new(),
        }
    }

    fn full_catalog() -> Catalog {
        Catalog::from_records(vec![
            record(1, "Blue", "Brown", 100),
            record(2, "Aquamarine", "Brown", 80),
            record(3, "Yellow", "Brown", 90),
            record(4, "Purple", "Solid Gold", 250),
        ])
        .unwrap()
    }

    fn sold_outcome(
        ledger: &mut AuctionLedger,
        lot: u64,
        token: u64,
        buyer: &PlayerName,
        price: Money,
    ) -> LotOutcome {
        let record = ledger
            .record_sale(TokenId::new(token), buyer, price, lot as i64)
            .unwrap();
        let events = events_for_sale(ledger, &record);
        LotOutcome {
            lot,
            token: TokenId::new(token),
            nominator: buyer.clone(),
            winner: Some(buyer.clone()),
            hammer_price: price,
            ceilings: vec![(buyer.clone(), price)],
            events,
        }
    }

    fn passed_outcome(lot: u64, token: u64, nominator: &PlayerName) -> LotOutcome {
        LotOutcome {
            lot,
            token: TokenId::new(token),
            nominator: nominator.clone(),
            winner: None,
            hammer_price: Money::ZERO,
            ceilings: vec![(nominator.clone(), Money::ZERO)],
            events: Vec::new(),
        }
    }

    #[test]
    fn test_report_totals() {
        let mut ledger = AuctionLedger::new(full_catalog(), GameRules::default());
        let ada = PlayerName::new("ada");
        ledger.register_player(ada.clone(), Money::from_units(50)).unwrap();

        let outcomes = vec![
            sold_outcome(&mut ledger, 1, 1, &ada, Money::from_units(5)),
            passed_outcome(2, 2, &ada),
        ];

        let report = analyze(&ledger, &outcomes);
        assert_eq!(report.version, crate::VERSION);
        assert_eq!(report.lots_run, 2);
        assert_eq!(report.lots_sold, 1);
        assert_eq!(report.lots_passed, 1);
        assert_eq!(report.hammer_volume, "5");
        assert_eq!(report.overdrafts, 0);
        assert_eq!(report.completions, 0);
    }

    #[test]
    fn test_standing_line_for_one_buyer() {
        let mut ledger = AuctionLedger::new(full_catalog(), GameRules::default());
        let ada = PlayerName::new("ada");
        ledger.register_player(ada.clone(), Money::from_units(50)).unwrap();

        let outcomes = vec![sold_outcome(&mut ledger, 1, 1, &ada, Money::from_units(5))];
        let report = analyze(&ledger, &outcomes);

        let line = &report.standings[0];
        assert_eq!(line.player, "ada");
        assert_eq!(line.budget_left, "45"); // 50 - 5
        assert_eq!(line.spent, "5");
        assert_eq!(line.tokens_won, vec![1]);
        assert_eq!(line.missing_backgrounds, vec!["Aquamarine", "Yellow"]);
        assert!(!line.has_special_fur);
        assert!(!line.complete);
        assert_eq!(line.collection_score, "0"); // no special fur, score gated
    }

    #[test]
    fn test_completion_counted_and_scored() {
        let mut ledger = AuctionLedger::new(full_catalog(), GameRules::default());
        let ada = PlayerName::new("ada");
        let bob = PlayerName::new("bob");
        ledger.register_player(ada.clone(), Money::from_units(50)).unwrap();
        ledger.register_player(bob.clone(), Money::from_units(50)).unwrap();

        let outcomes = vec![
            sold_outcome(&mut ledger, 1, 1, &ada, Money::from_units(5)),
            sold_outcome(&mut ledger, 2, 2, &ada, Money::from_units(5)),
            sold_outcome(&mut ledger, 3, 3, &ada, Money::from_units(5)),
            sold_outcome(&mut ledger, 4, 4, &ada, Money::from_units(5)),
        ];

        let report = analyze(&ledger, &outcomes);
        assert_eq!(report.completions, 1);

        // 100 + 80 + 90 across the mandatory backgrounds; ada ranks first
        let line = &report.standings[0];
        assert_eq!(line.player, "ada");
        assert!(line.complete);
        assert_eq!(line.collection_score, "270");

        let other = &report.standings[1];
        assert_eq!(other.player, "bob");
        assert_eq!(other.collection_score, "0");
        assert_eq!(other.spent, "0");
    }

    #[test]
    fn test_overdraft_counted() {
        let mut ledger = AuctionLedger::new(full_catalog(), GameRules::default());
        let ada = PlayerName::new("ada");
        ledger.register_player(ada.clone(), Money::from_units(10)).unwrap();

        let outcomes = vec![sold_outcome(&mut ledger, 1, 4, &ada, Money::from_units(12))];
        let report = analyze(&ledger, &outcomes);

        assert_eq!(report.overdrafts, 1);
        assert_eq!(report.standings[0].budget_left, "-2"); // 10 - 12
    }

    #[test]
    fn test_export_json_roundtrip() {
        let ledger = AuctionLedger::new(full_catalog(), GameRules::default());
        let report = analyze(&ledger, &[]);

        let json = export_json(&report);
        let parsed: AuctionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.version, crate::VERSION);
        assert_eq!(parsed.lots_run, 0);
        assert!(parsed.standings.is_empty());
    }

    #[test]
    fn test_empty_run() {
        let ledger = AuctionLedger::new(full_catalog(), GameRules::default());
        let report = analyze(&ledger, &[]);

        assert!(report.standings.is_empty());
        assert_eq!(report.lots_run, 0);
        assert_eq!(report.hammer_volume, "0");
    }
}
