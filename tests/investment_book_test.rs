//! Integration tests for the investment economy driven through a full
//! session: the compounding scenario from the game design, gain
//! accounting, and the summary split of realized vs unrealized gains.

use boomtown::investments::{InvestmentDefinition, RiskLevel};
use boomtown::{GameConfig, GameOutcome, GameSession, NoOpEventSink, RecordingEventSink};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

/// A fully deterministic 12%-annual, monthly-compounding product that
/// fires every 30 ticks.
fn steady_fund() -> InvestmentDefinition {
    InvestmentDefinition {
        id: String::new(),
        display_name: "Steady Fund".to_string(),
        risk_level: RiskLevel::Low,
        annual_return_rate: dec!(0.12),
        volatility_range: (1.0, 1.0),
        compounding_frequency_ticks: 30,
        compounds_per_year: 12,
        minimum_deposit: dec!(100),
    }
}

fn config_with_steady_fund() -> GameConfig {
    let mut config = GameConfig::default();
    config.investments = vec![steady_fund()];
    config
}

#[test]
fn test_design_scenario_one_percent_after_thirty_ticks() {
    // Starting balance 1000, principal 1000, rate 0.12/12 = 1% per event.
    let mut session =
        GameSession::new(config_with_steady_fund(), Arc::new(NoOpEventSink)).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let id = session.open_investment("steady-fund", dec!(1000)).unwrap();
    assert_eq!(session.ledger().balance(), Decimal::ZERO);

    for _ in 0..30 {
        session.tick(&mut rng).unwrap();
    }
    assert_eq!(session.book().position(id).unwrap().current_value, dec!(1010));
}

#[test]
fn test_sell_after_one_period_realizes_the_gain() {
    let mut session =
        GameSession::new(config_with_steady_fund(), Arc::new(NoOpEventSink)).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let id = session.open_investment("steady-fund", dec!(1000)).unwrap();
    for _ in 0..30 {
        session.tick(&mut rng).unwrap();
    }
    let balance_before = session.ledger().balance();

    let record = session.sell_investment(id).unwrap();
    assert_eq!(record.realized_gain, dec!(10));
    assert_eq!(record.proceeds, dec!(1010));
    assert_eq!(record.ticks_held, 30);
    assert_eq!(session.ledger().balance(), balance_before + dec!(1010));
    assert_eq!(session.book().realized_gain(), dec!(10));
}

#[test]
fn test_projection_matches_deterministic_reality() {
    let mut session =
        GameSession::new(config_with_steady_fund(), Arc::new(NoOpEventSink)).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let projected = session
        .projected_value("steady-fund", dec!(1000), 90)
        .unwrap();

    let id = session.open_investment("steady-fund", dec!(1000)).unwrap();
    for _ in 0..90 {
        session.tick(&mut rng).unwrap();
    }
    assert_eq!(session.book().position(id).unwrap().current_value, projected);
}

#[test]
fn test_summary_breaks_out_realized_and_unrealized_gains() {
    let mut config = config_with_steady_fund();
    config.starting_balance = dec!(100000);
    let sink = RecordingEventSink::new();
    let mut session = GameSession::new(config, Arc::new(sink.clone())).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let sold = session.open_investment("steady-fund", dec!(1000)).unwrap();
    let kept = session.open_investment("steady-fund", dec!(2000)).unwrap();
    for _ in 0..30 {
        session.tick(&mut rng).unwrap();
    }
    session.sell_investment(sold).unwrap();

    // End the game so the summary becomes available.
    let lot_ids: Vec<String> = session
        .market()
        .lots()
        .iter()
        .map(|l| l.lot_id.clone())
        .collect();
    for lot_id in &lot_ids {
        session.buy_lot(lot_id).unwrap();
    }
    assert_eq!(session.outcome(), Some(GameOutcome::Won));

    let summary = session.summary().unwrap();
    assert_eq!(summary.realized_gain, dec!(10));
    assert_eq!(summary.unrealized_gain, dec!(20));
    assert_eq!(summary.open_positions, 1);
    assert_eq!(summary.sale_history.len(), 1);
    assert_eq!(summary.sale_history[0].display_name, "Steady Fund");
    assert!(session.book().position(kept).is_some());
}

#[test]
fn test_summary_serializes_for_the_narrator() {
    let mut config = config_with_steady_fund();
    config.starting_balance = dec!(100000);
    let mut session = GameSession::new(config, Arc::new(NoOpEventSink)).unwrap();

    let lot_ids: Vec<String> = session
        .market()
        .lots()
        .iter()
        .map(|l| l.lot_id.clone())
        .collect();
    for lot_id in &lot_ids {
        session.buy_lot(lot_id).unwrap();
    }

    let summary = session.summary().unwrap();
    let json = serde_json::to_string(&summary).unwrap();
    assert!(json.contains("\"outcome\":\"won\""));
    assert!(json.contains("\"lot_ownership\""));
}
