//! The rival's time-pressured purchase scheduler.

use crate::core::constants::MIN_PURCHASE_INTERVAL_TICKS;
use crate::core::events::{GameEvent, SharedSink};
use crate::error::EconomyError;
use crate::market::{LotBuyer, LotMarket};
use crate::rival::types::{RivalConfig, RivalTreasury};
use rust_decimal::Decimal;

/// Autonomous actor that earns its own income each tick and periodically
/// tries to buy the cheapest unowned lot.
pub struct RivalAgent {
    config: RivalConfig,
    treasury: RivalTreasury,
    ticks_since_attempt: u32,
    events: SharedSink,
}

impl RivalAgent {
    pub fn new(config: RivalConfig, events: SharedSink) -> Self {
        let treasury = RivalTreasury::new(config.starting_money);
        Self {
            config,
            treasury,
            ticks_since_attempt: 0,
            events,
        }
    }

    pub fn balance(&self) -> Decimal {
        self.treasury.balance()
    }

    pub fn ticks_since_purchase_attempt(&self) -> u32 {
        self.ticks_since_attempt
    }

    /// The interval currently in force: the authored interval divided by
    /// the aggression multiplier at `progress`, floored so the rival can
    /// never machine-gun purchases.
    pub fn effective_interval(&self, progress: f64) -> u32 {
        let base = self.config.purchase_interval_ticks;
        let Some(curve) = &self.config.aggression else {
            return base;
        };
        let multiplier = curve.sample(progress);
        let scaled = (f64::from(base) / multiplier).round() as u32;
        scaled.max(MIN_PURCHASE_INTERVAL_TICKS)
    }

    /// One simulation tick: earn, count down, warn, and attempt when the
    /// interval has elapsed. An unaffordable round is not penalized; the
    /// rival just waits out the next full interval.
    pub fn tick(&mut self, market: &mut LotMarket) {
        self.treasury
            .deposit(self.config.income_per_tick + market.rival_income_bonus());
        self.ticks_since_attempt += 1;

        let interval = self.effective_interval(market.rival_progress());
        if self.ticks_since_attempt >= interval {
            self.ticks_since_attempt = 0;
            self.attempt_cheapest_purchase(market);
        } else {
            let remaining = interval - self.ticks_since_attempt;
            if remaining == self.config.warning_ticks {
                self.events.emit(GameEvent::RivalWarning {
                    ticks_remaining: remaining,
                });
            }
        }
    }

    /// Targets the lowest-cost unowned lot, tie-broken by lot id so the
    /// choice is deterministic, and buys it if the treasury clears the
    /// buffer-inclusive threshold.
    fn attempt_cheapest_purchase(&mut self, market: &mut LotMarket) {
        let target = market
            .unowned_lots()
            .min_by(|a, b| {
                a.base_cost
                    .cmp(&b.base_cost)
                    .then_with(|| a.lot_id.cmp(&b.lot_id))
            })
            .map(|lot| lot.lot_id.clone());
        let Some(lot_id) = target else {
            return;
        };

        match market.attempt_purchase(
            &lot_id,
            LotBuyer::Rival,
            &mut self.treasury,
            self.config.purchase_buffer,
        ) {
            Ok(()) => {}
            Err(EconomyError::InsufficientFunds { needed, available }) => {
                log::debug!("rival waits on '{lot_id}': has {available}, wants {needed}");
            }
            Err(err) => {
                log::warn!("rival purchase of '{lot_id}' rejected: {err}");
            }
        }
    }

    /// Back to the configured starting state for a new game.
    pub fn reset(&mut self) {
        self.treasury = RivalTreasury::new(self.config.starting_money);
        self.ticks_since_attempt = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::RecordingEventSink;
    use crate::market::{CityLotDefinition, GridPosition, LotOwner};
    use crate::rival::types::AggressionCurve;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn lot(name: &str, cost: Decimal) -> CityLotDefinition {
        CityLotDefinition {
            lot_id: String::new(),
            display_name: name.to_string(),
            base_cost: cost,
            income_bonus: dec!(2),
            grid_position: GridPosition::default(),
        }
    }

    fn config() -> RivalConfig {
        RivalConfig {
            starting_money: dec!(500),
            income_per_tick: dec!(8),
            purchase_interval_ticks: 60,
            warning_ticks: 10,
            purchase_buffer: dec!(100),
            aggression: None,
        }
    }

    fn setup(lots: Vec<CityLotDefinition>, config: RivalConfig) -> (RivalAgent, LotMarket, RecordingEventSink) {
        let sink = RecordingEventSink::new();
        let market = LotMarket::new(lots, Arc::new(sink.clone()));
        let rival = RivalAgent::new(config, Arc::new(sink.clone()));
        (rival, market, sink)
    }

    #[test]
    fn test_never_attempts_before_interval() {
        let (mut rival, mut market, _sink) = setup(vec![lot("Cheap", dec!(10))], config());
        for _ in 0..59 {
            rival.tick(&mut market);
            assert_eq!(market.owner_of("cheap"), Some(LotOwner::Unowned));
        }
        rival.tick(&mut market);
        assert_eq!(market.owner_of("cheap"), Some(LotOwner::Rival));
    }

    #[test]
    fn test_buffer_blocks_purchase_until_cleared() {
        // 500 + 8*60 = 980 < 1000 + 100 buffer: the first attempt waits.
        let (mut rival, mut market, _sink) = setup(vec![lot("Docks", dec!(1000))], config());
        for _ in 0..60 {
            rival.tick(&mut market);
        }
        assert_eq!(market.owner_of("docks"), Some(LotOwner::Unowned));
        assert_eq!(rival.balance(), dec!(980));

        // 500 + 8*120 = 1460 clears 1100 at the second attempt.
        for _ in 0..60 {
            rival.tick(&mut market);
        }
        assert_eq!(market.owner_of("docks"), Some(LotOwner::Rival));
        assert_eq!(rival.balance(), dec!(460));
    }

    #[test]
    fn test_warning_fires_exactly_warning_ticks_ahead() {
        let (mut rival, mut market, sink) = setup(vec![lot("Docks", dec!(100000))], config());
        for tick in 1..=60u32 {
            rival.tick(&mut market);
            let warnings = sink
                .events()
                .iter()
                .filter(|e| matches!(e, GameEvent::RivalWarning { .. }))
                .count();
            let expected = usize::from(tick >= 50);
            assert_eq!(warnings, expected, "at tick {tick}");
        }
        assert!(sink.events().contains(&GameEvent::RivalWarning {
            ticks_remaining: 10
        }));
    }

    #[test]
    fn test_targets_cheapest_lot_with_deterministic_tie_break() {
        let mut cfg = config();
        cfg.starting_money = dec!(10000);
        cfg.purchase_buffer = Decimal::ZERO;
        let (mut rival, mut market, _sink) = setup(
            vec![
                lot("Bravo", dec!(300)),
                lot("Alpha", dec!(300)),
                lot("Pricey", dec!(900)),
            ],
            cfg,
        );
        for _ in 0..60 {
            rival.tick(&mut market);
        }
        assert_eq!(market.owner_of("alpha"), Some(LotOwner::Rival));
        assert_eq!(market.owner_of("bravo"), Some(LotOwner::Unowned));
    }

    #[test]
    fn test_effective_interval_shrinks_with_aggression() {
        let mut cfg = config();
        cfg.aggression = Some(AggressionCurve::linear(1.0, 3.0));
        let (rival, _market, _sink) = setup(vec![lot("A", dec!(100))], cfg);

        let relaxed = rival.effective_interval(0.0);
        let pressed = rival.effective_interval(0.5);
        let frantic = rival.effective_interval(1.0);
        assert_eq!(relaxed, 60);
        assert_eq!(pressed, 30);
        assert_eq!(frantic, 20);
        assert!(relaxed > pressed && pressed > frantic);
    }

    #[test]
    fn test_effective_interval_honors_floor() {
        let mut cfg = config();
        cfg.purchase_interval_ticks = 12;
        cfg.aggression = Some(AggressionCurve::linear(10.0, 10.0));
        let (rival, _market, _sink) = setup(vec![lot("A", dec!(100))], cfg);
        assert_eq!(rival.effective_interval(0.0), MIN_PURCHASE_INTERVAL_TICKS);
    }

    #[test]
    fn test_no_curve_means_verbatim_interval() {
        let (rival, _market, _sink) = setup(vec![lot("A", dec!(100))], config());
        assert_eq!(rival.effective_interval(0.0), 60);
        assert_eq!(rival.effective_interval(1.0), 60);
    }

    #[test]
    fn test_lot_income_accelerates_rival() {
        let mut cfg = config();
        cfg.starting_money = dec!(1000);
        cfg.purchase_buffer = Decimal::ZERO;
        let (mut rival, mut market, _sink) =
            setup(vec![lot("A", dec!(500)), lot("B", dec!(100000))], cfg);
        for _ in 0..60 {
            rival.tick(&mut market);
        }
        assert_eq!(market.owner_of("a"), Some(LotOwner::Rival));

        // Owned lot now adds its bonus on top of base income.
        let before = rival.balance();
        rival.tick(&mut market);
        assert_eq!(rival.balance(), before + dec!(8) + dec!(2));
    }

    #[test]
    fn test_reset_restores_starting_state() {
        let (mut rival, mut market, _sink) = setup(vec![lot("A", dec!(10))], config());
        for _ in 0..70 {
            rival.tick(&mut market);
        }
        rival.reset();
        assert_eq!(rival.balance(), dec!(500));
        assert_eq!(rival.ticks_since_purchase_attempt(), 0);
    }
}
