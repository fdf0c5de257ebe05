//! The player's investment book: open positions, compounding, sales.

use crate::economy::{CashFlowTag, Ledger};
use crate::error::{EconomyError, Result};
use crate::investments::types::{InvestmentDefinition, Position, PositionId, SaleRecord};
use rand::Rng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

/// Tracks every open position against the authored catalog and keeps the
/// sell-history log for post-game reporting.
pub struct InvestmentBook {
    definitions: Vec<InvestmentDefinition>,
    positions: Vec<Position>,
    sales: Vec<SaleRecord>,
}

impl InvestmentBook {
    /// Builds a book over the authored catalog. Empty definition ids are
    /// resolved from the display name here, once, so runtime lookups are
    /// by stable id.
    pub fn new(definitions: Vec<InvestmentDefinition>) -> Self {
        let definitions = definitions
            .into_iter()
            .map(|mut def| {
                def.id = def.resolved_id();
                def
            })
            .collect();
        Self {
            definitions,
            positions: Vec::new(),
            sales: Vec::new(),
        }
    }

    pub fn definitions(&self) -> &[InvestmentDefinition] {
        &self.definitions
    }

    pub fn definition(&self, id: &str) -> Option<&InvestmentDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn position(&self, id: PositionId) -> Option<&Position> {
        self.positions.iter().find(|p| p.id == id)
    }

    pub fn sale_history(&self) -> &[SaleRecord] {
        &self.sales
    }

    /// Commits `amount` from the ledger into a new, independent position.
    pub fn open(
        &mut self,
        definition_id: &str,
        amount: Decimal,
        ledger: &mut Ledger,
    ) -> Result<PositionId> {
        let definition = self
            .definition(definition_id)
            .ok_or_else(|| EconomyError::UnknownDefinition(definition_id.to_string()))?;
        if amount <= Decimal::ZERO {
            return Err(EconomyError::InvalidAmount(amount));
        }
        if amount < definition.minimum_deposit {
            return Err(EconomyError::BelowMinimumDeposit {
                amount,
                minimum: definition.minimum_deposit,
            });
        }
        let definition_id = definition.id.clone();

        ledger.debit(amount, CashFlowTag::InvestmentOpened)?;
        let position = Position {
            id: PositionId::new_v4(),
            definition_id,
            principal: amount,
            current_value: amount,
            ticks_held: 0,
            ticks_since_last_compound: 0,
        };
        let id = position.id;
        log::info!("opened {amount} in '{}'", position.definition_id);
        self.positions.push(position);
        Ok(id)
    }

    /// Advances all positions by one tick.
    pub fn tick<R: Rng>(&mut self, rng: &mut R) {
        self.advance(1, rng);
    }

    /// Advances all positions by `ticks` at once (offline catch-up).
    /// Every elapsed compounding period gets exactly one event, in order.
    pub fn advance<R: Rng>(&mut self, ticks: u64, rng: &mut R) {
        for position in &mut self.positions {
            let Some(definition) = self
                .definitions
                .iter()
                .find(|d| d.id == position.definition_id)
            else {
                continue;
            };

            position.ticks_held += ticks;
            // Counter saturates rather than wrapping if a caller ever
            // passes an enormous catch-up window.
            let elapsed = u32::try_from(ticks).unwrap_or(u32::MAX);
            position.ticks_since_last_compound =
                position.ticks_since_last_compound.saturating_add(elapsed);

            while position.ticks_since_last_compound >= definition.compounding_frequency_ticks {
                position.ticks_since_last_compound -= definition.compounding_frequency_ticks;
                compound_once(position, definition, rng);
            }
        }
    }

    /// Liquidates a position: credits the ledger with its current value,
    /// records the sale, and removes the position.
    pub fn sell(&mut self, id: PositionId, ledger: &mut Ledger) -> Result<SaleRecord> {
        let index = self
            .positions
            .iter()
            .position(|p| p.id == id)
            .ok_or(EconomyError::PositionNotFound(id))?;

        let proceeds = self.positions[index].current_value;
        // A position compounded down to nothing sells for nothing; the
        // record still captures the realized loss.
        if proceeds > Decimal::ZERO {
            ledger.credit(proceeds, CashFlowTag::InvestmentSale)?;
        }

        let position = self.positions.remove(index);
        let display_name = self
            .definition(&position.definition_id)
            .map(|d| d.display_name.clone())
            .unwrap_or_else(|| position.definition_id.clone());
        let record = SaleRecord {
            definition_id: position.definition_id,
            display_name,
            principal: position.principal,
            proceeds,
            realized_gain: proceeds - position.principal,
            ticks_held: position.ticks_held,
        };
        log::info!(
            "sold '{}' for {proceeds} (gain {})",
            record.definition_id,
            record.realized_gain
        );
        self.sales.push(record.clone());
        Ok(record)
    }

    /// Paper gain across all open positions.
    pub fn unrealized_gain(&self) -> Decimal {
        self.positions.iter().map(|p| p.unrealized_gain()).sum()
    }

    /// Gain locked in by completed sales.
    pub fn realized_gain(&self) -> Decimal {
        self.sales.iter().map(|s| s.realized_gain).sum()
    }

    /// Drops all runtime state for a new game. The catalog is authored
    /// data and survives.
    pub fn reset(&mut self) {
        self.positions.clear();
        self.sales.clear();
    }
}

/// Applies one compounding event to a position.
fn compound_once<R: Rng>(position: &mut Position, definition: &InvestmentDefinition, rng: &mut R) {
    let rate = definition.rate_per_period();
    let volatility = definition.draw_volatility(rng);
    let volatility = Decimal::from_f64(volatility).unwrap_or(Decimal::ONE);
    let growth = Decimal::ONE + rate * volatility;

    position.current_value *= growth;
    if position.current_value < Decimal::ZERO {
        position.current_value = Decimal::ZERO;
    }
    log::debug!(
        "compounded '{}' x{growth}, value {}",
        position.definition_id,
        position.current_value
    );
}

/// Deterministic compound projection with volatility pinned to 1.
/// A UI estimate only; settlement always goes through [`InvestmentBook`].
pub fn projected_value(definition: &InvestmentDefinition, principal: Decimal, ticks: u64) -> Decimal {
    if definition.compounding_frequency_ticks == 0 {
        return principal;
    }
    let events = ticks / u64::from(definition.compounding_frequency_ticks);
    let growth = Decimal::ONE + definition.rate_per_period();
    let mut value = principal;
    for _ in 0..events {
        value *= growth;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::NoOpEventSink;
    use crate::investments::types::RiskLevel;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn steady_fund() -> InvestmentDefinition {
        InvestmentDefinition {
            id: String::new(),
            display_name: "Index Fund".to_string(),
            risk_level: RiskLevel::Medium,
            annual_return_rate: dec!(0.12),
            volatility_range: (1.0, 1.0),
            compounding_frequency_ticks: 30,
            compounds_per_year: 12,
            minimum_deposit: dec!(100),
        }
    }

    fn ledger(balance: Decimal) -> Ledger {
        Ledger::new(balance, Arc::new(NoOpEventSink))
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn test_open_requires_known_definition() {
        let mut book = InvestmentBook::new(vec![steady_fund()]);
        let mut ledger = ledger(dec!(1000));
        let err = book.open("moon-coin", dec!(500), &mut ledger).unwrap_err();
        assert!(matches!(err, EconomyError::UnknownDefinition(_)));
    }

    #[test]
    fn test_open_enforces_minimum_deposit() {
        let mut book = InvestmentBook::new(vec![steady_fund()]);
        let mut ledger = ledger(dec!(1000));
        let err = book.open("index-fund", dec!(50), &mut ledger).unwrap_err();
        assert_eq!(
            err,
            EconomyError::BelowMinimumDeposit {
                amount: dec!(50),
                minimum: dec!(100),
            }
        );
        assert_eq!(ledger.balance(), dec!(1000));
        assert!(book.positions().is_empty());
    }

    #[test]
    fn test_open_debits_principal() {
        let mut book = InvestmentBook::new(vec![steady_fund()]);
        let mut ledger = ledger(dec!(1000));
        let id = book.open("index-fund", dec!(400), &mut ledger).unwrap();

        assert_eq!(ledger.balance(), dec!(600));
        let position = book.position(id).unwrap();
        assert_eq!(position.principal, dec!(400));
        assert_eq!(position.current_value, dec!(400));
        assert_eq!(position.ticks_held, 0);
    }

    #[test]
    fn test_positions_in_same_definition_stay_independent() {
        let mut book = InvestmentBook::new(vec![steady_fund()]);
        let mut ledger = ledger(dec!(1000));
        let first = book.open("index-fund", dec!(300), &mut ledger).unwrap();
        let second = book.open("index-fund", dec!(200), &mut ledger).unwrap();

        assert_ne!(first, second);
        assert_eq!(book.positions().len(), 2);
        assert_eq!(book.position(first).unwrap().principal, dec!(300));
        assert_eq!(book.position(second).unwrap().principal, dec!(200));
    }

    #[test]
    fn test_compounding_scenario_one_period() {
        // 12% annual over 12 periods = 1% per event, every 30 ticks.
        let mut book = InvestmentBook::new(vec![steady_fund()]);
        let mut ledger = ledger(dec!(1000));
        let id = book.open("index-fund", dec!(1000), &mut ledger).unwrap();

        let mut rng = rng();
        for _ in 0..29 {
            book.tick(&mut rng);
        }
        assert_eq!(book.position(id).unwrap().current_value, dec!(1000));

        book.tick(&mut rng);
        assert_eq!(book.position(id).unwrap().current_value, dec!(1010));
    }

    #[test]
    fn test_compounding_is_monotonic_without_volatility() {
        let mut book = InvestmentBook::new(vec![steady_fund()]);
        let mut ledger = ledger(dec!(1000));
        let id = book.open("index-fund", dec!(1000), &mut ledger).unwrap();

        let mut rng = rng();
        let mut last = dec!(1000);
        for _ in 0..10 {
            book.advance(30, &mut rng);
            let value = book.position(id).unwrap().current_value;
            assert!(value > last, "each compounding event must grow the value");
            last = value;
        }
    }

    #[test]
    fn test_advance_catches_up_multiple_periods() {
        let mut book = InvestmentBook::new(vec![steady_fund()]);
        let mut ledger = ledger(dec!(1000));
        let id = book.open("index-fund", dec!(1000), &mut ledger).unwrap();

        let mut rng = rng();
        book.advance(90, &mut rng);

        let position = book.position(id).unwrap();
        assert_eq!(position.ticks_held, 90);
        assert_eq!(position.ticks_since_last_compound, 0);
        // Three 1% events: 1000 * 1.01^3
        assert_eq!(position.current_value, dec!(1030.301));
    }

    #[test]
    fn test_value_floors_at_zero() {
        let mut crash = steady_fund();
        crash.id = "crash".to_string();
        crash.annual_return_rate = dec!(0.5);
        crash.compounds_per_year = 1;
        // Multiplier of -3 turns a +50% period into -150%.
        crash.volatility_range = (-3.0, -3.0);
        crash.compounding_frequency_ticks = 1;

        let mut book = InvestmentBook::new(vec![crash]);
        let mut ledger = ledger(dec!(1000));
        let id = book.open("crash", dec!(500), &mut ledger).unwrap();

        let mut rng = rng();
        book.tick(&mut rng);
        assert_eq!(book.position(id).unwrap().current_value, Decimal::ZERO);
    }

    #[test]
    fn test_sell_immediately_realizes_zero_gain() {
        let mut book = InvestmentBook::new(vec![steady_fund()]);
        let mut ledger = ledger(dec!(1000));
        let id = book.open("index-fund", dec!(400), &mut ledger).unwrap();

        let record = book.sell(id, &mut ledger).unwrap();
        assert_eq!(record.realized_gain, Decimal::ZERO);
        assert_eq!(record.proceeds, dec!(400));
        assert_eq!(ledger.balance(), dec!(1000));
        assert!(book.positions().is_empty());
        assert_eq!(book.sale_history().len(), 1);
    }

    #[test]
    fn test_sell_unknown_position() {
        let mut book = InvestmentBook::new(vec![steady_fund()]);
        let mut ledger = ledger(dec!(1000));
        let ghost = PositionId::new_v4();
        assert_eq!(
            book.sell(ghost, &mut ledger).unwrap_err(),
            EconomyError::PositionNotFound(ghost)
        );
    }

    #[test]
    fn test_sell_twice_fails_second_time() {
        let mut book = InvestmentBook::new(vec![steady_fund()]);
        let mut ledger = ledger(dec!(1000));
        let id = book.open("index-fund", dec!(400), &mut ledger).unwrap();
        book.sell(id, &mut ledger).unwrap();
        assert!(matches!(
            book.sell(id, &mut ledger),
            Err(EconomyError::PositionNotFound(_))
        ));
    }

    #[test]
    fn test_gain_accounting_splits_realized_and_unrealized() {
        let mut book = InvestmentBook::new(vec![steady_fund()]);
        let mut ledger = ledger(dec!(2000));
        let kept = book.open("index-fund", dec!(1000), &mut ledger).unwrap();
        let sold = book.open("index-fund", dec!(1000), &mut ledger).unwrap();

        let mut rng = rng();
        book.advance(30, &mut rng);

        book.sell(sold, &mut ledger).unwrap();
        assert_eq!(book.realized_gain(), dec!(10));
        assert_eq!(book.unrealized_gain(), dec!(10));
        assert_eq!(book.position(kept).unwrap().current_value, dec!(1010));
    }

    #[test]
    fn test_projected_value_matches_deterministic_compounding() {
        let def = steady_fund();
        assert_eq!(projected_value(&def, dec!(1000), 29), dec!(1000));
        assert_eq!(projected_value(&def, dec!(1000), 30), dec!(1010));
        assert_eq!(projected_value(&def, dec!(1000), 90), dec!(1030.301));
    }

    #[test]
    fn test_seeded_volatility_is_reproducible() {
        let mut swingy = steady_fund();
        swingy.id = "swingy".to_string();
        swingy.volatility_range = (0.5, 1.5);

        let run = |seed: u64| {
            let mut book = InvestmentBook::new(vec![swingy.clone()]);
            let mut ledger = ledger(dec!(1000));
            let id = book.open("swingy", dec!(1000), &mut ledger).unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            book.advance(300, &mut rng);
            book.position(id).unwrap().current_value
        };

        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_reset_clears_positions_and_history() {
        let mut book = InvestmentBook::new(vec![steady_fund()]);
        let mut ledger = ledger(dec!(1000));
        let id = book.open("index-fund", dec!(400), &mut ledger).unwrap();
        book.sell(id, &mut ledger).unwrap();
        book.open("index-fund", dec!(100), &mut ledger).unwrap();

        book.reset();
        assert!(book.positions().is_empty());
        assert!(book.sale_history().is_empty());
        assert_eq!(book.definitions().len(), 1);
    }
}
