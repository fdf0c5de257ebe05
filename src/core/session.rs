//! The game session: component wiring and tick orchestration.
//!
//! One [`GameSession`] owns every component plus the simulation clock (a
//! plain tick counter) and the event channel. All cross-component effects
//! happen here, at fixed points in the tick order, so no component ever
//! observes another mid-update.

use crate::core::config::{ConfigError, GameConfig};
use crate::core::events::{GameEvent, SharedSink};
use crate::core::summary::GameSummary;
use crate::economy::{IncomeSource, Ledger};
use crate::error::Result;
use crate::investments::{book, InvestmentBook, PositionId, SaleRecord};
use crate::market::{GameOutcome, LotBuyer, LotMarket};
use crate::rival::RivalAgent;
use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use std::sync::Arc;

/// A running game. Construct one per session; `reset` starts a fresh game
/// in place.
pub struct GameSession {
    config: GameConfig,
    events: SharedSink,
    tick_count: u64,
    ledger: Ledger,
    income: IncomeSource,
    book: InvestmentBook,
    market: LotMarket,
    rival: RivalAgent,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("tick_count", &self.tick_count)
            .finish_non_exhaustive()
    }
}

impl GameSession {
    /// Validates the authored config and wires every component onto the
    /// shared event channel.
    pub fn new(config: GameConfig, events: SharedSink) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let ledger = Ledger::new(config.starting_balance, Arc::clone(&events));
        let income = IncomeSource::new(config.income.clone());
        let book = InvestmentBook::new(config.investments.clone());
        let market = LotMarket::new(config.lots.clone(), Arc::clone(&events));
        let rival = RivalAgent::new(config.rival.clone(), Arc::clone(&events));
        Ok(Self {
            config,
            events,
            tick_count: 0,
            ledger,
            income,
            book,
            market,
            rival,
        })
    }

    /// Advances the simulation by exactly one tick, in the fixed order:
    /// income → investment compounding → rival → terminal check.
    ///
    /// Once the game is over, further calls are no-ops that return the
    /// settled outcome.
    pub fn tick<R: Rng>(&mut self, rng: &mut R) -> Result<Option<GameOutcome>> {
        if let Some(outcome) = self.market.outcome() {
            return Ok(Some(outcome));
        }

        self.tick_count += 1;
        self.events.emit(GameEvent::Tick {
            tick: self.tick_count,
        });

        self.income
            .tick(&mut self.ledger, self.market.player_income_bonus())?;
        self.book.tick(rng);
        self.rival.tick(&mut self.market);

        Ok(self.market.outcome())
    }

    // ── Player operations ───────────────────────────────────────

    /// Commits ledger money into a new investment position.
    pub fn open_investment(&mut self, definition_id: &str, amount: Decimal) -> Result<PositionId> {
        self.book.open(definition_id, amount, &mut self.ledger)
    }

    /// Liquidates a position back into the ledger.
    pub fn sell_investment(&mut self, id: PositionId) -> Result<SaleRecord> {
        self.book.sell(id, &mut self.ledger)
    }

    /// Buys the restaurant's next level.
    pub fn upgrade_restaurant(&mut self) -> Result<u32> {
        self.income.upgrade(&mut self.ledger)
    }

    /// Buys a lot for the player at its base cost.
    pub fn buy_lot(&mut self, lot_id: &str) -> Result<()> {
        self.market
            .attempt_purchase(lot_id, LotBuyer::Player, &mut self.ledger, Decimal::ZERO)
    }

    /// Deterministic what-if projection for the UI; never settles.
    pub fn projected_value(
        &self,
        definition_id: &str,
        principal: Decimal,
        ticks: u64,
    ) -> Result<Decimal> {
        let definition = self
            .book
            .definition(definition_id)
            .ok_or_else(|| crate::error::EconomyError::UnknownDefinition(definition_id.to_string()))?;
        Ok(book::projected_value(definition, principal, ticks))
    }

    // ── State access ────────────────────────────────────────────

    pub fn current_tick(&self) -> u64 {
        self.tick_count
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn income(&self) -> &IncomeSource {
        &self.income
    }

    pub fn book(&self) -> &InvestmentBook {
        &self.book
    }

    pub fn market(&self) -> &LotMarket {
        &self.market
    }

    pub fn rival(&self) -> &RivalAgent {
        &self.rival
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.market.outcome()
    }

    pub fn is_over(&self) -> bool {
        self.market.outcome().is_some()
    }

    /// Restores every component to its configured initial state. Safe at
    /// any tick boundary; there are no timers or partial transactions to
    /// orphan.
    pub fn reset(&mut self) {
        self.tick_count = 0;
        self.ledger.reset(self.config.starting_balance);
        self.income.reset();
        self.book.reset();
        self.market.reset();
        self.rival.reset();
        log::info!("session reset to starting state");
    }

    /// The post-terminal snapshot for the narrator. `None` while the game
    /// is still running.
    pub fn summary(&self) -> Option<GameSummary> {
        let outcome = self.market.outcome()?;
        Some(GameSummary {
            outcome,
            final_tick: self.tick_count,
            final_balance: self.ledger.balance(),
            restaurant_level: self.income.level(),
            realized_gain: self.book.realized_gain(),
            unrealized_gain: self.book.unrealized_gain(),
            open_positions: self.book.positions().len(),
            sale_history: self.book.sale_history().to_vec(),
            lot_ownership: self.market.ownership_map(),
            rival_balance: self.rival.balance(),
            generated_at: Utc::now(),
        })
    }
}
