//! Restaurant income source.
//!
//! The restaurant is the player's predictable baseline: every tick it
//! credits the ledger with a level-scaled amount, plus whatever passive
//! bonus the player's owned lots are generating. Levels advance through
//! an authored upgrade-cost table.

use crate::economy::{CashFlowTag, Ledger};
use crate::error::{EconomyError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Authored per-level income data.
///
/// `level_multipliers[0]` is level 1. `upgrade_costs[n]` is the price of
/// advancing from level `n + 1` to `n + 2`, so the table holds one entry
/// fewer than the multipliers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeTable {
    pub base_income_per_tick: Decimal,
    pub level_multipliers: Vec<Decimal>,
    pub upgrade_costs: Vec<Decimal>,
}

impl IncomeTable {
    pub fn max_level(&self) -> u32 {
        self.level_multipliers.len() as u32
    }
}

/// Tick-driven income generator with discrete upgrade levels.
pub struct IncomeSource {
    table: IncomeTable,
    level: u32,
}

impl IncomeSource {
    pub fn new(table: IncomeTable) -> Self {
        Self { table, level: 1 }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn max_level(&self) -> u32 {
        self.table.max_level()
    }

    /// Income per tick at `level`. Out-of-range levels clamp to the table
    /// boundaries rather than indexing blindly.
    pub fn income_for_level(&self, level: u32) -> Decimal {
        let index = level.clamp(1, self.max_level().max(1)) as usize - 1;
        let multiplier = self
            .table
            .level_multipliers
            .get(index)
            .copied()
            .unwrap_or(Decimal::ZERO);
        self.table.base_income_per_tick * multiplier
    }

    /// Income per tick at the current level.
    pub fn income_per_tick(&self) -> Decimal {
        self.income_for_level(self.level)
    }

    /// Cost to advance from `level` to `level + 1`, or `None` when the
    /// restaurant is at cap (or the table has no entry for that step).
    pub fn upgrade_cost(&self, level: u32) -> Option<Decimal> {
        if level == 0 || level >= self.max_level() {
            return None;
        }
        self.table.upgrade_costs.get(level as usize - 1).copied()
    }

    /// Advances one level, debiting the ledger for the authored cost.
    /// Fails with `AtMaxLevel` or `InsufficientFunds`; never leaves a
    /// partial state change.
    pub fn upgrade(&mut self, ledger: &mut Ledger) -> Result<u32> {
        let cost = self
            .upgrade_cost(self.level)
            .ok_or(EconomyError::AtMaxLevel(self.level))?;
        ledger.debit(cost, CashFlowTag::RestaurantUpgrade)?;
        self.level += 1;
        log::info!("restaurant upgraded to level {} for {cost}", self.level);
        Ok(self.level)
    }

    /// Credits one tick of restaurant income, plus the player's current
    /// lot bonus when there is one. The two credits carry distinct tags
    /// so lot payback stays visible downstream.
    pub fn tick(&mut self, ledger: &mut Ledger, lot_bonus: Decimal) -> Result<()> {
        let income = self.income_per_tick();
        if income > Decimal::ZERO {
            ledger.credit(income, CashFlowTag::RestaurantIncome)?;
        }
        if lot_bonus > Decimal::ZERO {
            ledger.credit(lot_bonus, CashFlowTag::LotBonus)?;
        }
        Ok(())
    }

    /// Back to level 1 for a new game.
    pub fn reset(&mut self) {
        self.level = 1;
    }
}
