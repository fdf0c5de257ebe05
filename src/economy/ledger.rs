//! Single-pool player ledger.
//!
//! All player currency lives in one balance. The balance is mutated only
//! through [`Ledger::credit`], [`Ledger::debit`] and [`Ledger::reset`];
//! every mutation emits a [`GameEvent::BalanceChanged`] notification, and
//! income-tagged credits additionally emit [`GameEvent::IncomeGenerated`].

use crate::core::events::{GameEvent, SharedSink};
use crate::economy::Purse;
use crate::error::{EconomyError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why money moved. Attached to every credit and debit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashFlowTag {
    /// Per-tick restaurant earnings.
    RestaurantIncome,
    /// Per-tick passive income from player-owned lots.
    LotBonus,
    /// Proceeds from liquidating an investment position.
    InvestmentSale,
    /// Principal committed into a new investment position.
    InvestmentOpened,
    /// A city lot purchase.
    LotPurchase,
    /// A restaurant level upgrade.
    RestaurantUpgrade,
}

impl CashFlowTag {
    /// Tags that count as generated income for notification purposes.
    /// Sale proceeds are a liquidation, not income.
    pub fn is_income(self) -> bool {
        matches!(self, CashFlowTag::RestaurantIncome | CashFlowTag::LotBonus)
    }
}

impl fmt::Display for CashFlowTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CashFlowTag::RestaurantIncome => "restaurant income",
            CashFlowTag::LotBonus => "lot bonus",
            CashFlowTag::InvestmentSale => "investment sale",
            CashFlowTag::InvestmentOpened => "investment opened",
            CashFlowTag::LotPurchase => "lot purchase",
            CashFlowTag::RestaurantUpgrade => "restaurant upgrade",
        };
        f.write_str(name)
    }
}

/// The player's single currency pool.
pub struct Ledger {
    balance: Decimal,
    events: SharedSink,
}

impl Ledger {
    /// Creates a ledger holding the configured starting balance.
    /// No notification is emitted for the initial balance; `reset` is the
    /// operation that announces a fresh pool.
    pub fn new(starting_balance: Decimal, events: SharedSink) -> Self {
        Self {
            balance: starting_balance,
            events,
        }
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn can_afford(&self, amount: Decimal) -> bool {
        self.balance >= amount
    }

    /// Adds `amount` to the balance. Requires `amount > 0`.
    pub fn credit(&mut self, amount: Decimal, tag: CashFlowTag) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(EconomyError::InvalidAmount(amount));
        }
        self.balance += amount;
        log::debug!("ledger credit {amount} ({tag}), balance {}", self.balance);
        self.events.emit(GameEvent::BalanceChanged {
            new_balance: self.balance,
            delta: amount,
        });
        if tag.is_income() {
            self.events.emit(GameEvent::IncomeGenerated {
                amount,
                source: tag,
            });
        }
        Ok(())
    }

    /// Removes `amount` from the balance. All-or-nothing: an overdraft is
    /// rejected with `InsufficientFunds` and the balance is untouched.
    pub fn debit(&mut self, amount: Decimal, tag: CashFlowTag) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(EconomyError::InvalidAmount(amount));
        }
        if self.balance < amount {
            return Err(EconomyError::InsufficientFunds {
                needed: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        log::debug!("ledger debit {amount} ({tag}), balance {}", self.balance);
        self.events.emit(GameEvent::BalanceChanged {
            new_balance: self.balance,
            delta: -amount,
        });
        Ok(())
    }

    /// Reinitializes the pool for a new game. The notification carries a
    /// delta equal to the full new balance, as if credited from zero.
    pub fn reset(&mut self, starting_balance: Decimal) {
        self.balance = starting_balance;
        self.events.emit(GameEvent::BalanceChanged {
            new_balance: self.balance,
            delta: self.balance,
        });
    }
}

impl Purse for Ledger {
    fn available(&self) -> Decimal {
        self.balance
    }

    fn withdraw(&mut self, amount: Decimal, tag: CashFlowTag) -> Result<()> {
        self.debit(amount, tag)
    }
}
