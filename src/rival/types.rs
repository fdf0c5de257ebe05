//! Authored rival configuration and its private treasury.

use crate::core::constants::{AGGRESSION_MULTIPLIER_CEIL, AGGRESSION_MULTIPLIER_FLOOR};
use crate::economy::{CashFlowTag, Purse};
use crate::error::{EconomyError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One authored point on the aggression curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    /// Game progress in `[0, 1]`.
    pub progress: f64,
    /// Purchase-frequency multiplier at that progress.
    pub multiplier: f64,
}

/// Piecewise-linear curve mapping game progress to a purchase-frequency
/// multiplier. Higher multipliers shorten the rival's effective interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggressionCurve {
    pub keys: Vec<CurveKey>,
}

impl AggressionCurve {
    /// Straight ramp from `start` at progress 0 to `end` at progress 1.
    pub fn linear(start: f64, end: f64) -> Self {
        Self {
            keys: vec![
                CurveKey {
                    progress: 0.0,
                    multiplier: start,
                },
                CurveKey {
                    progress: 1.0,
                    multiplier: end,
                },
            ],
        }
    }

    /// Samples the curve at `progress`, clamping progress into `[0, 1]`
    /// and the result into the engine's multiplier band. An empty curve
    /// samples as 1 (no scaling).
    pub fn sample(&self, progress: f64) -> f64 {
        let clamp = |m: f64| m.clamp(AGGRESSION_MULTIPLIER_FLOOR, AGGRESSION_MULTIPLIER_CEIL);

        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 1.0;
        };
        let progress = progress.clamp(0.0, 1.0);
        if progress <= first.progress {
            return clamp(first.multiplier);
        }
        if progress >= last.progress {
            return clamp(last.multiplier);
        }

        for window in self.keys.windows(2) {
            let (a, b) = (window[0], window[1]);
            if progress < a.progress || progress > b.progress {
                continue;
            }
            let span = b.progress - a.progress;
            if span <= f64::EPSILON {
                return clamp(b.multiplier);
            }
            let t = (progress - a.progress) / span;
            return clamp(a.multiplier + (b.multiplier - a.multiplier) * t);
        }
        clamp(last.multiplier)
    }
}

/// Authored rival economy and behavior parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RivalConfig {
    pub starting_money: Decimal,
    pub income_per_tick: Decimal,
    /// Baseline ticks between purchase attempts.
    pub purchase_interval_ticks: u32,
    /// How far ahead of each attempt the warning fires. Must stay below
    /// the interval.
    pub warning_ticks: u32,
    /// Headroom the rival keeps beyond a lot's price before committing.
    #[serde(default)]
    pub purchase_buffer: Decimal,
    /// Optional progress scaling; `None` means the configured interval
    /// applies verbatim.
    #[serde(default)]
    pub aggression: Option<AggressionCurve>,
}

/// The rival's own money pool. Deliberately not the player [`crate::economy::Ledger`]:
/// it emits no balance notifications and nothing else may spend from it.
#[derive(Debug, Clone, Default)]
pub struct RivalTreasury {
    balance: Decimal,
}

impl RivalTreasury {
    pub fn new(balance: Decimal) -> Self {
        Self { balance }
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Adds per-tick earnings. Non-positive amounts are ignored.
    pub fn deposit(&mut self, amount: Decimal) {
        if amount > Decimal::ZERO {
            self.balance += amount;
        }
    }
}

impl Purse for RivalTreasury {
    fn available(&self) -> Decimal {
        self.balance
    }

    fn withdraw(&mut self, amount: Decimal, tag: CashFlowTag) -> Result<()> {
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
        log::debug!("rival spent {amount} ({tag}), balance {}", self.balance);
        Ok(())
    }
}
