//! Simulation configuration.

use crate::core::config::GameConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Scripted baseline strategy the simulated player follows.
///
/// Deliberately simple: the point is to exercise both sides of the lot
/// race under a plausible player, not to play optimally.
#[derive(Debug, Clone)]
pub struct PlayerPolicy {
    /// Open a position every this many ticks (0 = never invest).
    pub invest_every_ticks: u64,

    /// Fraction of spendable cash (balance minus reserve) per open.
    pub invest_fraction: f64,

    /// Definition id to invest in; `None` picks the first in the catalog.
    pub preferred_investment: Option<String>,

    /// Liquidate positions once they have been held this long.
    pub sell_after_ticks: u64,

    /// Cash floor the player never spends below.
    pub cash_reserve: Decimal,

    /// Whether the player buys the cheapest affordable lot when it can.
    pub buy_lots: bool,

    /// Whether the player buys restaurant upgrades when it can.
    pub upgrade_restaurant: bool,
}

impl Default for PlayerPolicy {
    fn default() -> Self {
        Self {
            invest_every_ticks: 40,
            invest_fraction: 0.5,
            preferred_investment: None,
            sell_after_ticks: 240,
            cash_reserve: dec!(200),
            buy_lots: true,
            upgrade_restaurant: true,
        }
    }
}

/// Configuration for a simulation batch.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of sessions to run.
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random). Run `i` uses
    /// `seed + i` so runs stay independent but the batch reproduces.
    pub seed: Option<u64>,

    /// Tick budget per run before it counts as a timeout.
    pub max_ticks_per_run: u64,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per-run lines).
    pub verbosity: u8,

    /// The authored game being simulated.
    pub game: GameConfig,

    /// The scripted player.
    pub policy: PlayerPolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 1000,
            seed: None,
            max_ticks_per_run: 20_000,
            verbosity: 1,
            game: GameConfig::default(),
            policy: PlayerPolicy::default(),
        }
    }
}
