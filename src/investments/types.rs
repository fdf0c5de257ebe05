//! Authored investment definitions and runtime position state.

use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type PositionId = Uuid;

/// How swingy an instrument is. Purely descriptive; the actual spread
/// comes from the definition's volatility range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

fn default_volatility_range() -> (f64, f64) {
    (1.0, 1.0)
}

/// An authored, immutable investment product.
///
/// The two pacing knobs are independent: `compounding_frequency_ticks`
/// decides *when* a compounding event fires, `compounds_per_year` decides
/// *how large* each period's rate is
/// (`rate_per_period = annual_return_rate / compounds_per_year`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentDefinition {
    /// Stable identifier; derived from `display_name` when left empty.
    #[serde(default)]
    pub id: String,
    pub display_name: String,
    pub risk_level: RiskLevel,
    /// Expected annual return, in `[0, 0.5]`.
    pub annual_return_rate: Decimal,
    /// Multiplier range applied to each period's expected return.
    /// `(1.0, 1.0)` means fully deterministic.
    #[serde(default = "default_volatility_range")]
    pub volatility_range: (f64, f64),
    /// Ticks between compounding events.
    pub compounding_frequency_ticks: u32,
    /// Periods per year, used only to size each period's rate.
    pub compounds_per_year: u32,
    #[serde(default)]
    pub minimum_deposit: Decimal,
}

impl InvestmentDefinition {
    /// The id to look this definition up by, deriving one from the
    /// display name when the authored id is empty.
    pub fn resolved_id(&self) -> String {
        if self.id.is_empty() {
            crate::core::config::slugify(&self.display_name)
        } else {
            self.id.clone()
        }
    }

    /// Per-period rate: annual rate split across the year's periods.
    pub fn rate_per_period(&self) -> Decimal {
        if self.compounds_per_year == 0 {
            return Decimal::ZERO;
        }
        self.annual_return_rate / Decimal::from(self.compounds_per_year)
    }

    /// Draws one volatility multiplier. A degenerate range is exactly its
    /// single value and consumes no randomness, so deterministic configs
    /// stay deterministic.
    pub fn draw_volatility<R: Rng>(&self, rng: &mut R) -> f64 {
        let (min, max) = self.volatility_range;
        if (max - min).abs() < f64::EPSILON {
            min
        } else {
            rng.gen_range(min..=max)
        }
    }
}

/// An open investment held by the player. Each `open` call creates its
/// own position; positions in the same definition are never merged.
#[derive(Debug, Clone)]
pub struct Position {
    pub id: PositionId,
    pub definition_id: String,
    pub principal: Decimal,
    pub current_value: Decimal,
    pub ticks_held: u64,
    pub ticks_since_last_compound: u32,
}

impl Position {
    /// Paper profit or loss while the position is still open.
    pub fn unrealized_gain(&self) -> Decimal {
        self.current_value - self.principal
    }
}

/// One entry in the sell-history log, written when a position is
/// liquidated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub definition_id: String,
    pub display_name: String,
    pub principal: Decimal,
    pub proceeds: Decimal,
    pub realized_gain: Decimal,
    pub ticks_held: u64,
}
