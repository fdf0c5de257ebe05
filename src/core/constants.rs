//! Engine-wide tuning constants.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// Investment catalog bounds
pub const MAX_ANNUAL_RETURN_RATE: Decimal = dec!(0.5);

// Rival scheduler
//
// The effective purchase interval never drops below this floor, no matter
// how aggressive the curve gets.
pub const MIN_PURCHASE_INTERVAL_TICKS: u32 = 5;

// Aggression curve sampling clamp. Multipliers below 1 slow the rival
// down, above 1 speed it up; authored curves are clamped into this band.
pub const AGGRESSION_MULTIPLIER_FLOOR: f64 = 0.1;
pub const AGGRESSION_MULTIPLIER_CEIL: f64 = 10.0;
