//! The rival: an autonomous economic actor racing the player for lots.

pub mod logic;
pub mod types;

pub use logic::RivalAgent;
pub use types::{AggressionCurve, CurveKey, RivalConfig, RivalTreasury};
