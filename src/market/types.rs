//! Authored city-lot definitions and ownership types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who holds a lot. Once a lot leaves `Unowned` it never changes hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LotOwner {
    Unowned,
    Player,
    Rival,
}

impl fmt::Display for LotOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LotOwner::Unowned => "nobody",
            LotOwner::Player => "the player",
            LotOwner::Rival => "the rival",
        };
        f.write_str(name)
    }
}

/// An actor that can buy lots. Separate from [`LotOwner`] so "unowned"
/// can never be passed as a buyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LotBuyer {
    Player,
    Rival,
}

impl LotBuyer {
    pub fn owner(self) -> LotOwner {
        match self {
            LotBuyer::Player => LotOwner::Player,
            LotBuyer::Rival => LotOwner::Rival,
        }
    }
}

/// Board coordinates, consumed by placement tooling outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

/// An authored, immutable city lot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityLotDefinition {
    /// Stable identifier; derived from `display_name` when left empty.
    #[serde(default)]
    pub lot_id: String,
    pub display_name: String,
    pub base_cost: Decimal,
    /// Passive income per tick while owned.
    #[serde(default)]
    pub income_bonus: Decimal,
    #[serde(default)]
    pub grid_position: GridPosition,
}

impl CityLotDefinition {
    /// The id to look this lot up by, deriving one from the display name
    /// when the authored id is empty.
    pub fn resolved_id(&self) -> String {
        if self.lot_id.is_empty() {
            crate::core::config::slugify(&self.display_name)
        } else {
            self.lot_id.clone()
        }
    }
}
