//! City-lot catalog, ownership tracking, and the win/lose authority.

pub mod logic;
pub mod types;

pub use logic::{GameOutcome, LotMarket};
pub use types::{CityLotDefinition, GridPosition, LotBuyer, LotOwner};
