//! Investment catalog, open positions, and compounding.

pub mod book;
pub mod types;

pub use book::{projected_value, InvestmentBook};
pub use types::{InvestmentDefinition, Position, PositionId, RiskLevel, SaleRecord};
