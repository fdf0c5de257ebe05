//! Recoverable error taxonomy for the simulation core.
//!
//! Every variant here is an *expected* condition reported back to the
//! caller; none of them crash the simulation, and every failing operation
//! leaves state untouched. Malformed authored data is a separate concern
//! handled at load time by [`crate::core::config::ConfigError`].

use crate::investments::PositionId;
use crate::market::LotOwner;
use rust_decimal::Decimal;
use thiserror::Error;

/// Type alias for Result using the simulation error type.
pub type Result<T> = std::result::Result<T, EconomyError>;

/// Expected, recoverable failures of player and rival operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EconomyError {
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Decimal, available: Decimal },

    #[error("amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    #[error("restaurant is already at max level {0}")]
    AtMaxLevel(u32),

    #[error("lot '{lot_id}' is already owned by {owner}")]
    LotAlreadyOwned { lot_id: String, owner: LotOwner },

    #[error("no open position with id {0}")]
    PositionNotFound(PositionId),

    #[error("deposit {amount} is below the minimum {minimum}")]
    BelowMinimumDeposit { amount: Decimal, minimum: Decimal },

    #[error("unknown investment definition '{0}'")]
    UnknownDefinition(String),

    #[error("unknown lot '{0}'")]
    UnknownLot(String),
}
