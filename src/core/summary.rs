//! Read-only end-of-game snapshot for external consumers.

use crate::investments::SaleRecord;
use crate::market::{GameOutcome, LotOwner};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The only data that crosses the boundary to the narrator assistant.
/// Produced by [`crate::core::session::GameSession::summary`] strictly
/// after the terminal notification has fired.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSummary {
    pub outcome: GameOutcome,
    pub final_tick: u64,
    pub final_balance: Decimal,
    pub restaurant_level: u32,
    /// Gain locked in by completed sales.
    pub realized_gain: Decimal,
    /// Paper gain across positions still open at game end.
    pub unrealized_gain: Decimal,
    pub open_positions: usize,
    pub sale_history: Vec<SaleRecord>,
    pub lot_ownership: BTreeMap<String, LotOwner>,
    pub rival_balance: Decimal,
    pub generated_at: DateTime<Utc>,
}
