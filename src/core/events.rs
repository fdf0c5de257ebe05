//! Typed game events and the injectable event channel.
//!
//! Every notification that crosses the simulation boundary is a
//! [`GameEvent`] emitted through an [`EventSink`]. Components hold a
//! shared handle to the session's sink rather than reaching for any
//! process-global dispatcher, so isolated construction in tests is
//! trivial: pass a [`RecordingEventSink`] and inspect what came out.

use crate::economy::CashFlowTag;
use crate::market::{GameOutcome, LotOwner};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Events emitted by the simulation, one variant per external topic.
///
/// Presentation layers map these to UI feedback; the narrator assistant
/// only ever sees the post-terminal [`crate::core::summary::GameSummary`],
/// never the live stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A simulation tick was processed.
    Tick { tick: u64 },

    /// The player ledger balance changed (credit, debit, or reset).
    BalanceChanged { new_balance: Decimal, delta: Decimal },

    /// Income was credited to the player ledger.
    IncomeGenerated { amount: Decimal, source: CashFlowTag },

    /// A lot was acquired by one of the actors.
    OwnershipChanged { lot_id: String, new_owner: LotOwner },

    /// The rival will attempt a purchase in `ticks_remaining` ticks.
    RivalWarning { ticks_remaining: u32 },

    /// The game reached its terminal state. Emitted at most once per game.
    GameOver { outcome: GameOutcome },
}

/// Receiver for simulation events.
///
/// `emit()` must be fast and non-blocking; failure to deliver an event
/// must never affect simulation state.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: GameEvent);
}

/// Sink that discards every event. Default for headless simulation runs.
#[derive(Clone, Default)]
pub struct NoOpEventSink;

impl EventSink for NoOpEventSink {
    fn emit(&self, _event: GameEvent) {}
}

/// Sink that collects every event, for tests and offline inspection.
#[derive(Clone, Default)]
pub struct RecordingEventSink {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all events recorded so far.
    pub fn events(&self) -> Vec<GameEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Discards everything recorded so far.
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: GameEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// Shared handle type the components hold.
pub type SharedSink = Arc<dyn EventSink>;
