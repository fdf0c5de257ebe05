//! Boomtown — economic simulation engine for an educational idle-tycoon
//! game.
//!
//! A player balances steady restaurant income against compounding
//! investments while a rival agent races to buy up a fixed set of city
//! lots. This crate is the headless core: the currency ledger, the
//! investment compounding/volatility model, the lot acquisition economy,
//! and the rival's purchase scheduler. Rendering, input, and the
//! narrator assistant live outside and consume [`core::events::GameEvent`]
//! notifications plus the post-game [`core::summary::GameSummary`].
//!
//! The simulation is single-threaded and cooperative: a
//! [`core::session::GameSession`] advances one discrete tick at a time,
//! invoking components in a fixed, deterministic order. All randomness is
//! injected as `&mut impl Rng`, so seeded runs reproduce exactly.

pub mod build_info;
pub mod core;
pub mod economy;
pub mod error;
pub mod investments;
pub mod market;
pub mod rival;
pub mod simulator;

pub use crate::core::config::{ConfigError, GameConfig};
pub use crate::core::events::{EventSink, GameEvent, NoOpEventSink, RecordingEventSink};
pub use crate::core::session::GameSession;
pub use crate::core::summary::GameSummary;
pub use crate::error::{EconomyError, Result};
pub use crate::market::GameOutcome;
