//! Lot acquisition and the terminal-state check.

use crate::core::events::{GameEvent, SharedSink};
use crate::economy::{CashFlowTag, Purse};
use crate::error::{EconomyError, Result};
use crate::market::types::{CityLotDefinition, LotBuyer, LotOwner};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a game ends. Declared only by [`LotMarket::check_win_lose`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    /// Player owns every lot.
    Won,
    /// Rival owns every lot.
    Lost,
}

/// Catalog of purchasable lots plus their runtime ownership.
///
/// This is the sole authority over the terminal state: no other component
/// may declare the game over.
pub struct LotMarket {
    lots: Vec<CityLotDefinition>,
    ownership: Vec<LotOwner>,
    outcome: Option<GameOutcome>,
    events: SharedSink,
}

impl LotMarket {
    /// Builds a market over the authored catalog, everything unowned.
    /// Empty lot ids are resolved from display names here, once.
    pub fn new(lots: Vec<CityLotDefinition>, events: SharedSink) -> Self {
        let lots: Vec<CityLotDefinition> = lots
            .into_iter()
            .map(|mut lot| {
                lot.lot_id = lot.resolved_id();
                lot
            })
            .collect();
        let ownership = vec![LotOwner::Unowned; lots.len()];
        Self {
            lots,
            ownership,
            outcome: None,
            events,
        }
    }

    pub fn lots(&self) -> &[CityLotDefinition] {
        &self.lots
    }

    pub fn total_lots(&self) -> usize {
        self.lots.len()
    }

    pub fn owner_of(&self, lot_id: &str) -> Option<LotOwner> {
        self.index_of(lot_id).map(|i| self.ownership[i])
    }

    /// Lots nobody has bought yet, in authored order.
    pub fn unowned_lots(&self) -> impl Iterator<Item = &CityLotDefinition> {
        self.lots
            .iter()
            .zip(&self.ownership)
            .filter(|(_, owner)| **owner == LotOwner::Unowned)
            .map(|(lot, _)| lot)
    }

    fn index_of(&self, lot_id: &str) -> Option<usize> {
        self.lots.iter().position(|l| l.lot_id == lot_id)
    }

    /// Attempts to buy a lot for `buyer`, funding the purchase from
    /// `purse`. `reserve` is extra headroom the buyer must hold beyond
    /// the price (the rival's purchase buffer; zero for the player) —
    /// only the price itself is withdrawn.
    ///
    /// All-or-nothing: a settled lot fails with `LotAlreadyOwned`, short
    /// funds fail with `InsufficientFunds`, and neither changes state.
    pub fn attempt_purchase(
        &mut self,
        lot_id: &str,
        buyer: LotBuyer,
        purse: &mut dyn Purse,
        reserve: Decimal,
    ) -> Result<()> {
        let index = self
            .index_of(lot_id)
            .ok_or_else(|| EconomyError::UnknownLot(lot_id.to_string()))?;
        let owner = self.ownership[index];
        if owner != LotOwner::Unowned {
            return Err(EconomyError::LotAlreadyOwned {
                lot_id: lot_id.to_string(),
                owner,
            });
        }

        let cost = self.lots[index].base_cost;
        let required = cost + reserve;
        if purse.available() < required {
            return Err(EconomyError::InsufficientFunds {
                needed: required,
                available: purse.available(),
            });
        }

        // A zero-cost lot settles without touching the purse.
        if cost > Decimal::ZERO {
            purse.withdraw(cost, CashFlowTag::LotPurchase)?;
        }
        let new_owner = buyer.owner();
        self.ownership[index] = new_owner;
        log::info!("lot '{lot_id}' bought by {new_owner} for {cost}");
        self.events.emit(GameEvent::OwnershipChanged {
            lot_id: lot_id.to_string(),
            new_owner,
        });

        self.check_win_lose();
        Ok(())
    }

    /// Terminal-state check, run after every ownership change. Emits
    /// `GameOver` at most once per game and is idempotent afterwards.
    pub fn check_win_lose(&mut self) -> Option<GameOutcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }
        let outcome = if self.ownership.iter().all(|o| *o == LotOwner::Player) {
            Some(GameOutcome::Won)
        } else if self.ownership.iter().all(|o| *o == LotOwner::Rival) {
            Some(GameOutcome::Lost)
        } else {
            None
        };
        if let Some(outcome) = outcome {
            self.outcome = Some(outcome);
            log::info!("game over: {outcome:?}");
            self.events.emit(GameEvent::GameOver { outcome });
        }
        self.outcome
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Per-tick passive income the player's lots generate.
    pub fn player_income_bonus(&self) -> Decimal {
        self.income_bonus_for(LotOwner::Player)
    }

    /// Per-tick passive income the rival's lots generate.
    pub fn rival_income_bonus(&self) -> Decimal {
        self.income_bonus_for(LotOwner::Rival)
    }

    fn income_bonus_for(&self, owner: LotOwner) -> Decimal {
        self.lots
            .iter()
            .zip(&self.ownership)
            .filter(|(_, o)| **o == owner)
            .map(|(lot, _)| lot.income_bonus)
            .sum()
    }

    /// Rival's share of the board, the progress metric fed to the
    /// aggression curve.
    pub fn rival_progress(&self) -> f64 {
        if self.lots.is_empty() {
            return 0.0;
        }
        let rival = self
            .ownership
            .iter()
            .filter(|o| **o == LotOwner::Rival)
            .count();
        rival as f64 / self.lots.len() as f64
    }

    /// Full ownership map, ordered by lot id, for the game summary.
    pub fn ownership_map(&self) -> BTreeMap<String, LotOwner> {
        self.lots
            .iter()
            .zip(&self.ownership)
            .map(|(lot, owner)| (lot.lot_id.clone(), *owner))
            .collect()
    }

    /// Everything back to unowned for a new game.
    pub fn reset(&mut self) {
        self.ownership.fill(LotOwner::Unowned);
        self.outcome = None;
    }
}
