//! Simulation runner: full sessions under the scripted player policy.

use crate::core::config::GameConfig;
use crate::core::events::NoOpEventSink;
use crate::core::session::GameSession;
use crate::investments::PositionId;
use crate::market::{GameOutcome, LotOwner};
use crate::simulator::config::{PlayerPolicy, SimConfig};
use crate::simulator::report::SimReport;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Outcome and end-state of one simulated session.
#[derive(Debug, Clone)]
pub struct RunStats {
    /// `None` means the run hit the tick budget before a terminal state.
    pub outcome: Option<GameOutcome>,
    pub ticks: u64,
    pub final_balance: Decimal,
    pub realized_gain: Decimal,
    pub unrealized_gain: Decimal,
    pub player_lots: usize,
    pub rival_lots: usize,
    pub restaurant_level: u32,
}

/// Runs the full batch and aggregates a report.
pub fn run_simulation(config: &SimConfig) -> SimReport {
    let mut runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed + u64::from(run_idx)),
            None => ChaCha8Rng::from_entropy(),
        };

        let stats = simulate_single_run(&config.game, &config.policy, config.max_ticks_per_run, &mut rng);
        if config.verbosity >= 2 {
            println!(
                "Run {}/{} - {:?} after {} ticks, balance {}, lots {}:{}",
                run_idx + 1,
                config.num_runs,
                stats.outcome,
                stats.ticks,
                stats.final_balance,
                stats.player_lots,
                stats.rival_lots,
            );
        }
        runs.push(stats);
    }

    SimReport::from_runs(runs, config)
}

fn simulate_single_run(
    game: &GameConfig,
    policy: &PlayerPolicy,
    max_ticks: u64,
    rng: &mut ChaCha8Rng,
) -> RunStats {
    let mut session = match GameSession::new(game.clone(), Arc::new(NoOpEventSink)) {
        Ok(session) => session,
        Err(err) => {
            // The CLI validates up front; a failure here means the batch
            // config was mutated mid-run. Surface it as an empty run.
            log::error!("invalid game config in simulation batch: {err}");
            return RunStats {
                outcome: None,
                ticks: 0,
                final_balance: Decimal::ZERO,
                realized_gain: Decimal::ZERO,
                unrealized_gain: Decimal::ZERO,
                player_lots: 0,
                rival_lots: 0,
                restaurant_level: 0,
            };
        }
    };

    let mut outcome = None;
    while session.current_tick() < max_ticks {
        apply_policy(&mut session, policy);
        match session.tick(rng) {
            Ok(result) => {
                if let Some(terminal) = result {
                    outcome = Some(terminal);
                    break;
                }
            }
            Err(err) => {
                log::warn!("tick failed mid-run: {err}");
                break;
            }
        }
    }

    let ownership = session.market().ownership_map();
    RunStats {
        outcome,
        ticks: session.current_tick(),
        final_balance: session.ledger().balance(),
        realized_gain: session.book().realized_gain(),
        unrealized_gain: session.book().unrealized_gain(),
        player_lots: ownership.values().filter(|o| **o == LotOwner::Player).count(),
        rival_lots: ownership.values().filter(|o| **o == LotOwner::Rival).count(),
        restaurant_level: session.income().level(),
    }
}

/// One round of baseline decisions at a tick boundary. Every action is
/// best-effort: rejections (short funds, settled lots) just mean the
/// player waits.
fn apply_policy(session: &mut GameSession, policy: &PlayerPolicy) {
    let reserve = policy.cash_reserve;

    // Upgrades first: they compound for the rest of the run.
    if policy.upgrade_restaurant {
        let level = session.income().level();
        if let Some(cost) = session.income().upgrade_cost(level) {
            if session.ledger().balance() - cost >= reserve {
                session.upgrade_restaurant().ok();
            }
        }
    }

    // Then land: the race the game is about.
    if policy.buy_lots {
        let spendable = session.ledger().balance() - reserve;
        let target = session
            .market()
            .unowned_lots()
            .filter(|lot| lot.base_cost <= spendable)
            .min_by(|a, b| {
                a.base_cost
                    .cmp(&b.base_cost)
                    .then_with(|| a.lot_id.cmp(&b.lot_id))
            })
            .map(|lot| lot.lot_id.clone());
        if let Some(lot_id) = target {
            session.buy_lot(&lot_id).ok();
        }
    }

    // Liquidate positions that have run their course.
    let due: Vec<PositionId> = session
        .book()
        .positions()
        .iter()
        .filter(|p| p.ticks_held >= policy.sell_after_ticks)
        .map(|p| p.id)
        .collect();
    for id in due {
        session.sell_investment(id).ok();
    }

    // Periodically put idle cash to work.
    if policy.invest_every_ticks > 0 && session.current_tick() % policy.invest_every_ticks == 0 {
        let definition_id = policy
            .preferred_investment
            .clone()
            .or_else(|| session.book().definitions().first().map(|d| d.id.clone()));
        if let Some(definition_id) = definition_id {
            let spendable = session.ledger().balance() - reserve;
            let fraction = Decimal::from_f64(policy.invest_fraction).unwrap_or(Decimal::ZERO);
            let amount = (spendable * fraction).round_dp(2);
            if amount > Decimal::ZERO {
                session.open_investment(&definition_id, amount).ok();
            }
        }
    }
}
