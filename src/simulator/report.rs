//! Simulation report generation.

use crate::market::GameOutcome;
use crate::simulator::config::SimConfig;
use crate::simulator::runner::RunStats;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

/// Aggregated results from a simulation batch.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub wins: u32,
    pub losses: u32,
    pub timeouts: u32,
    pub win_rate: f64,

    /// Average ticks for runs that actually reached a terminal state.
    pub avg_ticks_to_terminal: f64,
    pub avg_final_balance: f64,
    pub avg_realized_gain: f64,
    pub avg_unrealized_gain: f64,
    pub avg_player_lots: f64,
    pub avg_rival_lots: f64,
    pub avg_restaurant_level: f64,

    pub max_ticks_per_run: u64,
    pub seed: Option<u64>,

    /// Individual run stats for detailed analysis.
    #[serde(skip)]
    pub run_stats: Vec<RunStats>,
}

impl SimReport {
    /// Builds the aggregate view over completed runs.
    pub fn from_runs(runs: Vec<RunStats>, config: &SimConfig) -> Self {
        let num_runs = runs.len() as u32;
        let denominator = f64::from(num_runs.max(1));

        let wins = runs
            .iter()
            .filter(|r| r.outcome == Some(GameOutcome::Won))
            .count() as u32;
        let losses = runs
            .iter()
            .filter(|r| r.outcome == Some(GameOutcome::Lost))
            .count() as u32;
        let timeouts = num_runs - wins - losses;

        let terminal_count = runs.iter().filter(|r| r.outcome.is_some()).count();
        let avg_ticks_to_terminal = if terminal_count == 0 {
            0.0
        } else {
            runs.iter()
                .filter(|r| r.outcome.is_some())
                .map(|r| r.ticks as f64)
                .sum::<f64>()
                / terminal_count as f64
        };

        let avg_final_balance = runs
            .iter()
            .map(|r| r.final_balance.to_f64().unwrap_or(0.0))
            .sum::<f64>()
            / denominator;
        let avg_realized_gain = runs
            .iter()
            .map(|r| r.realized_gain.to_f64().unwrap_or(0.0))
            .sum::<f64>()
            / denominator;
        let avg_unrealized_gain = runs
            .iter()
            .map(|r| r.unrealized_gain.to_f64().unwrap_or(0.0))
            .sum::<f64>()
            / denominator;
        let avg_player_lots = runs.iter().map(|r| r.player_lots as f64).sum::<f64>() / denominator;
        let avg_rival_lots = runs.iter().map(|r| r.rival_lots as f64).sum::<f64>() / denominator;
        let avg_restaurant_level =
            runs.iter().map(|r| f64::from(r.restaurant_level)).sum::<f64>() / denominator;

        Self {
            num_runs,
            wins,
            losses,
            timeouts,
            win_rate: f64::from(wins) / denominator,
            avg_ticks_to_terminal,
            avg_final_balance,
            avg_realized_gain,
            avg_unrealized_gain,
            avg_player_lots,
            avg_rival_lots,
            avg_restaurant_level,
            max_ticks_per_run: config.max_ticks_per_run,
            seed: config.seed,
            run_stats: runs,
        }
    }

    /// Human-readable report body.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("=== SIMULATION RESULTS ===\n\n");
        out.push_str(&format!("Runs:              {}\n", self.num_runs));
        out.push_str(&format!(
            "Outcomes:          {} won / {} lost / {} timed out (>{} ticks)\n",
            self.wins, self.losses, self.timeouts, self.max_ticks_per_run
        ));
        out.push_str(&format!("Win rate:          {:.1}%\n", self.win_rate * 100.0));
        out.push_str(&format!(
            "Avg game length:   {:.0} ticks\n\n",
            self.avg_ticks_to_terminal
        ));

        out.push_str("--- Player economy (averages) ---\n");
        out.push_str(&format!("Final balance:     {:.2}\n", self.avg_final_balance));
        out.push_str(&format!("Realized gain:     {:.2}\n", self.avg_realized_gain));
        out.push_str(&format!(
            "Unrealized gain:   {:.2}\n",
            self.avg_unrealized_gain
        ));
        out.push_str(&format!(
            "Restaurant level:  {:.2}\n\n",
            self.avg_restaurant_level
        ));

        out.push_str("--- Lot race (averages) ---\n");
        out.push_str(&format!("Player lots:       {:.2}\n", self.avg_player_lots));
        out.push_str(&format!("Rival lots:        {:.2}\n", self.avg_rival_lots));

        if let Some(seed) = self.seed {
            out.push_str(&format!("\nSeed:              {seed}\n"));
        }
        out
    }

    /// JSON form of the aggregate view (per-run stats excluded).
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
