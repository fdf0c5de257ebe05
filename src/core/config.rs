//! Authored game configuration.
//!
//! Everything tunable lives here: starting balance, the restaurant income
//! table, the investment catalog, the lot catalog, and the rival's
//! economy. A config is loaded (or authored in code) once per session and
//! validated eagerly — malformed data is a [`ConfigError`] at load time,
//! never a runtime fault mid-session.

use crate::core::constants::MAX_ANNUAL_RETURN_RATE;
use crate::economy::IncomeTable;
use crate::investments::{InvestmentDefinition, RiskLevel};
use crate::market::{CityLotDefinition, GridPosition};
use crate::rival::{AggressionCurve, RivalConfig};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Load-time validation failures for authored data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(String),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: String, value: Decimal },

    #[error("{field} must be positive")]
    NonPositive { field: String },

    #[error("income table needs at least one level multiplier")]
    EmptyIncomeTable,

    #[error("income table has {multipliers} multipliers but {costs} upgrade costs; expected one cost per upgrade step")]
    UpgradeTableMismatch { multipliers: usize, costs: usize },

    #[error("investment '{name}': annual return rate {rate} is outside [0, {max}]")]
    ReturnRateOutOfRange {
        name: String,
        rate: Decimal,
        max: Decimal,
    },

    #[error("investment '{name}': volatility range {min}..{max} is inverted")]
    InvertedVolatilityRange { name: String, min: f64, max: f64 },

    #[error("duplicate id '{id}' in the {catalog} catalog")]
    DuplicateId { id: String, catalog: &'static str },

    #[error("lot catalog must not be empty")]
    NoLots,

    #[error("rival warning_ticks ({warning_ticks}) must be below purchase_interval_ticks ({interval_ticks})")]
    WarningTooLate {
        warning_ticks: u32,
        interval_ticks: u32,
    },

    #[error("aggression curve keys must be sorted by progress within [0, 1] with finite positive multipliers")]
    MalformedAggressionCurve,
}

/// The full authored surface for one session. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub starting_balance: Decimal,
    pub income: IncomeTable,
    pub investments: Vec<InvestmentDefinition>,
    pub lots: Vec<CityLotDefinition>,
    pub rival: RivalConfig,
}

impl Default for GameConfig {
    /// The authored baseline game: a modest restaurant, three investment
    /// products across the risk levels, a six-lot board, and a rival that
    /// speeds up as it captures ground.
    fn default() -> Self {
        Self {
            starting_balance: dec!(1000),
            income: IncomeTable {
                base_income_per_tick: dec!(4),
                level_multipliers: vec![dec!(1), dec!(1.5), dec!(2.25), dec!(3.5), dec!(5)],
                upgrade_costs: vec![dec!(150), dec!(400), dec!(1000), dec!(2500)],
            },
            investments: vec![
                InvestmentDefinition {
                    id: String::new(),
                    display_name: "Savings Bonds".to_string(),
                    risk_level: RiskLevel::Low,
                    annual_return_rate: dec!(0.04),
                    volatility_range: (1.0, 1.0),
                    compounding_frequency_ticks: 20,
                    compounds_per_year: 12,
                    minimum_deposit: dec!(50),
                },
                InvestmentDefinition {
                    id: String::new(),
                    display_name: "Index Fund".to_string(),
                    risk_level: RiskLevel::Medium,
                    annual_return_rate: dec!(0.12),
                    volatility_range: (0.8, 1.2),
                    compounding_frequency_ticks: 30,
                    compounds_per_year: 12,
                    minimum_deposit: dec!(100),
                },
                InvestmentDefinition {
                    id: String::new(),
                    display_name: "Venture Syndicate".to_string(),
                    risk_level: RiskLevel::High,
                    annual_return_rate: dec!(0.35),
                    volatility_range: (-1.5, 3.0),
                    compounding_frequency_ticks: 45,
                    compounds_per_year: 4,
                    minimum_deposit: dec!(250),
                },
            ],
            lots: vec![
                lot("Corner Cafe", dec!(600), dec!(3), 0, 0),
                lot("Market Row", dec!(850), dec!(4), 1, 0),
                lot("Old Harbor Docks", dec!(1000), dec!(5), 2, 1),
                lot("Midtown Arcade", dec!(1400), dec!(7), 1, 2),
                lot("Grand Hotel", dec!(2000), dec!(10), 3, 2),
                lot("Skyline Tower", dec!(2600), dec!(13), 4, 3),
            ],
            rival: RivalConfig {
                starting_money: dec!(500),
                income_per_tick: dec!(8),
                purchase_interval_ticks: 60,
                warning_ticks: 10,
                purchase_buffer: dec!(100),
                aggression: Some(AggressionCurve::linear(1.0, 2.5)),
            },
        }
    }
}

fn lot(name: &str, cost: Decimal, bonus: Decimal, x: i32, y: i32) -> CityLotDefinition {
    CityLotDefinition {
        lot_id: String::new(),
        display_name: name.to_string(),
        base_cost: cost,
        income_bonus: bonus,
        grid_position: GridPosition { x, y },
    }
}

impl GameConfig {
    /// Parses and validates a JSON config. Missing fields fall back to
    /// the authored defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_json(&json)
    }

    /// Rejects every malformed-authored-data case up front.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative("starting_balance", self.starting_balance)?;
        self.validate_income()?;
        self.validate_investments()?;
        self.validate_lots()?;
        self.validate_rival()?;
        Ok(())
    }

    fn validate_income(&self) -> Result<(), ConfigError> {
        let income = &self.income;
        require_positive("income.base_income_per_tick", income.base_income_per_tick)?;
        if income.level_multipliers.is_empty() {
            return Err(ConfigError::EmptyIncomeTable);
        }
        if income.upgrade_costs.len() + 1 != income.level_multipliers.len() {
            return Err(ConfigError::UpgradeTableMismatch {
                multipliers: income.level_multipliers.len(),
                costs: income.upgrade_costs.len(),
            });
        }
        for multiplier in &income.level_multipliers {
            require_positive("income.level_multipliers", *multiplier)?;
        }
        for cost in &income.upgrade_costs {
            require_positive("income.upgrade_costs", *cost)?;
        }
        Ok(())
    }

    fn validate_investments(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for def in &self.investments {
            let name = def.display_name.clone();
            if def.annual_return_rate < Decimal::ZERO
                || def.annual_return_rate > MAX_ANNUAL_RETURN_RATE
            {
                return Err(ConfigError::ReturnRateOutOfRange {
                    name,
                    rate: def.annual_return_rate,
                    max: MAX_ANNUAL_RETURN_RATE,
                });
            }
            let (min, max) = def.volatility_range;
            if !min.is_finite() || !max.is_finite() || min > max {
                return Err(ConfigError::InvertedVolatilityRange { name, min, max });
            }
            if def.compounding_frequency_ticks == 0 {
                return Err(ConfigError::NonPositive {
                    field: format!("investment '{name}' compounding_frequency_ticks"),
                });
            }
            if def.compounds_per_year == 0 {
                return Err(ConfigError::NonPositive {
                    field: format!("investment '{name}' compounds_per_year"),
                });
            }
            require_non_negative(
                &format!("investment '{name}' minimum_deposit"),
                def.minimum_deposit,
            )?;
            if !seen.insert(def.resolved_id()) {
                return Err(ConfigError::DuplicateId {
                    id: def.resolved_id(),
                    catalog: "investment",
                });
            }
        }
        Ok(())
    }

    fn validate_lots(&self) -> Result<(), ConfigError> {
        if self.lots.is_empty() {
            return Err(ConfigError::NoLots);
        }
        let mut seen = HashSet::new();
        for lot in &self.lots {
            let name = &lot.display_name;
            require_non_negative(&format!("lot '{name}' base_cost"), lot.base_cost)?;
            require_non_negative(&format!("lot '{name}' income_bonus"), lot.income_bonus)?;
            if !seen.insert(lot.resolved_id()) {
                return Err(ConfigError::DuplicateId {
                    id: lot.resolved_id(),
                    catalog: "lot",
                });
            }
        }
        Ok(())
    }

    fn validate_rival(&self) -> Result<(), ConfigError> {
        let rival = &self.rival;
        require_non_negative("rival.starting_money", rival.starting_money)?;
        require_non_negative("rival.income_per_tick", rival.income_per_tick)?;
        if rival.purchase_interval_ticks == 0 {
            return Err(ConfigError::NonPositive {
                field: "rival.purchase_interval_ticks".to_string(),
            });
        }
        if rival.warning_ticks >= rival.purchase_interval_ticks {
            return Err(ConfigError::WarningTooLate {
                warning_ticks: rival.warning_ticks,
                interval_ticks: rival.purchase_interval_ticks,
            });
        }
        require_non_negative("rival.purchase_buffer", rival.purchase_buffer)?;
        if let Some(curve) = &rival.aggression {
            let mut last_progress = 0.0f64;
            for (i, key) in curve.keys.iter().enumerate() {
                let ordered = i == 0 || key.progress >= last_progress;
                let in_range = (0.0..=1.0).contains(&key.progress);
                let sane_multiplier = key.multiplier.is_finite() && key.multiplier > 0.0;
                if !(ordered && in_range && sane_multiplier) {
                    return Err(ConfigError::MalformedAggressionCurve);
                }
                last_progress = key.progress;
            }
        }
        Ok(())
    }
}

fn require_non_negative(field: &str, value: Decimal) -> Result<(), ConfigError> {
    if value < Decimal::ZERO {
        return Err(ConfigError::NegativeAmount {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

fn require_positive(field: &str, value: Decimal) -> Result<(), ConfigError> {
    if value <= Decimal::ZERO {
        return Err(ConfigError::NonPositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Lowercase-dashed identifier derived from a display name.
pub(crate) fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
