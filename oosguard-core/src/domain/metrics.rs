//! MetricsBag — named scalar metrics for one evaluation window (IS or FT).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scalar metrics produced by the simulation engine for one window.
///
/// The five named fields are the ones the validation pipeline reads. Any
/// other numeric metric the engine reports lands in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsBag {
    pub net_profit_pct: f64,
    pub max_drawdown_pct: f64,
    /// Return over maximum drawdown.
    pub romad: f64,
    pub sharpe_ratio: f64,
    pub profit_factor: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_trades: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_rate: Option<f64>,
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, f64>,
}

impl MetricsBag {
    pub fn new(
        net_profit_pct: f64,
        max_drawdown_pct: f64,
        romad: f64,
        sharpe_ratio: f64,
        profit_factor: f64,
    ) -> Self {
        Self {
            net_profit_pct,
            max_drawdown_pct,
            romad,
            sharpe_ratio,
            profit_factor,
            total_trades: None,
            win_rate: None,
            extra: BTreeMap::new(),
        }
    }

    /// Look up a metric by name, named fields first.
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "net_profit_pct" => Some(self.net_profit_pct),
            "max_drawdown_pct" => Some(self.max_drawdown_pct),
            "romad" => Some(self.romad),
            "sharpe_ratio" => Some(self.sharpe_ratio),
            "profit_factor" => Some(self.profit_factor),
            "total_trades" => self.total_trades.map(f64::from),
            "win_rate" => self.win_rate,
            other => self.extra.get(other).copied(),
        }
    }
}
