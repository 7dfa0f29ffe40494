//! # Snapshot Boundary Types
//!
//! Inputs handed over by the external fetch/alignment collaborator and the
//! output bundles the engine computes from them. These types are what the
//! persistence and API layers serialize; the engine itself only fills them.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;

/// Aligned daily close prices over a common date axis.
///
/// Produced upstream by fetching each ticker and intersecting dates; every
/// series is expected to match `dates` in length. The engine consumes this
/// read-only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AlignedCloses {
  /// Lookback range label the data was fetched for (for example `"1y"`).
  pub range: String,
  pub dates: Vec<NaiveDate>,
  pub closes_by_ticker: BTreeMap<String, Vec<f64>>,
}

/// How holding values are denominated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoldingsMode {
  /// Values are relative weights (normalized before use).
  Weights,
  /// Values are share counts priced at the latest close.
  Shares,
}

/// One holding line: a ticker and its value in the holdings mode.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HoldingsItem {
  pub ticker: String,
  pub value: f64,
}

/// A portfolio specification: denomination mode plus holding lines.
///
/// Tickers are expected to be unique; they are upper-cased on use.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Holdings {
  pub mode: HoldingsMode,
  pub items: Vec<HoldingsItem>,
}

/// Run parameters for [`super::compute_snapshot`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SnapshotConfig {
  /// Benchmark ticker used for beta (looked up in the aligned closes).
  pub benchmark: String,
  pub risk_free_rate: f64,
  /// Optional covariance shrinkage intensity in `[0, 1]`.
  pub shrinkage: Option<f64>,
  /// Tail probability for VaR/CVaR.
  pub var_alpha: f64,
  /// Window of the rolling volatility series.
  pub rolling_window: usize,
  /// Starting value of the equity curve.
  pub equity_base: f64,
}

impl Default for SnapshotConfig {
  fn default() -> Self {
    Self {
      benchmark: "SPY".to_string(),
      risk_free_rate: 0.0,
      shrinkage: None,
      var_alpha: 0.05,
      rolling_window: 21,
      equity_base: 100.0,
    }
  }
}

/// Headline portfolio metrics over the lookback window.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SnapshotMetrics {
  pub total_return: f64,
  pub cagr: f64,
  pub annualized_return: f64,
  pub annualized_volatility: f64,
  pub sharpe: f64,
  /// Most negative point of the drawdown series.
  pub max_drawdown: f64,
  /// `None` when the benchmark series is absent or degenerate.
  pub beta: Option<f64>,
  pub var95: f64,
  pub cvar95: f64,
  pub hhi: f64,
  pub effective_n: f64,
}

/// Chart-ready series sharing one date axis.
///
/// `rolling_vol` carries leading `None`s for the warm-up window and
/// `portfolio_returns` a single leading `None`, so both align with `dates`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SnapshotSeries {
  pub dates: Vec<NaiveDate>,
  pub equity: Vec<f64>,
  pub drawdown: Vec<f64>,
  pub rolling_vol: Vec<Option<f64>>,
  pub portfolio_returns: Vec<Option<f64>>,
}

/// Cross-asset risk view: correlations and contribution shares.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SnapshotRisk {
  /// Asset order of the correlation matrix rows/columns.
  pub tickers: Vec<String>,
  pub corr_matrix: Vec<Vec<f64>>,
  pub risk_contrib_pct: BTreeMap<String, f64>,
}

/// Echo of one holding as the engine actually used it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HoldingsUsedRow {
  pub ticker: String,
  pub input_value: f64,
  pub last_price: f64,
  pub weight: f64,
}

/// Immutable analytics bundle for one portfolio configuration at one time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
  pub range: String,
  pub benchmark: String,
  pub risk_free_rate: f64,
  pub shrinkage: Option<f64>,
  pub holdings_used: Vec<HoldingsUsedRow>,
  pub metrics: SnapshotMetrics,
  pub series: SnapshotSeries,
  pub risk: SnapshotRisk,
}

/// Target-weight generation strategy for rebalancing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Objective {
  MinVariance,
  RiskParity,
}

impl Objective {
  /// Parse a label into an [`Objective`]; unknown labels map to min-variance.
  pub fn from_label(s: &str) -> Self {
    match s.to_lowercase().as_str() {
      "risk-parity" | "riskparity" => Self::RiskParity,
      _ => Self::MinVariance,
    }
  }
}

/// Run parameters for [`super::plan_rebalance`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RebalanceParams {
  /// Blend factor in `[0, 1]`; 0 keeps current weights, 1 adopts the target.
  pub gamma: f64,
  /// Optional per-asset weight cap, honored when in `(0, 1)`.
  pub max_weight: Option<f64>,
  /// Optional covariance shrinkage intensity in `[0, 1]`.
  pub shrinkage: Option<f64>,
}

impl Default for RebalanceParams {
  fn default() -> Self {
    Self {
      gamma: 1.0,
      max_weight: None,
      shrinkage: None,
    }
  }
}

/// Per-asset rebalance detail; share fields are `None` in weights mode.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RebalanceRow {
  pub ticker: String,
  pub current_weight: f64,
  pub target_weight: f64,
  pub final_weight: f64,
  pub current_shares: Option<f64>,
  pub target_shares: Option<f64>,
  pub trade_shares: Option<f64>,
  pub trade_value: Option<f64>,
}

/// Rebalance output: per-asset rows plus portfolio-level diagnostics.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RebalancePlan {
  pub tickers: Vec<String>,
  pub rows: Vec<RebalanceRow>,
  /// One-way turnover between current and final weights.
  pub turnover: f64,
  /// Annualized volatility at current weights.
  pub current_vol: f64,
  /// Annualized volatility at the optimizer target.
  pub target_vol: f64,
  /// Annualized volatility at the blended final weights.
  pub final_vol: f64,
  /// Cash residual from share flooring; `None` in weights mode.
  pub cash_leftover: Option<f64>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn holdings_mode_uses_lowercase_labels() {
    let holdings = Holdings {
      mode: HoldingsMode::Shares,
      items: vec![HoldingsItem {
        ticker: "AAA".to_string(),
        value: 12.0,
      }],
    };
    let json = serde_json::to_string(&holdings).unwrap();
    assert!(json.contains("\"shares\""));

    let back: Holdings = serde_json::from_str(&json).unwrap();
    assert_eq!(back.mode, HoldingsMode::Shares);
    assert_eq!(back.items[0].ticker, "AAA");
  }

  #[test]
  fn objective_labels_round_trip() {
    let json = serde_json::to_string(&Objective::MinVariance).unwrap();
    assert_eq!(json, "\"min-variance\"");
    assert_eq!(Objective::from_label("risk-parity"), Objective::RiskParity);
    assert_eq!(Objective::from_label("anything else"), Objective::MinVariance);
  }
}
