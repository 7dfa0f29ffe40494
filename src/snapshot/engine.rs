//! # Snapshot Engine
//!
//! Orchestrates the pure analytics layers over aligned close prices: one
//! entry point computes the full metrics / series / risk snapshot, the
//! other a turnover-controlled rebalance plan. This is the only layer that
//! raises errors, and only for structural input problems; every numeric
//! edge case below it degrades to a documented sentinel.

use std::collections::BTreeMap;

use anyhow::Result;
use anyhow::bail;
use tracing::debug;

use super::types::AlignedCloses;
use super::types::Holdings;
use super::types::HoldingsMode;
use super::types::HoldingsUsedRow;
use super::types::Objective;
use super::types::RebalanceParams;
use super::types::RebalancePlan;
use super::types::RebalanceRow;
use super::types::Snapshot;
use super::types::SnapshotConfig;
use super::types::SnapshotMetrics;
use super::types::SnapshotRisk;
use super::types::SnapshotSeries;
use crate::portfolio::aggregate::beta_to_benchmark;
use crate::portfolio::aggregate::normalize_weights;
use crate::portfolio::aggregate::portfolio_returns;
use crate::portfolio::optimize::min_variance_weights;
use crate::portfolio::optimize::risk_parity_weights;
use crate::portfolio::rebalance::blend_weights;
use crate::portfolio::rebalance::compute_trades;
use crate::portfolio::rebalance::estimated_turnover;
use crate::portfolio::risk::portfolio_vol;
use crate::portfolio::risk::risk_contributions;
use crate::stats::TRADING_DAYS;
use crate::stats::matrix::correlation_matrix;
use crate::stats::matrix::covariance_matrix;
use crate::stats::matrix::shrink_covariance;
use crate::stats::returns::annualized_return;
use crate::stats::returns::annualized_volatility;
use crate::stats::returns::cagr;
use crate::stats::returns::compute_returns;
use crate::stats::returns::drawdown_series;
use crate::stats::returns::equity_curve_from_returns;
use crate::stats::returns::rolling_volatility;
use crate::stats::returns::sharpe_ratio;
use crate::stats::returns::total_return;
use crate::stats::tail::concentration_hhi;
use crate::stats::tail::effective_n;
use crate::stats::tail::var_cvar;

/// Holdings resolved against the aligned closes: everything downstream
/// analytics need, in holdings order.
struct ResolvedHoldings {
  tickers: Vec<String>,
  input_values: Vec<f64>,
  last_prices: Vec<f64>,
  weights: Vec<f64>,
  returns_by_asset: Vec<Vec<f64>>,
}

fn resolve_holdings(closes: &AlignedCloses, holdings: &Holdings) -> Result<ResolvedHoldings> {
  if closes.dates.len() < 2 {
    bail!(
      "not enough overlapping data points across tickers ({} aligned, need at least 2)",
      closes.dates.len()
    );
  }

  let tickers: Vec<String> = holdings.items.iter().map(|h| h.ticker.to_uppercase()).collect();
  let input_values: Vec<f64> = holdings.items.iter().map(|h| h.value).collect();

  let mut last_prices = Vec::with_capacity(tickers.len());
  let mut returns_by_asset = Vec::with_capacity(tickers.len());
  for ticker in &tickers {
    let series = match closes.closes_by_ticker.get(ticker) {
      Some(series) if !series.is_empty() => series,
      _ => bail!("missing price data for {ticker}"),
    };
    last_prices.push(*series.last().unwrap_or(&0.0));
    returns_by_asset.push(compute_returns(series));
  }

  let raw: Vec<f64> = match holdings.mode {
    HoldingsMode::Shares => input_values
      .iter()
      .zip(last_prices.iter())
      .map(|(shares, price)| shares * price)
      .collect(),
    HoldingsMode::Weights => input_values.clone(),
  };
  let weights = normalize_weights(&raw);

  Ok(ResolvedHoldings {
    tickers,
    input_values,
    last_prices,
    weights,
    returns_by_asset,
  })
}

/// Compute a full analytics snapshot for one portfolio configuration.
///
/// Errors only on structural input problems: fewer than two aligned dates,
/// or a holding ticker with no price series. Everything else resolves to
/// the sentinel policies of the stats layer (zero Sharpe for flat series,
/// `None` beta for a degenerate benchmark, and so on).
pub fn compute_snapshot(
  closes: &AlignedCloses,
  holdings: &Holdings,
  config: &SnapshotConfig,
) -> Result<Snapshot> {
  let resolved = resolve_holdings(closes, holdings)?;
  debug!(
    assets = resolved.tickers.len(),
    points = closes.dates.len(),
    range = %closes.range,
    "computing snapshot"
  );

  let p_returns = portfolio_returns(&resolved.returns_by_asset, &resolved.weights);
  let equity = equity_curve_from_returns(&p_returns, config.equity_base);
  let drawdown = drawdown_series(&equity);
  let rolling_vol = rolling_volatility(&p_returns, config.rolling_window);
  let returns_with_lead: Vec<Option<f64>> = std::iter::once(None)
    .chain(p_returns.iter().copied().map(Some))
    .collect();

  let benchmark = config.benchmark.to_uppercase();
  let beta = closes
    .closes_by_ticker
    .get(&benchmark)
    .map(|series| compute_returns(series))
    .filter(|b| b.len() == p_returns.len())
    .and_then(|b| beta_to_benchmark(&p_returns, &b));

  let mut cov = covariance_matrix(&resolved.returns_by_asset);
  if let Some(s) = config.shrinkage {
    cov = shrink_covariance(&cov, s);
  }
  let corr = correlation_matrix(&cov);
  let rc = risk_contributions(&resolved.weights, &cov);
  let risk_contrib_pct: BTreeMap<String, f64> = resolved
    .tickers
    .iter()
    .cloned()
    .zip(rc.iter().copied())
    .collect();

  let (var95, cvar95) = var_cvar(&p_returns, config.var_alpha);
  let max_drawdown = drawdown.iter().copied().fold(0.0_f64, f64::min);

  let metrics = SnapshotMetrics {
    total_return: total_return(&p_returns),
    cagr: cagr(&p_returns),
    annualized_return: annualized_return(&p_returns),
    annualized_volatility: annualized_volatility(&p_returns),
    sharpe: sharpe_ratio(&p_returns, config.risk_free_rate),
    max_drawdown,
    beta,
    var95,
    cvar95,
    hhi: concentration_hhi(&resolved.weights),
    effective_n: effective_n(&resolved.weights),
  };

  let holdings_used = resolved
    .tickers
    .iter()
    .enumerate()
    .map(|(i, ticker)| HoldingsUsedRow {
      ticker: ticker.clone(),
      input_value: resolved.input_values[i],
      last_price: resolved.last_prices[i],
      weight: resolved.weights[i],
    })
    .collect();

  Ok(Snapshot {
    range: closes.range.clone(),
    benchmark,
    risk_free_rate: config.risk_free_rate,
    shrinkage: config.shrinkage,
    holdings_used,
    metrics,
    series: SnapshotSeries {
      dates: closes.dates.clone(),
      equity,
      drawdown,
      rolling_vol,
      portfolio_returns: returns_with_lead,
    },
    risk: SnapshotRisk {
      tickers: resolved.tickers,
      corr_matrix: corr,
      risk_contrib_pct,
    },
  })
}

/// Build a rebalance plan toward an optimizer target.
///
/// The current weights come from the holdings, the target from the chosen
/// objective over the (optionally shrunk) covariance matrix, and the final
/// weights from blending the two by `gamma` (clamped into `[0, 1]`). In
/// shares mode the plan also carries whole-share trades and the cash
/// residual of flooring; in weights mode those fields stay `None`.
pub fn plan_rebalance(
  closes: &AlignedCloses,
  holdings: &Holdings,
  objective: Objective,
  params: &RebalanceParams,
) -> Result<RebalancePlan> {
  let resolved = resolve_holdings(closes, holdings)?;
  debug!(
    assets = resolved.tickers.len(),
    ?objective,
    gamma = params.gamma,
    "planning rebalance"
  );

  let mut cov = covariance_matrix(&resolved.returns_by_asset);
  if let Some(s) = params.shrinkage {
    cov = shrink_covariance(&cov, s);
  }

  let current = resolved.weights.clone();
  let target = match objective {
    Objective::MinVariance => min_variance_weights(&cov, params.max_weight),
    Objective::RiskParity => risk_parity_weights(&cov, params.max_weight),
  };
  let final_weights = blend_weights(&current, &target, params.gamma.clamp(0.0, 1.0));
  let turnover = estimated_turnover(&current, &final_weights);

  let ann = TRADING_DAYS.sqrt();
  let current_vol = portfolio_vol(&current, &cov) * ann;
  let target_vol = portfolio_vol(&target, &cov) * ann;
  let final_vol = portfolio_vol(&final_weights, &cov) * ann;

  let share_trades = match holdings.mode {
    HoldingsMode::Shares => Some(compute_trades(
      &resolved.tickers,
      &resolved.input_values,
      &resolved.last_prices,
      &final_weights,
    )),
    HoldingsMode::Weights => None,
  };

  let rows = resolved
    .tickers
    .iter()
    .enumerate()
    .map(|(i, ticker)| {
      let trade = share_trades.as_ref().map(|(trades, _)| &trades[i]);
      RebalanceRow {
        ticker: ticker.clone(),
        current_weight: current[i],
        target_weight: target.get(i).copied().unwrap_or(0.0),
        final_weight: final_weights.get(i).copied().unwrap_or(0.0),
        current_shares: trade.map(|t| t.current_shares),
        target_shares: trade.map(|t| t.target_shares),
        trade_shares: trade.map(|t| t.trade_shares),
        trade_value: trade.map(|t| t.trade_value),
      }
    })
    .collect();

  Ok(RebalancePlan {
    tickers: resolved.tickers,
    rows,
    turnover,
    current_vol,
    target_vol,
    final_vol,
    cash_leftover: share_trades.map(|(_, leftover)| leftover),
  })
}
