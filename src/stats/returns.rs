//! # Return Series Statistics
//!
//! $$
//! r_i = \frac{p_{i+1}}{p_i} - 1
//! $$
//!
//! Simple-return computation and the descriptive statistics derived from a
//! single return series: equity curve, drawdown, annualized return and
//! volatility, rolling volatility, CAGR and Sharpe ratio.

use super::TRADING_DAYS;
use super::sample_mean;

/// Convert close prices to simple one-period returns.
///
/// The output has length `prices.len() - 1` (or 0 for an empty input). Any
/// step whose preceding price is non-positive yields a `0.0` return instead
/// of dividing by zero.
pub fn compute_returns(prices: &[f64]) -> Vec<f64> {
  let mut out = Vec::with_capacity(prices.len().saturating_sub(1));
  for i in 1..prices.len() {
    let prev = prices[i - 1];
    out.push(if prev > 0.0 { prices[i] / prev - 1.0 } else { 0.0 });
  }
  out
}

/// Compound a return series into an equity curve starting at `start_value`.
///
/// The curve is one element longer than the return series; element 0 is
/// `start_value` itself.
pub fn equity_curve_from_returns(returns: &[f64], start_value: f64) -> Vec<f64> {
  let mut curve = Vec::with_capacity(returns.len() + 1);
  curve.push(start_value);
  for &r in returns {
    let prev = *curve.last().unwrap_or(&start_value);
    curve.push(prev * (1.0 + r));
  }
  curve
}

/// Compounded total return, `prod(1 + r) - 1`.
pub fn total_return(returns: &[f64]) -> f64 {
  if returns.is_empty() {
    return 0.0;
  }
  returns.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0
}

/// Compound annual growth rate assuming 252 trading days per year.
///
/// Returns `-1.0` on total wipeout (total return at or below -100%), since a
/// negative base raised to a fractional power has no real value.
pub fn cagr(returns: &[f64]) -> f64 {
  if returns.is_empty() {
    return 0.0;
  }
  let total = total_return(returns);
  if total <= -1.0 {
    return -1.0;
  }
  (1.0 + total).powf(TRADING_DAYS / returns.len() as f64) - 1.0
}

/// Mean daily return scaled to a 252-day year.
pub fn annualized_return(returns: &[f64]) -> f64 {
  sample_mean(returns) * TRADING_DAYS
}

/// Population standard deviation (divisor `n`) scaled by `sqrt(252)`.
pub fn annualized_volatility(returns: &[f64]) -> f64 {
  if returns.is_empty() {
    return 0.0;
  }
  let mean = sample_mean(returns);
  let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;
  variance.sqrt() * TRADING_DAYS.sqrt()
}

/// Drawdown of an equity curve relative to its running peak.
///
/// The peak starts at negative infinity, so the first positive curve value
/// records a drawdown of `0.0`. Points where the running peak is still
/// non-positive also report `0.0`.
pub fn drawdown_series(equity_curve: &[f64]) -> Vec<f64> {
  let mut peak = f64::NEG_INFINITY;
  equity_curve
    .iter()
    .map(|&v| {
      if v > peak {
        peak = v;
      }
      if peak > 0.0 { v / peak - 1.0 } else { 0.0 }
    })
    .collect()
}

/// Trailing annualized volatility over a fixed window.
///
/// Indices with fewer than `window` observations available emit `None`, so
/// the output keeps the same length and alignment as the input series.
pub fn rolling_volatility(returns: &[f64], window: usize) -> Vec<Option<f64>> {
  let mut out = Vec::with_capacity(returns.len());
  for i in 0..returns.len() {
    if i + 1 < window {
      out.push(None);
      continue;
    }
    let slice = &returns[i + 1 - window..i + 1];
    out.push(Some(annualized_volatility(slice)));
  }
  out
}

/// Annualized Sharpe ratio, `0.0` when volatility is non-positive.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
  let vol = annualized_volatility(returns);
  if vol <= 0.0 {
    return 0.0;
  }
  (annualized_return(returns) - risk_free_rate) / vol
}
