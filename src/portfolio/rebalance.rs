//! # Rebalance Blending and Trades
//!
//! $$
//! \mathbf{w}_{\mathrm{final}} = (1-\gamma)\,\mathbf{w}_{\mathrm{cur}} + \gamma\,\mathbf{w}_{\mathrm{tgt}}
//! $$
//!
//! Turnover-controlled interpolation between current and target weights, the
//! one-way turnover estimate, and whole-share trade generation with the cash
//! residual left by flooring.

use serde::Deserialize;
use serde::Serialize;

/// Per-asset trade derived from a final weight vector and share holdings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TradeDetail {
  pub ticker: String,
  /// Weight implied by current shares at last prices.
  pub current_weight: f64,
  /// Weight the trade steers the position toward.
  pub target_weight: f64,
  pub current_shares: f64,
  /// Whole-share position after the trade, `floor(value / price)`.
  pub target_shares: f64,
  /// Signed share delta, positive to buy.
  pub trade_shares: f64,
  /// Signed dollar value of the share delta.
  pub trade_value: f64,
}

/// Interpolate between current and target weights by `gamma`.
///
/// `gamma = 0` reproduces the current weights and `gamma = 1` the target
/// weights. The blend is renormalized only when its sum is positive, so an
/// all-zero blend stays all-zero.
pub fn blend_weights(current: &[f64], target: &[f64], gamma: f64) -> Vec<f64> {
  let blended: Vec<f64> = current
    .iter()
    .enumerate()
    .map(|(i, w)| (1.0 - gamma) * w + gamma * target.get(i).copied().unwrap_or(0.0))
    .collect();

  let sum: f64 = blended.iter().sum();
  if sum > 0.0 {
    blended.iter().map(|w| w / sum).collect()
  } else {
    blended
  }
}

/// One-way turnover, half the L1 distance between two weight vectors.
pub fn estimated_turnover(current: &[f64], final_weights: &[f64]) -> f64 {
  let n = current.len().max(final_weights.len());
  let mut sum = 0.0;
  for i in 0..n {
    let c = current.get(i).copied().unwrap_or(0.0);
    let f = final_weights.get(i).copied().unwrap_or(0.0);
    sum += (f - c).abs();
  }
  sum / 2.0
}

/// Derive whole-share trades that move share holdings toward final weights.
///
/// Total portfolio value is `Σ shares × price`; each target position is
/// floored to whole shares, and the residual of that flooring is returned
/// as leftover cash. A non-positive last price is substituted with `1.0`
/// for the share computation so the division stays defined.
pub fn compute_trades(
  tickers: &[String],
  current_shares: &[f64],
  last_prices: &[f64],
  final_weights: &[f64],
) -> (Vec<TradeDetail>, f64) {
  let total_value: f64 = current_shares
    .iter()
    .zip(last_prices.iter())
    .map(|(s, p)| s * p)
    .sum();

  let mut used_value = 0.0;
  let trades = tickers
    .iter()
    .enumerate()
    .map(|(i, ticker)| {
      let shares = current_shares.get(i).copied().unwrap_or(0.0);
      let price = last_prices.get(i).copied().unwrap_or(0.0);
      let weight = final_weights.get(i).copied().unwrap_or(0.0);

      let current_weight = if total_value > 0.0 { shares * price / total_value } else { 0.0 };
      let target_value = total_value * weight;
      let divisor = if price != 0.0 { price } else { 1.0 };
      let target_shares = (target_value / divisor).floor();
      let trade_shares = target_shares - shares;
      used_value += target_shares * price;

      TradeDetail {
        ticker: ticker.clone(),
        current_weight,
        target_weight: weight,
        current_shares: shares,
        target_shares,
        trade_shares,
        trade_value: trade_shares * price,
      }
    })
    .collect();

  (trades, total_value - used_value)
}
