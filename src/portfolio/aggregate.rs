//! # Portfolio Aggregation
//!
//! $$
//! r_{p,t} = \sum_i w_i \, r_{i,t}
//! $$
//!
//! Combining per-asset return series and weights into a single portfolio
//! return series, plus benchmark-relative beta.

use crate::stats::sample_mean;

/// Normalize raw values into weights by the sum of absolute values.
///
/// When that sum is non-positive every output weight is `0.0`, giving the
/// caller a visible "cannot normalize" signal instead of a division error.
pub fn normalize_weights(values: &[f64]) -> Vec<f64> {
  let sum: f64 = values.iter().map(|v| v.abs()).sum();
  if sum <= 0.0 {
    return vec![0.0; values.len()];
  }
  values.iter().map(|v| v / sum).collect()
}

/// Weighted sum of aligned per-asset return series.
///
/// Assets beyond the end of `weights` count with weight `0.0`. All series
/// are expected to share one length (enforced by the upstream alignment
/// step); the output length follows the first series.
pub fn portfolio_returns(aligned_returns: &[Vec<f64>], weights: &[f64]) -> Vec<f64> {
  let n_periods = aligned_returns.first().map(|r| r.len()).unwrap_or(0);
  let mut out = vec![0.0; n_periods];

  for (i, series) in aligned_returns.iter().enumerate() {
    let w = weights.get(i).copied().unwrap_or(0.0);
    for (t, acc) in out.iter_mut().enumerate() {
      *acc += w * series.get(t).copied().unwrap_or(0.0);
    }
  }

  out
}

/// Beta of a portfolio return series against a benchmark series.
///
/// Computed as `cov(p, b) / var(b)` with sample divisor `n - 1`. Returns
/// `None` for empty or length-mismatched series and for a zero-variance
/// benchmark, keeping "no beta" distinct from a beta of exactly zero.
pub fn beta_to_benchmark(portfolio: &[f64], benchmark: &[f64]) -> Option<f64> {
  if portfolio.is_empty() || portfolio.len() != benchmark.len() {
    return None;
  }

  let mean_p = sample_mean(portfolio);
  let mean_b = sample_mean(benchmark);

  let mut cov = 0.0;
  let mut var_b = 0.0;
  for (p, b) in portfolio.iter().zip(benchmark.iter()) {
    cov += (p - mean_p) * (b - mean_b);
    var_b += (b - mean_b).powi(2);
  }

  if portfolio.len() > 1 {
    cov /= (portfolio.len() - 1) as f64;
    var_b /= (benchmark.len() - 1) as f64;
  } else {
    cov = 0.0;
    var_b = 0.0;
  }

  if var_b > 0.0 { Some(cov / var_b) } else { None }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;

  use super::*;

  #[test]
  fn normalize_weights_divides_by_absolute_sum() {
    let w = normalize_weights(&[2.0, 6.0]);
    assert_relative_eq!(w[0], 0.25, epsilon = 1e-12);
    assert_relative_eq!(w[1], 0.75, epsilon = 1e-12);

    let mixed = normalize_weights(&[-1.0, 3.0]);
    assert_relative_eq!(mixed[0], -0.25, epsilon = 1e-12);
    assert_relative_eq!(mixed[1], 0.75, epsilon = 1e-12);
  }

  #[test]
  fn normalize_weights_all_zero_input_yields_all_zero() {
    assert_eq!(normalize_weights(&[0.0, 0.0, 0.0]), vec![0.0, 0.0, 0.0]);
    assert!(normalize_weights(&[]).is_empty());
  }

  #[test]
  fn portfolio_returns_reference_scenario() {
    let returns = vec![vec![0.01, -0.02, 0.03], vec![0.0, 0.01, -0.01]];
    let series = portfolio_returns(&returns, &[0.5, 0.5]);

    assert_relative_eq!(series[0], 0.005, epsilon = 1e-12);
    assert_relative_eq!(series[1], -0.005, epsilon = 1e-12);
    assert_relative_eq!(series[2], 0.01, epsilon = 1e-12);

    let total = crate::stats::returns::total_return(&series);
    assert_relative_eq!(total, 1.005 * 0.995 * 1.01 - 1.0, epsilon = 1e-12);
  }

  #[test]
  fn portfolio_returns_missing_weight_counts_as_zero() {
    let returns = vec![vec![0.01, 0.02], vec![0.5, 0.5]];
    let series = portfolio_returns(&returns, &[1.0]);
    assert_relative_eq!(series[0], 0.01, epsilon = 1e-12);
    assert_relative_eq!(series[1], 0.02, epsilon = 1e-12);
  }

  #[test]
  fn beta_matches_hand_computation() {
    let portfolio = [0.01, -0.01, 0.02, 0.0];
    let benchmark = [0.005, -0.004, 0.01, 0.001];
    let beta = beta_to_benchmark(&portfolio, &benchmark).unwrap();

    let mp = sample_mean(&portfolio);
    let mb = sample_mean(&benchmark);
    let cov: f64 = portfolio
      .iter()
      .zip(benchmark.iter())
      .map(|(p, b)| (p - mp) * (b - mb))
      .sum::<f64>()
      / 3.0;
    let var_b: f64 = benchmark.iter().map(|b| (b - mb).powi(2)).sum::<f64>() / 3.0;
    assert_relative_eq!(beta, cov / var_b, epsilon = 1e-12);
  }

  #[test]
  fn beta_is_none_for_degenerate_inputs() {
    assert!(beta_to_benchmark(&[], &[]).is_none());
    assert!(beta_to_benchmark(&[0.01, 0.02], &[0.01]).is_none());
    assert!(beta_to_benchmark(&[0.01, 0.02], &[0.005, 0.005]).is_none());
  }
}
