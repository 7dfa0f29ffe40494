//! # Allocation Heuristics
//!
//! $$
//! \mathbf{w}_{\mathrm{mv}} \propto \Sigma^{-1}\mathbf{1}
//! $$
//!
//! Two state-free weight generators over a covariance matrix: the global
//! minimum-variance solution via explicit inversion, and an iterative
//! risk-parity rescaling scheme. Both are deterministic, long-only
//! heuristics with an optional per-asset weight cap.

use tracing::warn;

use super::risk::risk_contributions;
use crate::stats::matrix::invert_matrix;

/// Denominator magnitude below which the weight sum counts as degenerate.
const DENOM_EPS: f64 = 1e-12;
/// Floor keeping risk-parity weights strictly positive between iterations.
const WEIGHT_FLOOR: f64 = 1e-10;
/// Maximum cap-and-renormalize passes for the max-weight constraint.
const CAP_PASSES: usize = 50;
/// Default risk-parity iteration count; fixed for reproducible outputs.
const RISK_PARITY_ITERATIONS: usize = 200;
/// Default exponent on the risk-parity rescaling ratio.
const RISK_PARITY_STEP: f64 = 0.5;

fn equal_weights(n: usize) -> Vec<f64> {
  vec![1.0 / n as f64; n]
}

/// A cap is only honored when it is a meaningful fraction in `(0, 1)`.
fn effective_cap(max_weight: Option<f64>) -> Option<f64> {
  max_weight.filter(|mw| *mw > 0.0 && *mw < 1.0)
}

/// Global minimum-variance weights, long-only heuristic.
///
/// Solves the unconstrained problem as `Σ⁻¹·1` normalized by its sum, then
/// clips negative weights to zero and renormalizes. A singular covariance
/// matrix or near-zero weight-sum denominator falls back to equal weights
/// rather than failing. The optional `max_weight` cap (effective in
/// `(0, 1)`) is applied by up to 50 cap-and-renormalize passes; it is not
/// guaranteed to hold exactly when `max_weight * n < 1`.
pub fn min_variance_weights(cov: &[Vec<f64>], max_weight: Option<f64>) -> Vec<f64> {
  let n = cov.len();
  if n == 0 {
    return Vec::new();
  }

  let mut weights = match invert_matrix(cov) {
    Some(inv) => {
      let inv_ones: Vec<f64> = inv.iter().map(|row| row.iter().sum()).collect();
      let denom: f64 = inv_ones.iter().sum();
      if denom.abs() < DENOM_EPS {
        equal_weights(n)
      } else {
        inv_ones.iter().map(|v| v / denom).collect()
      }
    }
    None => {
      warn!(assets = n, "singular covariance matrix, falling back to equal weights");
      equal_weights(n)
    }
  };

  // long-only: clip shorts, renormalize below
  for w in weights.iter_mut() {
    *w = w.max(0.0);
  }

  if let Some(mw) = effective_cap(max_weight) {
    for _ in 0..CAP_PASSES {
      if !weights.iter().any(|w| *w > mw + 1e-9) {
        break;
      }
      for w in weights.iter_mut() {
        *w = w.min(mw);
      }
      let sum: f64 = weights.iter().sum();
      if sum > 0.0 {
        for w in weights.iter_mut() {
          *w /= sum;
        }
      }
    }
  }

  let sum: f64 = weights.iter().sum();
  if sum > 0.0 {
    weights.iter_mut().for_each(|w| *w /= sum);
    weights
  } else {
    equal_weights(n)
  }
}

/// Risk-parity weights with the default iteration count and step.
///
/// See [`risk_parity_weights_with`]; defaults are 200 iterations with a 0.5
/// exponent, matching the reference outputs.
pub fn risk_parity_weights(cov: &[Vec<f64>], max_weight: Option<f64>) -> Vec<f64> {
  risk_parity_weights_with(cov, max_weight, RISK_PARITY_ITERATIONS, RISK_PARITY_STEP)
}

/// Iterative risk-parity weights.
///
/// Starts from equal weights and on each pass rescales every weight by
/// `(target / actual)^step`, where `target = 1/n` is the equalized risk
/// contribution share. Weights are floored at `1e-10` so a collapsed asset
/// keeps a defined ratio on later passes, optionally capped, then
/// renormalized. The loop runs the full `iterations` count with no
/// convergence check, trading a few spare passes for determinism.
pub fn risk_parity_weights_with(
  cov: &[Vec<f64>],
  max_weight: Option<f64>,
  iterations: usize,
  step: f64,
) -> Vec<f64> {
  let n = cov.len();
  if n == 0 {
    return Vec::new();
  }

  let cap = effective_cap(max_weight);
  let target = 1.0 / n as f64;
  let mut weights = equal_weights(n);

  for _ in 0..iterations {
    let rc = risk_contributions(&weights, cov);

    for (w, c) in weights.iter_mut().zip(rc.iter()) {
      let ratio = if *c > WEIGHT_FLOOR { target / c } else { 1.0 };
      *w = (*w * ratio.powf(step)).max(WEIGHT_FLOOR);
    }

    if let Some(mw) = cap {
      for w in weights.iter_mut() {
        *w = w.min(mw);
      }
    }

    let sum: f64 = weights.iter().sum();
    for w in weights.iter_mut() {
      *w /= sum;
    }
  }

  weights
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;

  use super::*;

  fn diagonal_cov() -> Vec<Vec<f64>> {
    vec![vec![0.04, 0.0], vec![0.0, 0.01]]
  }

  #[test]
  fn min_variance_diagonal_weights_by_inverse_variance() {
    let w = min_variance_weights(&diagonal_cov(), None);
    assert_relative_eq!(w[0], 0.2, epsilon = 1e-9);
    assert_relative_eq!(w[1], 0.8, epsilon = 1e-9);
  }

  #[test]
  fn min_variance_singular_matrix_falls_back_to_equal() {
    let singular = vec![vec![0.01, 0.01], vec![0.01, 0.01]];
    let w = min_variance_weights(&singular, None);
    assert_relative_eq!(w[0], 0.5, epsilon = 1e-12);
    assert_relative_eq!(w[1], 0.5, epsilon = 1e-12);
  }

  #[test]
  fn min_variance_respects_cap() {
    let w = min_variance_weights(&diagonal_cov(), Some(0.6));
    assert!(w[1] <= 0.6 + 1e-9);
    assert_relative_eq!(w.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
  }

  #[test]
  fn min_variance_ignores_out_of_range_cap() {
    let capped = min_variance_weights(&diagonal_cov(), Some(1.5));
    let free = min_variance_weights(&diagonal_cov(), None);
    assert_eq!(capped, free);
  }

  #[test]
  fn min_variance_empty_input() {
    assert!(min_variance_weights(&[], None).is_empty());
  }

  #[test]
  fn risk_parity_diagonal_weights_by_inverse_volatility() {
    // vols 0.2 and 0.1, so equal risk contribution wants weights 1:2
    let w = risk_parity_weights(&diagonal_cov(), None);
    assert_relative_eq!(w[0], 1.0 / 3.0, epsilon = 1e-6);
    assert_relative_eq!(w[1], 2.0 / 3.0, epsilon = 1e-6);

    let rc = risk_contributions(&w, &diagonal_cov());
    assert_relative_eq!(rc[0], 0.5, epsilon = 1e-6);
    assert_relative_eq!(rc[1], 0.5, epsilon = 1e-6);
  }

  #[test]
  fn risk_parity_is_deterministic() {
    let cov = vec![
      vec![0.04, 0.006, 0.002],
      vec![0.006, 0.01, 0.001],
      vec![0.002, 0.001, 0.025],
    ];
    let a = risk_parity_weights(&cov, Some(0.5));
    let b = risk_parity_weights(&cov, Some(0.5));
    assert_eq!(a, b);
    assert_relative_eq!(a.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
  }

  #[test]
  fn risk_parity_cap_pulls_weights_together() {
    // The cap is applied before renormalization, so the final weights may
    // sit slightly above it; it still has to pull mass off the heavy asset.
    let free = risk_parity_weights(&diagonal_cov(), None);
    let capped = risk_parity_weights(&diagonal_cov(), Some(0.55));
    assert!(capped[1] < free[1]);
    assert_relative_eq!(capped.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
  }

  #[test]
  fn risk_parity_empty_input() {
    assert!(risk_parity_weights(&[], None).is_empty());
  }
}
