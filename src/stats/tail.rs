//! # Tail Risk and Concentration
//!
//! $$
//! \mathrm{CVaR}_\alpha = -\mathbb E\left[r \mid r \le q_\alpha\right]
//! $$
//!
//! Empirical Value at Risk / Conditional VaR and Herfindahl-style
//! concentration measures over a weight vector.

/// Empirical VaR and CVaR at tail probability `alpha`.
///
/// Returns are sorted ascending; VaR is the negated return at rank
/// `floor(alpha * n)` (clamped to a valid index) and CVaR is the negated
/// mean of every return at or below that quantile. An empty series yields
/// `(0.0, 0.0)`.
pub fn var_cvar(returns: &[f64], alpha: f64) -> (f64, f64) {
  if returns.is_empty() {
    return (0.0, 0.0);
  }

  let mut sorted = returns.to_vec();
  sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

  let idx = ((alpha * sorted.len() as f64).floor() as usize).min(sorted.len() - 1);
  let quantile = sorted[idx];

  let tail: Vec<f64> = sorted.iter().copied().filter(|r| *r <= quantile).collect();
  let tail_mean = tail.iter().sum::<f64>() / tail.len().max(1) as f64;

  (-quantile, -tail_mean)
}

/// Herfindahl-Hirschman concentration index, the sum of squared weights.
pub fn concentration_hhi(weights: &[f64]) -> f64 {
  weights.iter().map(|w| w * w).sum()
}

/// Effective number of holdings, `1 / HHI` (`0.0` when HHI is zero).
pub fn effective_n(weights: &[f64]) -> f64 {
  let hhi = concentration_hhi(weights);
  if hhi > 0.0 { 1.0 / hhi } else { 0.0 }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;

  use super::*;

  #[test]
  fn var_cvar_reference_scenario() {
    // sorted = [-0.05, -0.02, 0.0, 0.01, 0.03], rank floor(0.2 * 5) = 1
    let (var, cvar) = var_cvar(&[-0.05, -0.02, 0.0, 0.01, 0.03], 0.2);
    assert_relative_eq!(var, 0.02, epsilon = 1e-12);
    assert_relative_eq!(cvar, 0.035, epsilon = 1e-12);
  }

  #[test]
  fn var_cvar_empty_and_single() {
    assert_eq!(var_cvar(&[], 0.05), (0.0, 0.0));

    let (var, cvar) = var_cvar(&[-0.03], 0.05);
    assert_relative_eq!(var, 0.03, epsilon = 1e-12);
    assert_relative_eq!(cvar, 0.03, epsilon = 1e-12);
  }

  #[test]
  fn var_index_clamps_to_last_element() {
    let (var, _) = var_cvar(&[0.01, 0.02], 1.0);
    assert_relative_eq!(var, -0.02, epsilon = 1e-12);
  }

  #[test]
  fn hhi_and_effective_n() {
    assert_relative_eq!(concentration_hhi(&[0.5, 0.5]), 0.5, epsilon = 1e-12);
    assert_relative_eq!(effective_n(&[0.5, 0.5]), 2.0, epsilon = 1e-12);
    assert_relative_eq!(effective_n(&[0.25; 4]), 4.0, epsilon = 1e-12);
    assert_eq!(effective_n(&[0.0, 0.0]), 0.0);
    assert_eq!(effective_n(&[]), 0.0);
  }
}
