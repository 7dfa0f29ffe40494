//! # Risk Decomposition
//!
//! $$
//! \mathrm{RC}_i = \frac{w_i (\Sigma \mathbf{w})_i}{\mathbf{w}^\top \Sigma \mathbf{w}}
//! $$
//!
//! Portfolio variance and the Euler decomposition of that variance into
//! per-asset contribution shares.

/// Portfolio variance `w' C w`.
pub fn portfolio_variance(weights: &[f64], cov: &[Vec<f64>]) -> f64 {
  let n = weights.len().min(cov.len());
  let mut sum = 0.0;
  for i in 0..n {
    for j in 0..n {
      sum += weights[i] * cov[i].get(j).copied().unwrap_or(0.0) * weights[j];
    }
  }
  sum
}

/// Portfolio volatility, the square root of [`portfolio_variance`].
pub fn portfolio_vol(weights: &[f64], cov: &[Vec<f64>]) -> f64 {
  portfolio_variance(weights, cov).max(0.0).sqrt()
}

/// Per-asset share of total portfolio variance.
///
/// Shares are `w_i * (C w)_i / (w' C w)` and sum to 1 by the Euler identity
/// for the quadratic form. A non-positive portfolio variance yields an
/// all-zero vector, signaling the degenerate case without a division error.
pub fn risk_contributions(weights: &[f64], cov: &[Vec<f64>]) -> Vec<f64> {
  let port_var = portfolio_variance(weights, cov);
  if port_var <= 0.0 {
    return vec![0.0; weights.len()];
  }

  let n = weights.len().min(cov.len());
  let mut marginal = vec![0.0; weights.len()];
  for i in 0..n {
    for j in 0..n {
      marginal[i] += cov[i].get(j).copied().unwrap_or(0.0) * weights[j];
    }
  }

  weights
    .iter()
    .zip(marginal.iter())
    .map(|(w, m)| w * m / port_var)
    .collect()
}
