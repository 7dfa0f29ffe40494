//! # Covariance Estimation
//!
//! $$
//! \Sigma_{ij} = \frac{1}{n-1}\sum_k (r_{ik}-\bar r_i)(r_{jk}-\bar r_j)
//! $$
//!
//! Sample covariance and correlation matrices, shrinkage toward the
//! diagonal, and Gauss-Jordan matrix inversion. Matrices are dense
//! `Vec<Vec<f64>>`, indexed by the caller's asset ordering.

use super::sample_mean;

/// Pivot magnitude below which a matrix is treated as singular.
const PIVOT_EPS: f64 = 1e-12;

/// Sample covariance matrix of aligned return series (divisor `n - 1`).
///
/// Each unordered pair is computed once and mirrored, so the result is
/// symmetric by construction. Series shorter than two observations produce
/// `0.0` entries. Row/column order matches the input slice order.
pub fn covariance_matrix(returns_by_asset: &[Vec<f64>]) -> Vec<Vec<f64>> {
  let n = returns_by_asset.len();
  let mut matrix = vec![vec![0.0; n]; n];
  let means: Vec<f64> = returns_by_asset.iter().map(|r| sample_mean(r)).collect();

  for i in 0..n {
    for j in i..n {
      let len = returns_by_asset[i].len().min(returns_by_asset[j].len());
      let cov = if len > 1 {
        let mut acc = 0.0;
        for k in 0..len {
          acc += (returns_by_asset[i][k] - means[i]) * (returns_by_asset[j][k] - means[j]);
        }
        acc / (len - 1) as f64
      } else {
        0.0
      };
      matrix[i][j] = cov;
      matrix[j][i] = cov;
    }
  }

  matrix
}

/// Correlation matrix derived from a covariance matrix.
///
/// Entries are `cov[i][j] / (std_i * std_j)` clamped to `[-1, 1]`, or `0.0`
/// wherever either standard deviation is zero.
pub fn correlation_matrix(cov: &[Vec<f64>]) -> Vec<Vec<f64>> {
  let n = cov.len();
  let std: Vec<f64> = (0..n).map(|i| cov[i][i].max(0.0).sqrt()).collect();
  let mut out = vec![vec![0.0; n]; n];

  for i in 0..n {
    for j in 0..n {
      let denom = std[i] * std[j];
      out[i][j] = if denom > 0.0 {
        (cov[i][j] / denom).clamp(-1.0, 1.0)
      } else {
        0.0
      };
    }
  }

  out
}

/// Shrink off-diagonal covariance entries toward zero.
///
/// `shrinkage` is clamped into `[0, 1]`; diagonal variances are left
/// untouched. This is a uniform shrinkage-toward-diagonal transform, a
/// deliberate simplification of estimators like Ledoit-Wolf that pick the
/// intensity from the data.
pub fn shrink_covariance(cov: &[Vec<f64>], shrinkage: f64) -> Vec<Vec<f64>> {
  let s = shrinkage.clamp(0.0, 1.0);
  let mut out: Vec<Vec<f64>> = cov.to_vec();

  for (i, row) in out.iter_mut().enumerate() {
    for (j, entry) in row.iter_mut().enumerate() {
      if i != j {
        *entry *= 1.0 - s;
      }
    }
  }

  out
}

/// Invert a square matrix by Gauss-Jordan elimination with partial pivoting.
///
/// Works on a copy of the input augmented with the identity. Returns `None`
/// when any pivot magnitude falls below `1e-12`; near-collinear asset
/// returns make singularity an expected outcome, so it is a value rather
/// than an error.
pub fn invert_matrix(matrix: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
  let n = matrix.len();
  let mut aug: Vec<Vec<f64>> = matrix
    .iter()
    .enumerate()
    .map(|(i, row)| {
      let mut r = row.clone();
      r.resize(n, 0.0);
      for j in 0..n {
        r.push(if i == j { 1.0 } else { 0.0 });
      }
      r
    })
    .collect();

  for i in 0..n {
    let mut max_row = i;
    for k in i + 1..n {
      if aug[k][i].abs() > aug[max_row][i].abs() {
        max_row = k;
      }
    }
    aug.swap(i, max_row);

    let pivot = aug[i][i];
    if pivot.abs() < PIVOT_EPS {
      return None;
    }

    for j in 0..2 * n {
      aug[i][j] /= pivot;
    }

    for k in 0..n {
      if k == i {
        continue;
      }
      let factor = aug[k][i];
      for j in 0..2 * n {
        aug[k][j] -= factor * aug[i][j];
      }
    }
  }

  Some(aug.into_iter().map(|row| row[n..].to_vec()).collect())
}
