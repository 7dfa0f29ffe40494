//! # Statistics Core
//!
//! $$
//! \sigma_{\mathrm{ann}} = \sigma_{\mathrm{daily}}\sqrt{252}
//! $$
//!
//! Pure descriptive statistics over historical return series and covariance
//! matrices. Every function has an explicit policy for degenerate input
//! (empty series, zero variance, non-positive prices) and never panics.

pub mod matrix;
pub mod returns;
pub mod tail;

/// Trading days per year, used by all annualization.
pub const TRADING_DAYS: f64 = 252.0;

pub(crate) fn sample_mean(xs: &[f64]) -> f64 {
  if xs.is_empty() {
    0.0
  } else {
    xs.iter().sum::<f64>() / xs.len() as f64
  }
}
