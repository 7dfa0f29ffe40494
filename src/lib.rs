//! # quantfolio
//!
//! Portfolio risk and performance analytics over historical price series:
//! descriptive return/risk statistics, covariance estimation with shrinkage,
//! Euler risk decomposition, tail risk (VaR/CVaR), two allocation heuristics
//! (minimum variance, risk parity), and turnover-controlled rebalancing with
//! discrete trade generation.
//!
//! The crate is split into three layers:
//! - [`stats`] — pure statistics over numeric sequences and matrices.
//! - [`portfolio`] — aggregation, risk decomposition, optimizers, rebalance.
//! - [`snapshot`] — orchestration over aligned price data and holdings.
//!
//! All analytics functions are deterministic and synchronous. Degenerate
//! numeric inputs (empty series, zero variance, singular covariance) resolve
//! to documented sentinel values rather than errors; structural input
//! problems (missing price series, too few data points) fail at the
//! [`snapshot`] boundary with a descriptive error.

pub mod portfolio;
pub mod snapshot;
pub mod stats;
