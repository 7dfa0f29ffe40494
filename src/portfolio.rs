//! # Portfolio Layer
//!
//! $$
//! \sigma_p^2 = \mathbf{w}^\top \Sigma \mathbf{w}
//! $$
//!
//! Weight normalization and aggregation, Euler risk decomposition, the two
//! allocation heuristics (minimum variance and risk parity), and the
//! rebalance blender with discrete trade generation.

pub mod aggregate;
pub mod optimize;
pub mod rebalance;
pub mod risk;
