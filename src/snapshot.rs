//! # Snapshot Orchestration
//!
//! $$
//! \mathrm{Snapshot} = f(\mathrm{prices},\ \mathrm{holdings},\ \mathrm{config})
//! $$
//!
//! The boundary layer over the pure analytics: given aligned close prices
//! and a holdings specification it produces an immutable metrics / series /
//! risk bundle, or a rebalance plan with blended weights and trades.
//! Structural input problems (missing series, too few data points) are the
//! only errors raised; numeric degeneracy inside the analytics resolves to
//! sentinel values.

pub mod engine;
pub mod types;

pub use engine::compute_snapshot;
pub use engine::plan_rebalance;
pub use types::AlignedCloses;
pub use types::Holdings;
pub use types::HoldingsMode;
pub use types::Objective;
pub use types::RebalanceParams;
pub use types::RebalancePlan;
pub use types::Snapshot;
pub use types::SnapshotConfig;
