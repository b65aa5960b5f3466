//! Periodic background jobs.

mod pool_metrics;
mod scheduler;
mod store_probe;

pub use pool_metrics::PoolMetricsJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
pub use store_probe::StoreProbeJob;
