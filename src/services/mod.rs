pub mod fees;
pub mod metrics;
pub mod migration;

pub use metrics::{Metric, Metrics, compute_metrics};
pub use migration::{MigrationError, MigrationSubmitter, is_migration_eligible, migrate, pending_migrations};
