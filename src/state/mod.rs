pub mod legacy_registry;
pub mod migration_ledger;

pub use legacy_registry::LegacyRegistry;
pub use migration_ledger::{MigrationError, MigrationLedger, MigrationRecord};
