//! CDP position metrics and risk classification.
//!
//! Pure fixed-point calculations over an immutable parameter snapshot:
//! derive the metrics of a position (or a what-if proposal), classify its
//! safety, validate proposals, and guard one-time migrations of legacy
//! positions.

pub mod math;
pub mod oracle;
pub mod risk;
pub mod services;
pub mod state;
pub mod types;

pub use math::{ArithmeticError, CollateralRatio, FixedPoint, Ray, Rounding, Wad};
pub use oracle::{ParameterFeed, SystemParameters};
pub use risk::{RiskCfg, Status, ValidationError, classify, validate_proposal};
pub use services::{Metric, Metrics, MigrationError, compute_metrics, is_migration_eligible, migrate};
pub use types::{Address, LedgerSafety, Position, PositionId, ProposedAction};
