use tracing::{info, warn};

use crate::state::{LegacyRegistry, MigrationLedger};
use crate::types::{Position, PositionId};

pub use crate::state::MigrationError;

/// Transaction collaborator that performs the actual ledger write.
pub trait MigrationSubmitter {
    /// Submit the migration of `legacy` and return the id of the
    /// position created in the current schema.
    fn submit_migration(&self, legacy: &Position) -> Result<PositionId, String>;
}

/// A position can be migrated iff it is in the legacy format and the
/// legacy registry knows its id.
pub fn is_migration_eligible(position: &Position, registry: &LegacyRegistry) -> bool {
    position.legacy_format && registry.contains(position.id)
}

/// Legacy positions that still await migration, in ascending id order.
pub fn pending_migrations(registry: &LegacyRegistry, ledger: &MigrationLedger) -> Vec<PositionId> {
    let mut ids: Vec<PositionId> = registry
        .iter()
        .filter(|(id, p)| is_migration_eligible(p, registry) && ledger.record(**id).is_none())
        .map(|(id, _)| *id)
        .collect();
    ids.sort();
    ids
}

/// Migrate the legacy position `id`, at most once.
///
/// Precondition checks and bookkeeping only; the write itself is delegated
/// to `submitter`. A repeated call after success fails with
/// `AlreadyMigrated` and never reaches the submitter. A failed submission
/// releases the reservation so the user can retry.
pub fn migrate<S: MigrationSubmitter>(
    id: PositionId,
    registry: &LegacyRegistry,
    ledger: &mut MigrationLedger,
    submitter: &S,
) -> Result<PositionId, MigrationError> {
    ledger.ensure_unstarted(id)?;

    let legacy = registry
        .get(id)
        .filter(|p| is_migration_eligible(p, registry))
        .ok_or(MigrationError::NotEligible(id))?;

    ledger.begin(id)?;
    match submitter.submit_migration(legacy) {
        Ok(new_id) => {
            ledger.complete(id, new_id)?;
            info!(legacy = %id, new = %new_id, "position migrated");
            Ok(new_id)
        }
        Err(reason) => {
            ledger.abort(id);
            warn!(legacy = %id, %reason, "migration submission failed");
            Err(MigrationError::Submission { id, reason })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::FixedPoint;
    use crate::state::MigrationRecord;
    use crate::types::{Address, LedgerSafety};
    use std::cell::Cell;

    fn legacy(id: u64) -> Position {
        Position {
            id: PositionId(id),
            owner: Address([3; 20]),
            pledged_collateral: FixedPoint::from_integer(2),
            pooled_collateral: FixedPoint::from_integer(2),
            debt: FixedPoint::from_integer(100),
            closed: false,
            legacy_format: true,
            safety: LedgerSafety::Reported(true),
        }
    }

    /// Hands out fresh ids starting at 1000 and counts calls.
    #[derive(Default)]
    struct CountingSubmitter {
        calls: Cell<u64>,
    }

    impl MigrationSubmitter for CountingSubmitter {
        fn submit_migration(&self, _legacy: &Position) -> Result<PositionId, String> {
            let n = self.calls.get();
            self.calls.set(n + 1);
            Ok(PositionId(1000 + n))
        }
    }

    struct FailOnce {
        failed: Cell<bool>,
    }

    impl MigrationSubmitter for FailOnce {
        fn submit_migration(&self, legacy: &Position) -> Result<PositionId, String> {
            if !self.failed.replace(true) {
                return Err("user rejected signature".into());
            }
            Ok(PositionId(legacy.id.0 + 500))
        }
    }

    #[test]
    fn eligibility_needs_legacy_flag_and_registry_entry() {
        let registry: LegacyRegistry = [legacy(1)].into_iter().collect();
        assert!(is_migration_eligible(&legacy(1), &registry));
        assert!(!is_migration_eligible(&legacy(2), &registry));

        let mut current = legacy(1);
        current.legacy_format = false;
        assert!(!is_migration_eligible(&current, &registry));
    }

    #[test]
    fn second_migration_is_rejected_without_resubmitting() {
        let registry: LegacyRegistry = [legacy(1)].into_iter().collect();
        let mut ledger = MigrationLedger::new();
        let submitter = CountingSubmitter::default();

        let new_id = migrate(PositionId(1), &registry, &mut ledger, &submitter).unwrap();
        assert_eq!(new_id, PositionId(1000));

        assert_eq!(
            migrate(PositionId(1), &registry, &mut ledger, &submitter),
            Err(MigrationError::AlreadyMigrated {
                id: PositionId(1),
                new_id: PositionId(1000),
            })
        );
        assert_eq!(submitter.calls.get(), 1);
    }

    #[test]
    fn unknown_id_fails() {
        let registry: LegacyRegistry = [legacy(1)].into_iter().collect();
        let mut ledger = MigrationLedger::new();
        let submitter = CountingSubmitter::default();

        assert_eq!(
            migrate(PositionId(9), &registry, &mut ledger, &submitter),
            Err(MigrationError::NotEligible(PositionId(9)))
        );
        assert_eq!(submitter.calls.get(), 0);
        assert_eq!(ledger.record(PositionId(9)), None);
    }

    #[test]
    fn non_legacy_entry_fails() {
        let mut p = legacy(3);
        p.legacy_format = false;
        let registry: LegacyRegistry = [p].into_iter().collect();
        let mut ledger = MigrationLedger::new();
        assert_eq!(
            migrate(PositionId(3), &registry, &mut ledger, &CountingSubmitter::default()),
            Err(MigrationError::NotEligible(PositionId(3)))
        );
    }

    #[test]
    fn failed_submission_can_be_retried() {
        let registry: LegacyRegistry = [legacy(7)].into_iter().collect();
        let mut ledger = MigrationLedger::new();
        let submitter = FailOnce {
            failed: Cell::new(false),
        };

        let err = migrate(PositionId(7), &registry, &mut ledger, &submitter).unwrap_err();
        assert!(matches!(err, MigrationError::Submission { .. }));
        assert_eq!(ledger.record(PositionId(7)), None);

        let new_id = migrate(PositionId(7), &registry, &mut ledger, &submitter).unwrap();
        assert_eq!(new_id, PositionId(507));
        assert_eq!(
            ledger.record(PositionId(7)),
            Some(MigrationRecord::Migrated(PositionId(507)))
        );
    }

    #[test]
    fn in_flight_migration_blocks_a_second_call() {
        let registry: LegacyRegistry = [legacy(8)].into_iter().collect();
        let mut ledger = MigrationLedger::new();
        ledger.begin(PositionId(8)).unwrap();

        assert_eq!(
            migrate(PositionId(8), &registry, &mut ledger, &CountingSubmitter::default()),
            Err(MigrationError::InFlight(PositionId(8)))
        );
    }

    #[test]
    fn pending_list_skips_started_and_done() {
        let registry: LegacyRegistry = [legacy(1), legacy(2), legacy(3)].into_iter().collect();
        let mut ledger = MigrationLedger::new();
        ledger.mark_migrated(PositionId(2), PositionId(20));
        ledger.begin(PositionId(3)).unwrap();

        assert_eq!(pending_migrations(&registry, &ledger), vec![PositionId(1)]);
    }
}
