use std::collections::HashMap;

use thiserror::Error;

use crate::types::PositionId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MigrationError {
    #[error("position {0} is not an eligible legacy position")]
    NotEligible(PositionId),

    #[error("position {id} was already migrated to {new_id}")]
    AlreadyMigrated { id: PositionId, new_id: PositionId },

    #[error("migration of position {0} is already in flight")]
    InFlight(PositionId),

    #[error("no migration of position {0} is in flight")]
    NotInFlight(PositionId),

    #[error("migration of position {id} was not submitted: {reason}")]
    Submission { id: PositionId, reason: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MigrationRecord {
    /// Handed to the transaction collaborator, outcome unknown.
    InFlight,
    /// Done; the legacy position is consumed.
    Migrated(PositionId),
}

/// At-most-once bookkeeping for legacy migrations. A legacy id moves
/// `(absent) -> InFlight -> Migrated`, or back to absent if the
/// submission fails.
#[derive(Debug, Default, Clone)]
pub struct MigrationLedger {
    records: HashMap<PositionId, MigrationRecord>,
}

impl MigrationLedger {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    pub fn record(&self, id: PositionId) -> Option<MigrationRecord> {
        self.records.get(&id).copied()
    }

    /// Fails if `id` is in flight or already migrated.
    pub fn ensure_unstarted(&self, id: PositionId) -> Result<(), MigrationError> {
        match self.record(id) {
            None => Ok(()),
            Some(MigrationRecord::InFlight) => Err(MigrationError::InFlight(id)),
            Some(MigrationRecord::Migrated(new_id)) => {
                Err(MigrationError::AlreadyMigrated { id, new_id })
            }
        }
    }

    /// Reserve `id` for a migration.
    pub fn begin(&mut self, id: PositionId) -> Result<(), MigrationError> {
        self.ensure_unstarted(id)?;
        self.records.insert(id, MigrationRecord::InFlight);
        Ok(())
    }

    pub fn complete(&mut self, id: PositionId, new_id: PositionId) -> Result<(), MigrationError> {
        match self.records.get_mut(&id) {
            Some(rec) if *rec == MigrationRecord::InFlight => {
                *rec = MigrationRecord::Migrated(new_id);
                Ok(())
            }
            _ => Err(MigrationError::NotInFlight(id)),
        }
    }

    /// Release an in-flight reservation so the migration can be retried.
    /// Completed migrations are never released.
    pub fn abort(&mut self, id: PositionId) -> bool {
        if self.records.get(&id) == Some(&MigrationRecord::InFlight) {
            self.records.remove(&id);
            return true;
        }
        false
    }

    /// Record a migration observed on the ledger (e.g. done in an earlier
    /// session).
    pub fn mark_migrated(&mut self, id: PositionId, new_id: PositionId) {
        self.records.insert(id, MigrationRecord::Migrated(new_id));
    }

    pub fn migrated_to(&self, id: PositionId) -> Option<PositionId> {
        match self.record(id) {
            Some(MigrationRecord::Migrated(new_id)) => Some(new_id),
            _ => None,
        }
    }

    pub fn is_migrated(&self, id: PositionId) -> bool {
        self.migrated_to(id).is_some()
    }

    pub fn in_flight(&self) -> impl Iterator<Item = PositionId> + '_ {
        self.records
            .iter()
            .filter(|(_, r)| **r == MigrationRecord::InFlight)
            .map(|(id, _)| *id)
    }
}
