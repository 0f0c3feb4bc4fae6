// src/state/legacy_registry.rs

use std::collections::HashMap;

use crate::types::{Position, PositionId};

/// Positions still recorded in the pre-migration schema, keyed by id.
/// Supplied by the feed; only read by the migration flow.
#[derive(Debug, Default, Clone)]
pub struct LegacyRegistry {
    positions: HashMap<PositionId, Position>,
}

impl LegacyRegistry {
    pub fn new() -> Self {
        Self {
            positions: HashMap::new(),
        }
    }

    pub fn get(&self, id: PositionId) -> Option<&Position> {
        self.positions.get(&id)
    }

    pub fn contains(&self, id: PositionId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn upsert(&mut self, position: Position) {
        self.positions.insert(position.id, position);
    }

    pub fn remove(&mut self, id: PositionId) -> Option<Position> {
        self.positions.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PositionId, &Position)> {
        self.positions.iter()
    }
}

impl FromIterator<Position> for LegacyRegistry {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self {
            positions: iter.into_iter().map(|p| (p.id, p)).collect(),
        }
    }
}
