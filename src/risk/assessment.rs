use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::oracle::{ParameterFeed, SystemParameters};
use crate::risk::{RiskCfg, Status, classify};
use crate::services::metrics::{Metrics, compute_metrics};
use crate::types::Position;

/// A position evaluated against one parameter snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub metrics: Metrics,
    pub status: Status,
}

/// Pull a snapshot from `feed` and evaluate `position` against it.
///
/// A feed that cannot produce a snapshot is treated as an empty, invalid
/// one: every price-dependent metric is pending and the status reads
/// `Unavailable` (or `Closed`).
pub fn assess_position<F: ParameterFeed>(feed: &F, position: &Position, cfg: &RiskCfg) -> Assessment {
    let params = feed.snapshot().unwrap_or_else(|err| {
        warn!(position = %position.id, %err, "parameter feed unavailable");
        SystemParameters::default()
    });
    let metrics = compute_metrics(position, &params, cfg);
    let status = classify(position, &metrics, &params, cfg);
    Assessment { metrics, status }
}
