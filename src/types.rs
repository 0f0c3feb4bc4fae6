// src/types.rs
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::math::{FixedPoint, Wad};

/// Raw collateral, pooled collateral and debt amounts.
pub type TokenAmount = FixedPoint<Wad>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PositionId(pub u64);

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ledger account. The zero address marks a position whose ownership
/// has been released.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0; 20]);

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// The ledger's own verdict on whether a position is above its
/// liquidation threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerSafety {
    /// Not fetched yet.
    #[default]
    NotLoaded,
    /// Fetched, but the ledger could not answer (e.g. no price).
    Unresolved,
    Reported(bool),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,

    pub owner: Address,

    /// Raw collateral the user deposited.
    pub pledged_collateral: TokenAmount,

    /// Collateral in pooled units ("ink"), as recorded by the ledger.
    pub pooled_collateral: TokenAmount,

    pub debt: TokenAmount,

    pub closed: bool,

    pub legacy_format: bool,

    #[serde(default)]
    pub safety: LedgerSafety,
}

impl Position {
    /// Closed once flagged as such or once its owner has been cleared.
    pub fn is_closed(&self) -> bool {
        self.closed || self.owner.is_zero()
    }
}

/// What-if input: a deposit of raw collateral and a debt draw to preview
/// before anything is submitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedAction {
    pub collateral: TokenAmount,
    pub debt: TokenAmount,
}

/// Either an existing position or a proposal, as input to the metrics
/// calculator.
#[derive(Clone, Copy, Debug)]
pub enum Subject<'a> {
    Position(&'a Position),
    Proposal(&'a ProposedAction),
}

impl Subject<'_> {
    pub fn debt(&self) -> TokenAmount {
        match self {
            Subject::Position(p) => p.debt,
            Subject::Proposal(a) => a.debt,
        }
    }
}

impl<'a> From<&'a Position> for Subject<'a> {
    fn from(p: &'a Position) -> Self {
        Subject::Position(p)
    }
}

impl<'a> From<&'a ProposedAction> for Subject<'a> {
    fn from(a: &'a ProposedAction) -> Self {
        Subject::Proposal(a)
    }
}
