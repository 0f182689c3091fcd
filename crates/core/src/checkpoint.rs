//! Tracks which builder operations the caller has explicitly invoked.
//!
//! An unset field and a field explicitly set to an empty collection are
//! different things: the first is auto-resolved during `build`, the second
//! must be honored as-is. The checkpoint set records the caller's explicit
//! calls so the orchestrator can tell the two apart.

use std::collections::BTreeSet;

/// Names of the builder's public mutating operations.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[allow(missing_docs)]
pub enum Checkpoint {
    SendAssets,
    SendLovelace,
    SendToken,
    SendValue,
    SetChangeAddress,
    SetCollateral,
    SetMetadata,
    SetRequiredSigners,
    SetTimeToStart,
    SetTimeToExpire,
    SetTxInputs,
    RedeemValue,
    AddMint,
    AddCertificate,
    AddWithdrawal,
}

/// The set of operations explicitly invoked on one builder instance.
///
/// Append-only: once marked, an operation stays visited for the instance's
/// lifetime. Instances never share state.
#[derive(Clone, Debug, Default)]
pub struct Checkpoints {
    visited: BTreeSet<Checkpoint>,
}

impl Checkpoints {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `op` was invoked. Re-marking is a no-op.
    pub fn mark(&mut self, op: Checkpoint) {
        self.visited.insert(op);
    }

    /// True if `op` was ever invoked on this instance.
    pub fn visited(&self, op: Checkpoint) -> bool {
        self.visited.contains(&op)
    }
}
