//! A structured, replayable set of operations derived from detected changes.

use serde::{Deserialize, Serialize};

use crate::ids::{AssetId, GuardianId};
use crate::snapshot::{AssetRecord, GuardianRecord};

/// One replayable apply-operation.
///
/// Beneficiary changes have no op variant: external beneficiary data carries
/// no replayable payload, so those changes are summary-only in every mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PatchOp {
    UpsertAsset { id: AssetId, asset: AssetRecord },
    RemoveAsset { id: AssetId },
    UpsertGuardian { id: GuardianId, guardian: GuardianRecord },
    RemoveGuardian { id: GuardianId },
}

impl PatchOp {
    /// Whether this op belongs to the safe-mode allow-list (upserts only;
    /// removals are considered high-risk).
    #[must_use]
    pub fn is_safe(&self) -> bool {
        match self {
            Self::UpsertAsset { .. } | Self::UpsertGuardian { .. } => true,
            Self::RemoveAsset { .. } | Self::RemoveGuardian { .. } => false,
        }
    }
}

/// Immutable once built; referenced by exactly one proposal.
///
/// The summary may mention more than the ops change: safe mode drops
/// high-risk changes from `ops` while keeping their text in `summary` so
/// the owner is still informed. `excluded_change_count` lets callers tell
/// "nothing changed" apart from "changes were filtered for safety".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    pub ops: Vec<PatchOp>,
    pub summary: String,
    pub safe_mode: bool,
    pub excluded_change_count: usize,
}

impl Patch {
    /// Invariant check: every op in a safe-mode patch is allow-listed.
    #[must_use]
    pub fn upholds_safe_mode(&self) -> bool {
        !self.safe_mode || self.ops.iter().all(PatchOp::is_safe)
    }
}
