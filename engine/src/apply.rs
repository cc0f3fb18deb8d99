//! Patch application: a pure transformation of document content.

use codicil_types::{Patch, PatchOp, WillContent};

/// Result of applying a patch.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedPatch {
    pub next: WillContent,
    /// Operations that targeted a no-longer-present entity and were
    /// skipped. See the policy note on [`apply_patch`].
    pub skipped_ops: usize,
}

/// Apply `patch` to `current`, producing the next content.
///
/// Never touches storage; operations are applied in list order.
///
/// Policy: an operation targeting an entity that no longer exists (e.g.
/// removing an asset a concurrent process already dropped) is skipped and
/// counted in `skipped_ops` rather than failing the whole apply. Upserts
/// insert-or-replace by definition and never skip, which makes
/// upsert-only patches idempotent.
#[must_use]
pub fn apply_patch(current: &WillContent, patch: &Patch) -> AppliedPatch {
    let mut next = current.clone();
    let mut skipped = 0usize;

    for op in &patch.ops {
        match op {
            PatchOp::UpsertAsset { id, asset } => {
                next.assets.insert(id.clone(), asset.clone());
            }
            PatchOp::RemoveAsset { id } => {
                if next.assets.remove(id).is_none() {
                    skipped += 1;
                }
            }
            PatchOp::UpsertGuardian { id, guardian } => {
                next.guardianship.guardians.insert(id.clone(), guardian.clone());
            }
            PatchOp::RemoveGuardian { id } => {
                if next.guardianship.guardians.remove(id).is_none() {
                    skipped += 1;
                }
            }
        }
    }

    AppliedPatch {
        next,
        skipped_ops: skipped,
    }
}
