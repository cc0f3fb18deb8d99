//! Patch building: detected changes become a replayable patch.

use codicil_types::{Change, Patch, PatchOp};

/// Build a patch from detected changes.
///
/// In safe mode only low-risk change kinds become operations (asset and
/// guardian add/modify); removals are excluded. Beneficiary changes carry
/// no replayable payload and are excluded in every mode. Excluded changes
/// still contribute their text to the summary, so the owner is informed
/// even when the automatic patch will not touch them, and are counted in
/// `excluded_change_count` so callers can tell "nothing changed" apart
/// from "changes were filtered".
#[must_use]
pub fn build_patch(changes: &[Change], safe_mode: bool) -> Patch {
    let mut ops = Vec::with_capacity(changes.len());
    let mut excluded = 0usize;

    for change in changes {
        match op_for(change, safe_mode) {
            Some(op) => ops.push(op),
            None => excluded += 1,
        }
    }

    let summary = changes
        .iter()
        .map(Change::describe)
        .collect::<Vec<_>>()
        .join("; ");

    Patch {
        ops,
        summary,
        safe_mode,
        excluded_change_count: excluded,
    }
}

fn op_for(change: &Change, safe_mode: bool) -> Option<PatchOp> {
    match change {
        Change::AssetAdded { asset } => Some(PatchOp::UpsertAsset {
            id: asset.id.clone(),
            asset: asset.to_record(),
        }),
        Change::AssetModified { id, after, .. } => Some(PatchOp::UpsertAsset {
            id: id.clone(),
            asset: after.to_record(),
        }),
        Change::AssetRemoved { id, .. } => {
            if safe_mode {
                None
            } else {
                Some(PatchOp::RemoveAsset { id: id.clone() })
            }
        }
        Change::GuardianAdded { guardian } => Some(PatchOp::UpsertGuardian {
            id: guardian.id.clone(),
            guardian: guardian.to_record(),
        }),
        Change::GuardianModified { id, after, .. } => Some(PatchOp::UpsertGuardian {
            id: id.clone(),
            guardian: after.to_record(),
        }),
        Change::GuardianRemoved { id, .. } => {
            if safe_mode {
                None
            } else {
                Some(PatchOp::RemoveGuardian { id: id.clone() })
            }
        }
        Change::BeneficiaryChanged { .. } => None,
    }
}
