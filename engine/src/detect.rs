//! Change detection: keyed diff of a snapshot against external state.

use std::collections::BTreeMap;

use codicil_types::{AssetStatus, Change, ExternalState, WillSnapshot};

/// Fixed sentinel meaning "no proposal needed". Callers compare against
/// this, so the text is part of the contract.
pub const NO_CHANGES_SUMMARY: &str = "No relevant changes detected";

/// Detector output for one detection cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedChanges {
    pub changes: Vec<Change>,
    pub summary: String,
}

impl DetectedChanges {
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Diff a snapshot against external ground truth.
///
/// Total over well-formed inputs; never fails. Asset and guardian
/// dimensions are keyed set-differences on the registry id; beneficiaries
/// are diffed only when `supports_beneficiary_diff` is set (external
/// projections supply an empty beneficiary list today).
#[must_use]
pub fn detect_changes(
    snapshot: &WillSnapshot,
    external: &ExternalState,
    supports_beneficiary_diff: bool,
) -> DetectedChanges {
    let mut changes = Vec::new();

    diff_assets(snapshot, external, &mut changes);
    diff_guardians(snapshot, external, &mut changes);
    if supports_beneficiary_diff {
        diff_beneficiaries(snapshot, external, &mut changes);
    }

    let summary = if changes.is_empty() {
        NO_CHANGES_SUMMARY.to_string()
    } else {
        changes
            .iter()
            .map(Change::describe)
            .collect::<Vec<_>>()
            .join("; ")
    };

    tracing::debug!(
        will = %snapshot.id,
        changes = changes.len(),
        "detection cycle complete"
    );

    DetectedChanges { changes, summary }
}

fn diff_assets(snapshot: &WillSnapshot, external: &ExternalState, changes: &mut Vec<Change>) {
    let known = &snapshot.content.assets;
    let external_ids: BTreeMap<_, _> = external.assets.iter().map(|a| (&a.id, a)).collect();

    for asset in &external.assets {
        match known.get(&asset.id) {
            None => {
                // Archived registry entries are never proposed for addition.
                if asset.status == AssetStatus::Active {
                    changes.push(Change::AssetAdded {
                        asset: asset.clone(),
                    });
                }
            }
            Some(recorded) => {
                let materially_different = recorded.title != asset.title
                    || recorded.description != asset.description
                    || recorded.value != asset.value;
                if materially_different {
                    changes.push(Change::AssetModified {
                        id: asset.id.clone(),
                        before: recorded.clone(),
                        after: asset.clone(),
                    });
                }
            }
        }
    }

    for (id, recorded) in known {
        if !external_ids.contains_key(id) {
            changes.push(Change::AssetRemoved {
                id: id.clone(),
                previous: recorded.clone(),
            });
        }
    }
}

fn diff_guardians(snapshot: &WillSnapshot, external: &ExternalState, changes: &mut Vec<Change>) {
    let appointed = &snapshot.content.guardianship.guardians;
    let external_ids: BTreeMap<_, _> = external.guardians.iter().map(|g| (&g.id, g)).collect();

    for guardian in &external.guardians {
        match appointed.get(&guardian.id) {
            None => changes.push(Change::GuardianAdded {
                guardian: guardian.clone(),
            }),
            Some(recorded) => {
                let materially_different = recorded.name != guardian.name
                    || recorded.relationship != guardian.relationship
                    || recorded.priority != guardian.priority;
                if materially_different {
                    changes.push(Change::GuardianModified {
                        id: guardian.id.clone(),
                        before: recorded.clone(),
                        after: guardian.clone(),
                    });
                }
            }
        }
    }

    for (id, recorded) in appointed {
        if !external_ids.contains_key(id) {
            changes.push(Change::GuardianRemoved {
                id: id.clone(),
                previous: recorded.clone(),
            });
        }
    }
}

fn diff_beneficiaries(
    snapshot: &WillSnapshot,
    external: &ExternalState,
    changes: &mut Vec<Change>,
) {
    let recorded = &snapshot.content.beneficiaries;

    for beneficiary in &external.beneficiaries {
        if !recorded.iter().any(|b| b.id == beneficiary.id) {
            changes.push(Change::BeneficiaryChanged {
                detail: format!(
                    "Beneficiary \"{}\" is not recorded in the will",
                    beneficiary.name
                ),
            });
        }
    }
    for beneficiary in recorded {
        if !external.beneficiaries.iter().any(|b| b.id == beneficiary.id) {
            changes.push(Change::BeneficiaryChanged {
                detail: format!(
                    "Beneficiary \"{}\" is no longer present in external records",
                    beneficiary.name
                ),
            });
        }
    }
}
