//! One atomic detected difference between a snapshot and external state.
//!
//! This is a closed enum: every (entity, kind) pair the detector can emit
//! has its own variant, so downstream policy (safe-mode filtering, patch
//! construction) is an exhaustive match rather than a string lookup.
//! Changes are ephemeral; they exist only within a single
//! detection-to-patch cycle and are never persisted.

use std::fmt;

use crate::external::{ExternalAsset, ExternalGuardian};
use crate::ids::{AssetId, GuardianId};
use crate::snapshot::{AssetRecord, GuardianRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Asset,
    Guardian,
    Beneficiary,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asset => "asset",
            Self::Guardian => "guardian",
            Self::Beneficiary => "beneficiary",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    AssetAdded {
        asset: ExternalAsset,
    },
    AssetRemoved {
        id: AssetId,
        previous: AssetRecord,
    },
    AssetModified {
        id: AssetId,
        before: AssetRecord,
        after: ExternalAsset,
    },
    GuardianAdded {
        guardian: ExternalGuardian,
    },
    GuardianRemoved {
        id: GuardianId,
        previous: GuardianRecord,
    },
    GuardianModified {
        id: GuardianId,
        before: GuardianRecord,
        after: ExternalGuardian,
    },
    /// Beneficiary drift. Carries prose only: external beneficiary data has
    /// no replayable payload today, so this never becomes a patch op.
    BeneficiaryChanged {
        detail: String,
    },
}

impl Change {
    #[must_use]
    pub fn kind(&self) -> ChangeKind {
        match self {
            Self::AssetAdded { .. } | Self::GuardianAdded { .. } => ChangeKind::Added,
            Self::AssetRemoved { .. } | Self::GuardianRemoved { .. } => ChangeKind::Removed,
            Self::AssetModified { .. }
            | Self::GuardianModified { .. }
            | Self::BeneficiaryChanged { .. } => ChangeKind::Modified,
        }
    }

    #[must_use]
    pub fn entity(&self) -> EntityKind {
        match self {
            Self::AssetAdded { .. } | Self::AssetRemoved { .. } | Self::AssetModified { .. } => {
                EntityKind::Asset
            }
            Self::GuardianAdded { .. }
            | Self::GuardianRemoved { .. }
            | Self::GuardianModified { .. } => EntityKind::Guardian,
            Self::BeneficiaryChanged { .. } => EntityKind::Beneficiary,
        }
    }

    /// Human-readable fragment used to assemble proposal summaries.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::AssetAdded { asset } => {
                format!("New asset \"{}\" can be added to the will", asset.title)
            }
            Self::AssetRemoved { previous, .. } => format!(
                "Asset \"{}\" is no longer present in the registry",
                previous.title
            ),
            Self::AssetModified { after, .. } => {
                format!("Details of asset \"{}\" have changed", after.title)
            }
            Self::GuardianAdded { guardian } => {
                format!("New guardian \"{}\" can be added to the will", guardian.name)
            }
            Self::GuardianRemoved { previous, .. } => format!(
                "Guardian \"{}\" is no longer present in the directory",
                previous.name
            ),
            Self::GuardianModified { after, .. } => {
                format!("Details of guardian \"{}\" have changed", after.name)
            }
            Self::BeneficiaryChanged { detail } => detail.clone(),
        }
    }
}
