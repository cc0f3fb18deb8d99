//! Read-only ground truth supplied by out-of-scope subsystems.
//!
//! Fetched fresh on each detection cycle; has no lifecycle of its own.

use serde::{Deserialize, Serialize};

use crate::ids::{AssetId, BeneficiaryId, GuardianId};
use crate::snapshot::{AssetRecord, GuardianRecord};

/// Registry status of an external asset. Archived assets are never proposed
/// for addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    Active,
    Archived,
}

impl AssetStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "active" => Some(Self::Active),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalAsset {
    pub id: AssetId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    pub status: AssetStatus,
}

impl ExternalAsset {
    /// The will-side record this asset would be stored as.
    #[must_use]
    pub fn to_record(&self) -> AssetRecord {
        AssetRecord {
            title: self.title.clone(),
            description: self.description.clone(),
            value: self.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalGuardian {
    pub id: GuardianId,
    pub name: String,
    pub relationship: String,
    pub priority: i64,
    pub is_child_guardian: bool,
}

impl ExternalGuardian {
    #[must_use]
    pub fn to_record(&self) -> GuardianRecord {
        GuardianRecord {
            name: self.name.clone(),
            relationship: self.relationship.clone(),
            priority: self.priority,
            is_child_guardian: self.is_child_guardian,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalBeneficiary {
    pub id: BeneficiaryId,
    pub name: String,
    pub relationship: String,
}

/// The full external projection diffed against a snapshot.
///
/// The beneficiary list is supplied empty by today's providers; see the
/// engine's `supports_beneficiary_diff` capability flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalState {
    pub assets: Vec<ExternalAsset>,
    pub beneficiaries: Vec<ExternalBeneficiary>,
    pub guardians: Vec<ExternalGuardian>,
}
