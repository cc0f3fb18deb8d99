//! The live, legally-relevant content of a will document.
//!
//! A [`WillSnapshot`] is owned exclusively by the document store; the change
//! detector and patch applier only ever see copies. Mutation goes through
//! the lifecycle manager.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::{AssetId, BeneficiaryId, GuardianId, OwnerId, VersionNumber, WillId};

/// An asset as recorded in the will itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// A named beneficiary in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeneficiaryRecord {
    pub id: BeneficiaryId,
    pub name: String,
    pub relationship: String,
}

/// An appointed guardian as recorded in the will.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianRecord {
    pub name: String,
    pub relationship: String,
    /// Emergency contact rank; lower means contacted first.
    pub priority: i64,
    pub is_child_guardian: bool,
}

/// The guardianship section of the document: appointed guardians keyed by
/// their registry id, plus free-form instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianshipRecord {
    pub guardians: BTreeMap<GuardianId, GuardianRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

/// Everything the patch applier operates on. This is the payload persisted
/// per version and swapped wholesale on rollback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WillContent {
    pub assets: BTreeMap<AssetId, AssetRecord>,
    pub beneficiaries: Vec<BeneficiaryRecord>,
    pub guardianship: GuardianshipRecord,
}

/// The live document: content plus identity and the current version pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WillSnapshot {
    pub id: WillId,
    pub owner_id: OwnerId,
    pub content: WillContent,
    pub version: VersionNumber,
}
