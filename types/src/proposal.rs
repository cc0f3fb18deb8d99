//! A persisted, stateful wrapper around a patch awaiting owner approval.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{OwnerId, ProposalId, WillId};
use crate::patch::Patch;

/// Proposal state machine.
///
/// ```text
/// ┌─────────┐  approve   ┌──────────┐  apply   ┌─────────┐
/// │ Pending │ ─────────> │ Approved │ ───────> │ Applied │
/// └─────────┘            └──────────┘          └─────────┘
///      │                       (approve_and_apply takes
///      │ reject                 either starting state)
///      v
/// ┌──────────┐
/// │ Rejected │  (terminal)
/// └──────────┘
/// ```
///
/// Rollback is not a status edge: it targets a historical version of the
/// document, not a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Pending,
    Approved,
    Applied,
    Rejected,
}

impl ProposalStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Applied => "applied",
            Self::Rejected => "rejected",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "applied" => Some(Self::Applied),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Whether `approve_and_apply` may act on a proposal in this state.
    #[must_use]
    pub fn is_approvable(self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub will_id: WillId,
    pub owner_id: OwnerId,
    pub status: ProposalStatus,
    pub patch: Patch,
    pub summary: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<DateTime<Utc>>,
}
