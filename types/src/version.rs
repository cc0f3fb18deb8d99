//! An immutable historical snapshot of document content.
//!
//! The version ledger is append-only per will and its numbers are never
//! reused. Rollback moves the *live* document's pointer back without
//! appending, so the live version can decrease while the ledger itself
//! only grows. The append-only invariant is about the ledger, not the
//! live pointer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{VersionId, VersionNumber, WillId};
use crate::snapshot::WillContent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub id: VersionId,
    pub will_id: WillId,
    pub version_number: VersionNumber,
    pub content: WillContent,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}
