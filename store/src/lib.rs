//! Document store seam for codicil.
//!
//! The lifecycle manager is the only writer to the live document and to the
//! version ledger; it reaches both through the [`WillStore`] trait so hosts
//! can swap the backend. [`SqliteWillStore`] is the bundled implementation.
//!
//! Two operations deliberately span multiple statements inside one
//! transaction:
//!
//! - [`WillStore::record_new_version`] appends a ledger row *and* moves the
//!   live document pointer, guarded by an optimistic check on the current
//!   version number. A lost race fails the whole operation with
//!   [`StoreError::Conflict`]; no partial write is possible.
//! - [`WillStore::restore_version`] overwrites the live document from a
//!   ledger row without appending. The ledger stays append-only; the live
//!   version pointer may decrease.

mod error;
mod sqlite;

pub use error::StoreError;
pub use sqlite::SqliteWillStore;

use chrono::{DateTime, Utc};

use codicil_types::{
    Proposal, ProposalId, ProposalStatus, VersionId, VersionNumber, VersionRecord, WillContent,
    WillId, WillSnapshot,
};

pub trait WillStore {
    /// Fetch the live document, or `None` if the will does not exist.
    fn get_will(&self, id: &WillId) -> Result<Option<WillSnapshot>, StoreError>;

    /// Seed or overwrite the live document (bootstrap path; not used by the
    /// lifecycle operations themselves).
    fn put_will(&mut self, snapshot: &WillSnapshot) -> Result<(), StoreError>;

    /// Append a ledger row with number `expected_version + 1` and move the
    /// live document to `content`, atomically.
    ///
    /// Fails with [`StoreError::Conflict`] when the live version no longer
    /// equals `expected_version`; the caller retries the whole operation.
    fn record_new_version(
        &mut self,
        will_id: &WillId,
        expected_version: VersionNumber,
        content: &WillContent,
        summary: &str,
    ) -> Result<VersionId, StoreError>;

    /// Overwrite the live document's content and version pointer from the
    /// named ledger row, without appending a new row.
    fn restore_version(
        &mut self,
        will_id: &WillId,
        version_number: VersionNumber,
    ) -> Result<(), StoreError>;

    fn get_version(
        &self,
        will_id: &WillId,
        version_number: VersionNumber,
    ) -> Result<Option<VersionRecord>, StoreError>;

    /// Ledger rows for a will, oldest first.
    fn list_versions(&self, will_id: &WillId) -> Result<Vec<VersionRecord>, StoreError>;

    fn insert_proposal(&mut self, proposal: &Proposal) -> Result<(), StoreError>;

    fn get_proposal(&self, id: &ProposalId) -> Result<Option<Proposal>, StoreError>;

    /// Move a proposal to `status`, stamping the matching timestamp column.
    fn set_proposal_status(
        &mut self,
        id: &ProposalId,
        status: ProposalStatus,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}
