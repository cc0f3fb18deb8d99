//! Proposal lifecycle: the state machine and orchestration layer.
//!
//! The manager is the only writer to the live document and version ledger.
//! Every public operation runs to completion or failure in one call, maps
//! failures to tagged errors whose display strings are the caller
//! contract, and never lets a notification failure undo or block a data
//! mutation that already succeeded.

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use codicil_providers::{ExternalStateProvider, Notifier, ProposalNotice};
use codicil_store::{StoreError, WillStore};
use codicil_types::{
    OwnerId, Proposal, ProposalId, ProposalStatus, VersionId, VersionNumber, VersionRecord, WillId,
};

use crate::apply::apply_patch;
use crate::build::build_patch;
use crate::config::EngineConfig;
use crate::detect::detect_changes;

/// Tagged failure taxonomy for the public operations.
///
/// Display strings are part of the caller contract; sources are attached
/// for logs but never shown in the tag.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Will not found")]
    WillNotFound,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Failed to create proposal")]
    CreateProposalFailed(#[source] StoreError),

    #[error("Proposal not found")]
    ProposalNotFound,

    #[error("Proposal is not approvable")]
    NotApprovable,

    #[error("Failed to record version")]
    RecordVersionFailed(#[source] StoreError),

    #[error("Version not found")]
    VersionNotFound,

    #[error("Failed to rollback")]
    RollbackFailed(#[source] StoreError),

    /// The live version moved between read and write; retry the whole
    /// operation.
    #[error("Conflict, retry")]
    Conflict,

    /// Anything unexpected (backend corruption, malformed external state).
    /// Callers never see the raw cause in the tag.
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),
}

/// Outcome of a `propose` call that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProposeOutcome {
    /// Detection found nothing relevant; no proposal was created.
    NoChanges,
    Proposed {
        proposal_id: ProposalId,
        summary: String,
    },
}

pub struct LifecycleManager<S, P, N> {
    store: S,
    provider: P,
    notifier: N,
    config: EngineConfig,
}

impl<S, P, N> LifecycleManager<S, P, N>
where
    S: WillStore,
    P: ExternalStateProvider,
    N: Notifier,
{
    pub fn new(store: S, provider: P, notifier: N, config: EngineConfig) -> Self {
        Self {
            store,
            provider,
            notifier,
            config,
        }
    }

    /// Access the underlying store (host read paths, tests).
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run a detection cycle and persist a pending proposal if drift was
    /// found. A sentinel detection result means "nothing to review" and
    /// creates nothing.
    pub fn propose(
        &mut self,
        will_id: &WillId,
        requested_by: &OwnerId,
    ) -> Result<ProposeOutcome, LifecycleError> {
        let will = self
            .store
            .get_will(will_id)
            .map_err(internal)?
            .ok_or(LifecycleError::WillNotFound)?;

        if will.owner_id != *requested_by {
            return Err(LifecycleError::Unauthorized);
        }

        let external = self
            .provider
            .fetch_external_state(requested_by)
            .map_err(LifecycleError::Internal)?;

        let detected = detect_changes(&will, &external, self.config.supports_beneficiary_diff);
        if !detected.has_changes() {
            debug!(will = %will_id, "no relevant drift; skipping proposal");
            return Ok(ProposeOutcome::NoChanges);
        }

        let patch = build_patch(&detected.changes, self.config.safe_mode);
        let proposal = Proposal {
            id: ProposalId::new(Uuid::new_v4().to_string()),
            will_id: will_id.clone(),
            owner_id: will.owner_id.clone(),
            status: ProposalStatus::Pending,
            summary: patch.summary.clone(),
            patch,
            created_at: Utc::now(),
            approved_at: None,
            applied_at: None,
            rejected_at: None,
        };

        self.store
            .insert_proposal(&proposal)
            .map_err(LifecycleError::CreateProposalFailed)?;

        self.notify_owner(
            &proposal.owner_id,
            &ProposalNotice::Created {
                summary: proposal.summary.clone(),
            },
        );

        Ok(ProposeOutcome::Proposed {
            proposal_id: proposal.id,
            summary: proposal.summary,
        })
    }

    /// Pending → Approved.
    pub fn approve(&mut self, proposal_id: &ProposalId) -> Result<(), LifecycleError> {
        self.transition_from_pending(proposal_id, ProposalStatus::Approved)
    }

    /// Pending → Rejected (terminal).
    pub fn reject(&mut self, proposal_id: &ProposalId) -> Result<(), LifecycleError> {
        self.transition_from_pending(proposal_id, ProposalStatus::Rejected)
    }

    fn transition_from_pending(
        &mut self,
        proposal_id: &ProposalId,
        to: ProposalStatus,
    ) -> Result<(), LifecycleError> {
        let proposal = self
            .store
            .get_proposal(proposal_id)
            .map_err(internal)?
            .ok_or(LifecycleError::ProposalNotFound)?;

        if proposal.status != ProposalStatus::Pending {
            return Err(LifecycleError::NotApprovable);
        }

        self.store
            .set_proposal_status(proposal_id, to, Utc::now())
            .map_err(internal)
    }

    /// Apply a pending or approved proposal: compute the next content,
    /// then record a new version and move the live document in one atomic
    /// store call. Returns the new version's id.
    ///
    /// Marking the proposal Applied afterwards may fail without aborting:
    /// the document mutation is the operation's primary effect and has
    /// already succeeded at that point.
    pub fn approve_and_apply(
        &mut self,
        proposal_id: &ProposalId,
    ) -> Result<VersionId, LifecycleError> {
        let proposal = self
            .store
            .get_proposal(proposal_id)
            .map_err(internal)?
            .ok_or(LifecycleError::ProposalNotFound)?;

        if !proposal.status.is_approvable() {
            return Err(LifecycleError::NotApprovable);
        }

        let will = self
            .store
            .get_will(&proposal.will_id)
            .map_err(internal)?
            .ok_or(LifecycleError::WillNotFound)?;

        let applied = apply_patch(&will.content, &proposal.patch);
        if applied.skipped_ops > 0 {
            warn!(
                proposal = %proposal_id,
                skipped = applied.skipped_ops,
                "patch ops targeted entities that no longer exist; skipped"
            );
        }

        let version_id = self
            .store
            .record_new_version(
                &proposal.will_id,
                will.version,
                &applied.next,
                &proposal.summary,
            )
            .map_err(|e| match e {
                StoreError::Conflict { .. } => LifecycleError::Conflict,
                StoreError::WillNotFound(_) => LifecycleError::WillNotFound,
                other => LifecycleError::RecordVersionFailed(other),
            })?;

        if let Err(e) =
            self.store
                .set_proposal_status(proposal_id, ProposalStatus::Applied, Utc::now())
        {
            // The document mutation already succeeded; a stale proposal
            // status is recoverable and must not fail the operation.
            warn!(proposal = %proposal_id, error = %e, "failed to mark proposal applied");
        }

        self.notify_owner(
            &proposal.owner_id,
            &ProposalNotice::Applied {
                summary: proposal.summary.clone(),
            },
        );

        Ok(version_id)
    }

    /// Restore a historical version as the live document. Does not append
    /// to the version ledger; the live version pointer may decrease.
    pub fn rollback_to_version(
        &mut self,
        will_id: &WillId,
        version_number: VersionNumber,
    ) -> Result<(), LifecycleError> {
        self.store
            .restore_version(will_id, version_number)
            .map_err(|e| match e {
                StoreError::VersionNotFound { .. } => LifecycleError::VersionNotFound,
                other => LifecycleError::RollbackFailed(other),
            })
    }

    /// Ledger rows for a will, oldest first (host history views).
    pub fn version_history(
        &self,
        will_id: &WillId,
    ) -> Result<Vec<VersionRecord>, LifecycleError> {
        self.store.list_versions(will_id).map_err(internal)
    }

    /// Fire-and-forget owner notification. A missing contact skips
    /// silently; delivery failures are logged and swallowed.
    fn notify_owner(&self, owner: &OwnerId, notice: &ProposalNotice) {
        let contact = match self.provider.owner_contact(owner) {
            Ok(Some(contact)) => contact,
            Ok(None) => {
                debug!(owner = %owner, "owner has no contact address; skipping notification");
                return;
            }
            Err(e) => {
                warn!(owner = %owner, error = %e, "contact lookup failed; skipping notification");
                return;
            }
        };

        if let Err(e) = self.notifier.notify(&contact, notice) {
            warn!(owner = %owner, error = %e, "notification failed; continuing");
        }
    }
}

fn internal(e: StoreError) -> LifecycleError {
    LifecycleError::Internal(anyhow::Error::new(e))
}
