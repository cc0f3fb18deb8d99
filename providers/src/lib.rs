//! External collaborator seams.
//!
//! The lifecycle manager never talks to an asset registry, guardian
//! directory, or mail transport directly; it goes through the two traits
//! here. Hosts plug in their own implementations; the crate ships a
//! tracing-backed notifier for hosts without a mail transport.
//!
//! Notification failures are a collaborator concern only up to delivery:
//! the lifecycle layer swallows and logs them, so implementations are free
//! to return errors without affecting document mutations.

mod notice;
mod tracing_notifier;

pub use notice::ProposalNotice;
pub use tracing_notifier::TracingNotifier;

use std::fmt;

use anyhow::Result;

use codicil_types::{ExternalState, OwnerId};

/// Where a notification is delivered (an email address today).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactAddress(String);

impl ContactAddress {
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only projection of the ground truth owned by other subsystems
/// (asset registry, guardian directory, profile store). Fetched fresh on
/// every detection cycle.
pub trait ExternalStateProvider {
    fn fetch_external_state(&self, owner: &OwnerId) -> Result<ExternalState>;

    /// Contact lookup for notifications. `None` means the owner has no
    /// deliverable address; the lifecycle layer then skips notification
    /// silently rather than failing.
    fn owner_contact(&self, owner: &OwnerId) -> Result<Option<ContactAddress>>;
}

/// Notification sink. Fire-and-forget from the engine's perspective.
pub trait Notifier {
    fn notify(&self, to: &ContactAddress, notice: &ProposalNotice) -> Result<()>;
}
