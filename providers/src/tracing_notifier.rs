use anyhow::Result;

use crate::{ContactAddress, Notifier, ProposalNotice};

/// Notifier that logs instead of delivering.
///
/// Transport email is another subsystem's job; hosts without one (tests,
/// local tooling) get an observable default.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, to: &ContactAddress, notice: &ProposalNotice) -> Result<()> {
        tracing::info!(
            to = %to,
            subject = notice.subject(),
            summary = notice.summary(),
            "proposal notification"
        );
        Ok(())
    }
}
