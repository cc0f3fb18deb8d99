//! Owner-facing lifecycle notices.
//!
//! This is a closed enum: each lifecycle event that reaches the owner has
//! its own variant with a compile-time-checked subject and body, so there
//! is no status-to-template lookup that can silently miss a state.

/// A notification the lifecycle manager can send to a document owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProposalNotice {
    /// A proposal was created and awaits review.
    Created { summary: String },
    /// An approved proposal was applied to the document.
    Applied { summary: String },
}

impl ProposalNotice {
    #[must_use]
    pub fn subject(&self) -> &'static str {
        match self {
            Self::Created { .. } => "Your will has an update proposal",
            Self::Applied { .. } => "Your will was updated",
        }
    }

    #[must_use]
    pub fn body(&self) -> String {
        match self {
            Self::Created { summary } => format!(
                "We detected changes related to your will. \
                 A proposal is ready for your review.\n\n\
                 Summary: {summary}\n\n\
                 Open your dashboard to review and approve the proposed updates."
            ),
            Self::Applied { summary } => {
                format!("Your approved changes have been applied.\n\nSummary: {summary}")
            }
        }
    }

    #[must_use]
    pub fn summary(&self) -> &str {
        match self {
            Self::Created { summary } | Self::Applied { summary } => summary,
        }
    }
}
