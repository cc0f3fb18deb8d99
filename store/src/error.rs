use codicil_types::{ProposalId, VersionNumber, WillId};
use thiserror::Error;

/// Storage failure taxonomy.
///
/// Not-found and conflict states are first-class variants so the lifecycle
/// layer can map them to its tagged caller-facing errors; everything else
/// surfaces as the backend or payload variant.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("will `{0}` not found")]
    WillNotFound(WillId),

    #[error("version {version} of will `{will}` not found")]
    VersionNotFound {
        will: WillId,
        version: VersionNumber,
    },

    #[error("proposal `{0}` not found")]
    ProposalNotFound(ProposalId),

    /// Optimistic check failed: the live version moved under us.
    #[error("version conflict on will `{will}`: expected {expected}, found {actual}")]
    Conflict {
        will: WillId,
        expected: VersionNumber,
        actual: VersionNumber,
    },

    #[error("unknown proposal status `{0}` in store")]
    UnknownStatus(String),

    #[error("malformed stored timestamp `{0}`")]
    Timestamp(String),

    #[error("malformed stored payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}
