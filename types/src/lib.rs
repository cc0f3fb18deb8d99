//! Core domain types for codicil.
//!
//! This crate contains pure domain types with no IO, no async, and minimal
//! dependencies. Everything here can be used from any layer of the library.
//!
//! Well-formedness is encoded in the types rather than checked by
//! validators: version numbers wrap `u64` (non-negative by construction)
//! and asset-map key uniqueness is guaranteed by `BTreeMap`.

mod change;
mod external;
mod ids;
mod patch;
mod proposal;
mod snapshot;
mod version;

pub use change::{Change, ChangeKind, EntityKind};
pub use external::{
    AssetStatus, ExternalAsset, ExternalBeneficiary, ExternalGuardian, ExternalState,
};
pub use ids::{
    AssetId, BeneficiaryId, GuardianId, OwnerId, ProposalId, VersionId, VersionNumber, WillId,
};
pub use patch::{Patch, PatchOp};
pub use proposal::{Proposal, ProposalStatus};
pub use snapshot::{
    AssetRecord, BeneficiaryRecord, GuardianRecord, GuardianshipRecord, WillContent, WillSnapshot,
};
pub use version::VersionRecord;
