//! Will document patch & versioning engine.
//!
//! The flow is: the change detector diffs the live snapshot against
//! externally supplied ground truth; the patch builder turns the detected
//! changes into a replayable patch (filtering high-risk kinds in safe
//! mode); the lifecycle manager persists the patch as a pending proposal,
//! and on approval applies it through the pure patch applier, recording an
//! auditable version and moving the live document pointer atomically.
//! Rollback restores a historical version without appending to the ledger.
//!
//! All public operations return tagged errors ([`LifecycleError`]); none
//! panic or leak backend errors. Notification failures never abort a data
//! mutation.

mod apply;
mod build;
mod config;
mod detect;
mod lifecycle;


pub use apply::{AppliedPatch, apply_patch};
pub use build::build_patch;
pub use config::{ConfigError, EngineConfig};
pub use detect::{DetectedChanges, NO_CHANGES_SUMMARY, detect_changes};
pub use lifecycle::{LifecycleError, LifecycleManager, ProposeOutcome};
