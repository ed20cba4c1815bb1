//! Application services - Bucket storage, command resolution, snapshots

pub mod bucket_registry;
pub mod command_service;
pub mod snapshot;

pub use bucket_registry::{AddOptions, BucketRegistry};
pub use command_service::{CommandResolver, COMMAND_BUCKET, MAX_REDIRECT_DEPTH};
pub use snapshot::{RestoreReport, Snapshot};
