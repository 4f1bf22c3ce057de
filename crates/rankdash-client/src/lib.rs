pub mod client;
pub mod error;
pub mod snapshot;

pub use client::{RankApiClient, UploadReceipt};
pub use error::ClientError;
pub use snapshot::{load_snapshot, try_load_snapshot, Snapshot};
