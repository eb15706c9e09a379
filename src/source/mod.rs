pub mod http;
pub mod snapshot;

pub use http::HttpSignalSource;
pub use snapshot::SnapshotSource;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::SignalDetail;

/// Where signal snapshots come from. The engine never calls this; display
/// collaborators fetch a snapshot and hand it to the pure functions.
#[async_trait]
pub trait SignalSource: Send + Sync {
    async fn fetch_detail(&mut self, signal_id: &str) -> Result<SignalDetail>;
}
