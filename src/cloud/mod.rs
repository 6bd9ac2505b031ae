//! Persistence of resource snapshots and shared AWS client helpers.
//!
//! Records leave the collector through the [`ResourceSink`] trait. The
//! production sink writes each record as a JSON object to S3:
//!
//! ```text
//! s3://{inventory_bucket}/{resource_prefix}/{category}/{key}.json
//! ```
//!
//! Writes are last-write-wins: a later snapshot of the same resource replaces
//! the earlier object.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::InventoryResult;

/// Amazon S3 record sink
pub mod s3;

/// Region and HTTP client helpers for rusoto clients
pub mod client;

/// Destination for enriched resource records.
#[async_trait]
pub trait ResourceSink: Send + Sync {
    /// Write `record` under `category`/`key`, replacing any previous snapshot.
    async fn save_resource(&self, category: &str, key: &str, record: &Value) -> InventoryResult<()>;
}
