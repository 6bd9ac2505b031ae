use std::sync::Arc;

use async_trait::async_trait;
use rusoto_core::ByteStream;
use rusoto_s3::{PutObjectRequest, S3Client, S3};
use serde_json::Value;

use crate::cloud::client::{http_client, region_for};
use crate::cloud::ResourceSink;
use crate::constants::{RECORD_CONTENT_TYPE, RECORD_EXTENSION};
use crate::error::{InventoryError, InventoryResult};

/// Writes resource records as JSON objects into the inventory bucket.
///
/// # Fields
///
/// * `bucket` - The inventory bucket name
/// * `prefix` - Key prefix placed before the resource category
/// * `client` - Shared S3 client instance
pub struct S3ResourceSink {
    bucket: String,
    prefix: String,
    client: Arc<S3Client>,
}

impl S3ResourceSink {
    /// Create a sink using the function's own credentials in `region_name`.
    pub fn new(bucket: &str, prefix: &str, region_name: &str) -> InventoryResult<Self> {
        let client = S3Client::new_with(
            http_client()?,
            rusoto_credential::ChainProvider::new(),
            region_for(region_name, "s3"),
        );
        Ok(Self::with_client(Arc::new(client), bucket, prefix))
    }

    pub fn with_client(client: Arc<S3Client>, bucket: &str, prefix: &str) -> Self {
        S3ResourceSink {
            bucket: bucket.to_string(),
            prefix: prefix.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Object key for a record: `{prefix}/{category}/{key}.json`
    pub fn object_key(&self, category: &str, key: &str) -> String {
        if self.prefix.is_empty() {
            format!("{}/{}.{}", category, key, RECORD_EXTENSION)
        } else {
            format!("{}/{}/{}.{}", self.prefix, category, key, RECORD_EXTENSION)
        }
    }
}

#[async_trait]
impl ResourceSink for S3ResourceSink {
    async fn save_resource(&self, category: &str, key: &str, record: &Value) -> InventoryResult<()> {
        let object_key = self.object_key(category, key);
        let body = serde_json::to_vec_pretty(record)?;

        let request = PutObjectRequest {
            bucket: self.bucket.clone(),
            key: object_key,
            body: Some(ByteStream::from(body)),
            content_type: Some(RECORD_CONTENT_TYPE.to_string()),
            ..Default::default()
        };

        self.client.put_object(request).await
            .map_err(|e| InventoryError::service("s3", "PutObject", e))?;

        Ok(())
    }
}
