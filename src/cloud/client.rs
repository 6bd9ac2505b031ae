use anyhow::anyhow;
use rusoto_core::{HttpClient, Region};

use crate::error::{InventoryError, InventoryResult};

/// Whether the SDK's region table knows `region_name`.
pub fn is_known_region(region_name: &str) -> bool {
    region_name.parse::<Region>().is_ok()
}

/// Resolve a region name for a rusoto client.
///
/// Regions newer than the SDK's region table get a custom region pointing at
/// the standard `https://{service}.{region}.amazonaws.com` endpoint; callers
/// check [`is_known_region`] when they want to report that.
pub fn region_for(region_name: &str, endpoint_prefix: &str) -> Region {
    region_name.parse::<Region>().unwrap_or_else(|_| Region::Custom {
        name: region_name.to_string(),
        endpoint: format!("https://{}.{}.amazonaws.com", endpoint_prefix, region_name),
    })
}

/// Create the HTTP client backing a rusoto service client
pub fn http_client() -> InventoryResult<HttpClient> {
    HttpClient::new()
        .map_err(|e| InventoryError::Other(anyhow!("Failed to create HTTP client: {}", e)))
}
