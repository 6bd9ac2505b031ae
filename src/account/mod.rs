//! Target account resolution.
//!
//! An [`AccountResolver`] turns the account id from the trigger into an
//! [`AccountSession`]: the account's identity, its regions, and region-scoped
//! service clients acting inside the account. The AWS implementation assumes
//! the cross-account audit role with STS; tests substitute their own.

use std::sync::Arc;

use async_trait::async_trait;

use crate::collectors::secrets::SecretsApi;
use crate::error::InventoryResult;
use crate::models::AccountInfo;

/// STS, DynamoDB and EC2 backed resolver
pub mod aws;

/// Account name lookup in the account directory table
pub mod directory;

pub use self::aws::{AwsAccountResolver, AwsAccountSession};
pub use self::directory::AccountDirectory;

#[async_trait]
pub trait AccountResolver: Send + Sync {
    /// Resolve `account_id` into a session inside that account.
    ///
    /// Failing to assume the role is reported as
    /// [`InventoryError::AssumeRole`](crate::error::InventoryError::AssumeRole).
    async fn resolve(&self, account_id: &str) -> InventoryResult<Box<dyn AccountSession>>;
}

#[async_trait]
pub trait AccountSession: Send + Sync {
    fn account(&self) -> &AccountInfo;

    /// Regions to inventory, in processing order.
    async fn regions(&self) -> InventoryResult<Vec<String>>;

    /// A Secrets Manager client for `region`, acting inside the account.
    fn secrets_api(&self, region: &str) -> InventoryResult<Arc<dyn SecretsApi>>;
}
