use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use rusoto_core::Region;
use rusoto_credential::StaticProvider;
use rusoto_dynamodb::DynamoDbClient;
use rusoto_ec2::{DescribeRegionsRequest, Ec2, Ec2Client};
use rusoto_secretsmanager::SecretsManagerClient;
use rusoto_sts::{AssumeRoleRequest, Sts, StsClient};

use crate::account::{AccountDirectory, AccountResolver, AccountSession};
use crate::cloud::client::{http_client, region_for};
use crate::collectors::secrets::SecretsApi;
use crate::config::InventoryConfig;
use crate::constants::SECRETS_ENDPOINT_PREFIX;
use crate::error::{InventoryError, InventoryResult};
use crate::models::AccountInfo;

/// Resolves accounts by assuming the audit role in each one.
pub struct AwsAccountResolver {
    config: InventoryConfig,
    home_region: Region,
    sts: StsClient,
    directory: Option<AccountDirectory>,
}

impl AwsAccountResolver {
    /// Build the resolver with the function's own credentials.
    pub fn new(config: InventoryConfig) -> Result<Self> {
        let sts_region = region_for(&config.home_region, "sts");
        let sts = StsClient::new_with(
            http_client()?,
            rusoto_credential::ChainProvider::new(),
            sts_region,
        );

        let directory = match &config.account_table {
            Some(table) => {
                let client = DynamoDbClient::new_with(
                    http_client()?,
                    rusoto_credential::ChainProvider::new(),
                    region_for(&config.home_region, "dynamodb"),
                );
                Some(AccountDirectory::new(client, table))
            }
            None => None,
        };

        Ok(AwsAccountResolver {
            home_region: region_for(&config.home_region, "ec2"),
            config,
            sts,
            directory,
        })
    }

    async fn account_name(&self, account_id: &str) -> InventoryResult<String> {
        match &self.directory {
            Some(directory) => directory.account_name(account_id).await,
            None => Ok(account_id.to_string()),
        }
    }

    async fn assume_role(&self, account_id: &str) -> InventoryResult<StaticProvider> {
        let role_arn = self.config.role_arn(account_id);
        let assume_error = |message: String| InventoryError::AssumeRole {
            account_id: account_id.to_string(),
            role_arn: role_arn.clone(),
            message,
        };

        let request = AssumeRoleRequest {
            role_arn: role_arn.clone(),
            role_session_name: self.config.role_session_name.clone(),
            ..Default::default()
        };

        let response = self.sts.assume_role(request).await
            .map_err(|e| assume_error(e.to_string()))?;
        let credentials = response
            .credentials
            .ok_or_else(|| assume_error("AssumeRole returned no credentials".to_string()))?;

        Ok(StaticProvider::new(
            credentials.access_key_id,
            credentials.secret_access_key,
            Some(credentials.session_token),
            None,
        ))
    }
}

#[async_trait]
impl AccountResolver for AwsAccountResolver {
    async fn resolve(&self, account_id: &str) -> InventoryResult<Box<dyn AccountSession>> {
        let account_name = self.account_name(account_id).await?;
        let credentials = self.assume_role(account_id).await?;

        Ok(Box::new(AwsAccountSession {
            account: AccountInfo::new(account_id, account_name),
            credentials,
            home_region: self.home_region.clone(),
            configured_regions: self.config.regions.clone(),
        }))
    }
}

/// Session inside a target account, holding the assumed-role credentials.
pub struct AwsAccountSession {
    account: AccountInfo,
    credentials: StaticProvider,
    home_region: Region,
    configured_regions: Vec<String>,
}

#[async_trait]
impl AccountSession for AwsAccountSession {
    fn account(&self) -> &AccountInfo {
        &self.account
    }

    async fn regions(&self) -> InventoryResult<Vec<String>> {
        if !self.configured_regions.is_empty() {
            return Ok(self.configured_regions.clone());
        }

        let ec2 = Ec2Client::new_with(http_client()?, self.credentials.clone(), self.home_region.clone());
        let response = ec2.describe_regions(DescribeRegionsRequest::default()).await
            .map_err(|e| InventoryError::service("ec2", "DescribeRegions", e))?;

        Ok(response
            .regions
            .unwrap_or_default()
            .into_iter()
            .filter_map(|r| r.region_name)
            .collect())
    }

    fn secrets_api(&self, region: &str) -> InventoryResult<Arc<dyn SecretsApi>> {
        let client = SecretsManagerClient::new_with(
            http_client()?,
            self.credentials.clone(),
            region_for(region, SECRETS_ENDPOINT_PREFIX),
        );
        Ok(Arc::new(client))
    }
}
