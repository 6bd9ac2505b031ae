//! Secrets Manager collector.
//!
//! Lists every secret in a region with `ListSecrets`, looks up each secret's
//! resource policy with `GetResourcePolicy` and produces one
//! [`SecretResource`] per secret.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusoto_core::RusotoError;
use rusoto_secretsmanager::{
    GetResourcePolicyError, GetResourcePolicyRequest, GetResourcePolicyResponse,
    ListSecretsRequest, SecretListEntry, SecretsManager, SecretsManagerClient,
};
use serde::Serialize;
use serde_json::Value;

use crate::account::AccountSession;
use crate::cloud::client::is_known_region;
use crate::cloud::ResourceSink;
use crate::collectors::collector::{collect_region, Page, ResourceCollector};
use crate::constants::{SECRETS_ENDPOINT_PREFIX, SECRETS_RESOURCE_PATH, SECRETS_RESOURCE_TYPE};
use crate::error::{InventoryError, InventoryResult};
use crate::logging::LogContext;
use crate::models::{epoch_to_datetime, parse_tags, TagMap};

const SERVICE: &str = "secretsmanager";

/// The two Secrets Manager calls the collector needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SecretsApi: Send + Sync {
    async fn list_secrets(&self, next_token: Option<String>) -> InventoryResult<Page<SecretListEntry>>;

    /// The serialized policy document, or `None` when the secret has no policy.
    async fn get_resource_policy(&self, secret_id: &str) -> InventoryResult<Option<String>>;
}

#[async_trait]
impl SecretsApi for SecretsManagerClient {
    async fn list_secrets(&self, next_token: Option<String>) -> InventoryResult<Page<SecretListEntry>> {
        let request = ListSecretsRequest {
            next_token,
            ..Default::default()
        };
        let response = SecretsManager::list_secrets(self, request).await
            .map_err(|e| InventoryError::service(SERVICE, "ListSecrets", e))?;
        Ok(Page::new(response.secret_list.unwrap_or_default(), response.next_token))
    }

    async fn get_resource_policy(&self, secret_id: &str) -> InventoryResult<Option<String>> {
        let request = GetResourcePolicyRequest {
            secret_id: secret_id.to_string(),
        };
        policy_from_response(SecretsManager::get_resource_policy(self, request).await)
    }
}

/// Interpret a `GetResourcePolicy` result.
///
/// A response without a policy and a not-found error both mean "no policy";
/// every other error is a service failure.
pub fn policy_from_response(
    result: Result<GetResourcePolicyResponse, RusotoError<GetResourcePolicyError>>,
) -> InventoryResult<Option<String>> {
    match result {
        Ok(response) => Ok(response.resource_policy.filter(|p| !p.trim().is_empty())),
        Err(RusotoError::Service(GetResourcePolicyError::ResourceNotFound(_))) => Ok(None),
        Err(e) => Err(InventoryError::service(SERVICE, "GetResourcePolicy", e)),
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct RotationRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automatically_after_days: Option<i64>,
}

/// Normalized snapshot of one secret.
///
/// Field names follow the Secrets Manager API so records stay comparable with
/// the other inventory collectors. Absent optional fields are omitted.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct SecretResource {
    #[serde(rename = "ARN")]
    pub arn: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kms_key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_enabled: Option<bool>,
    #[serde(rename = "RotationLambdaARN", skip_serializing_if = "Option::is_none")]
    pub rotation_lambda_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_rules: Option<RotationRules>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_rotated_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_changed_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_accessed_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_versions_to_stages: Option<BTreeMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<TagMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_policy: Option<Value>,
}

impl SecretResource {
    /// Build the snapshot from a listing entry and its parsed policy.
    pub fn from_entry(entry: SecretListEntry, resource_policy: Option<Value>) -> InventoryResult<Self> {
        let arn = entry.arn.ok_or(InventoryError::IncompleteDescriptor {
            resource_type: SECRETS_RESOURCE_TYPE,
            field: "ARN",
        })?;
        let name = entry.name.ok_or(InventoryError::IncompleteDescriptor {
            resource_type: SECRETS_RESOURCE_TYPE,
            field: "Name",
        })?;

        Ok(SecretResource {
            arn,
            name,
            description: entry.description,
            kms_key_id: entry.kms_key_id,
            rotation_enabled: entry.rotation_enabled,
            rotation_lambda_arn: entry.rotation_lambda_arn,
            rotation_rules: entry.rotation_rules.map(|r| RotationRules {
                automatically_after_days: r.automatically_after_days,
            }),
            last_rotated_date: entry.last_rotated_date.and_then(epoch_to_datetime),
            last_changed_date: entry.last_changed_date.and_then(epoch_to_datetime),
            last_accessed_date: entry.last_accessed_date.and_then(epoch_to_datetime),
            deleted_date: entry.deleted_date.and_then(epoch_to_datetime),
            created_date: entry.created_date.and_then(epoch_to_datetime),
            secret_versions_to_stages: entry
                .secret_versions_to_stages
                .map(|stages| stages.into_iter().collect()),
            tags: entry
                .tags
                .map(|tags| parse_tags(tags.into_iter().map(|t| (t.key, t.value)))),
            resource_policy,
        })
    }
}

/// Parse a serialized policy document.
pub fn parse_policy(resource: &str, policy: &str) -> InventoryResult<Value> {
    serde_json::from_str(policy).map_err(|source| InventoryError::MalformedPolicy {
        resource: resource.to_string(),
        source,
    })
}

/// Region-scoped Secrets Manager collector.
pub struct SecretsCollector {
    api: Arc<dyn SecretsApi>,
}

impl SecretsCollector {
    pub fn new(api: Arc<dyn SecretsApi>) -> Self {
        SecretsCollector { api }
    }
}

#[async_trait]
impl ResourceCollector for SecretsCollector {
    type Descriptor = SecretListEntry;
    type Resource = SecretResource;

    fn resource_type(&self) -> &'static str {
        SECRETS_RESOURCE_TYPE
    }

    fn resource_path(&self) -> &'static str {
        SECRETS_RESOURCE_PATH
    }

    async fn list_page(&self, next_token: Option<String>) -> InventoryResult<Page<SecretListEntry>> {
        self.api.list_secrets(next_token).await
    }

    fn resource_name(&self, descriptor: &SecretListEntry) -> InventoryResult<String> {
        descriptor.name.clone().ok_or(InventoryError::IncompleteDescriptor {
            resource_type: SECRETS_RESOURCE_TYPE,
            field: "Name",
        })
    }

    async fn enrich(&self, descriptor: SecretListEntry) -> InventoryResult<SecretResource> {
        let arn = descriptor.arn.clone().ok_or(InventoryError::IncompleteDescriptor {
            resource_type: SECRETS_RESOURCE_TYPE,
            field: "ARN",
        })?;
        let policy = match self.api.get_resource_policy(&arn).await? {
            Some(raw) => Some(parse_policy(&arn, &raw)?),
            None => None,
        };
        SecretResource::from_entry(descriptor, policy)
    }
}

/// Inventory the account's secrets in one region into `sink`.
///
/// The region's client lives only for the duration of this call.
pub async fn discover_secrets(
    session: &dyn AccountSession,
    region: &str,
    sink: &dyn ResourceSink,
    log: &LogContext,
) -> InventoryResult<usize> {
    if !is_known_region(region) {
        log.warn(format!(
            "Region '{}' is unknown to the SDK, using its standard {} endpoint",
            region, SECRETS_ENDPOINT_PREFIX
        ));
    }
    let collector = SecretsCollector::new(session.secrets_api(region)?);
    collect_region(&collector, session.account(), region, sink, log).await
}
