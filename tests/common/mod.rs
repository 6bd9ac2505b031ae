//! Shared fakes for the integration tests.
//!
//! Everything here stands in for an AWS service: a scripted Secrets Manager,
//! an account session with per-region clients, a resolver and a recording
//! sink.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusoto_secretsmanager::{SecretListEntry, Tag};
use serde_json::{json, Value};

use secrets_inventory::account::{AccountResolver, AccountSession};
use secrets_inventory::cloud::ResourceSink;
use secrets_inventory::collectors::collector::Page;
use secrets_inventory::collectors::secrets::SecretsApi;
use secrets_inventory::error::{InventoryError, InventoryResult};
use secrets_inventory::models::AccountInfo;

pub const ACCOUNT_ID: &str = "123";
pub const ACCOUNT_NAME: &str = "prod";

pub fn arn_for(region: &str, name: &str) -> String {
    format!("arn:aws:secretsmanager:{}:{}:secret:{}", region, ACCOUNT_ID, name)
}

/// A listing entry with just the identifying fields.
pub fn entry(region: &str, name: &str) -> SecretListEntry {
    SecretListEntry {
        arn: Some(arn_for(region, name)),
        name: Some(name.to_string()),
        ..Default::default()
    }
}

pub fn tag(key: Option<&str>, value: Option<&str>) -> Tag {
    Tag {
        key: key.map(str::to_string),
        value: value.map(str::to_string),
    }
}

pub fn trigger(account_id: &str) -> Value {
    json!({
        "Records": [{
            "EventSource": "aws:sns",
            "Sns": {
                "Type": "Notification",
                "Message": format!("{{\"account_id\": \"{}\"}}", account_id)
            }
        }]
    })
}

/// Secrets Manager serving scripted pages.
///
/// Page `i` is requested with token `page-{i}`; the first page with no token.
#[derive(Default)]
pub struct ScriptedSecrets {
    pages: Vec<Vec<SecretListEntry>>,
    policies: HashMap<String, String>,
    policy_failures: HashMap<String, String>,
    list_failure: Option<String>,
    pub list_calls: AtomicUsize,
    pub policy_calls: AtomicUsize,
    pub tokens_seen: Mutex<Vec<Option<String>>>,
}

impl ScriptedSecrets {
    pub fn with_pages(pages: Vec<Vec<SecretListEntry>>) -> Self {
        ScriptedSecrets {
            pages,
            ..Default::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        ScriptedSecrets {
            list_failure: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn with_policy(mut self, arn: &str, policy: &str) -> Self {
        self.policies.insert(arn.to_string(), policy.to_string());
        self
    }

    pub fn with_policy_failure(mut self, arn: &str, message: &str) -> Self {
        self.policy_failures.insert(arn.to_string(), message.to_string());
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn policy_calls(&self) -> usize {
        self.policy_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretsApi for ScriptedSecrets {
    async fn list_secrets(&self, next_token: Option<String>) -> InventoryResult<Page<SecretListEntry>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.tokens_seen.lock().unwrap().push(next_token.clone());

        if let Some(message) = &self.list_failure {
            return Err(InventoryError::service("secretsmanager", "ListSecrets", message));
        }

        let index = match next_token {
            None => 0,
            Some(token) => token.trim_start_matches("page-").parse::<usize>().unwrap(),
        };
        let items = self.pages.get(index).cloned().unwrap_or_default();
        let next = if index + 1 < self.pages.len() {
            Some(format!("page-{}", index + 1))
        } else {
            None
        };
        Ok(Page::new(items, next))
    }

    async fn get_resource_policy(&self, secret_id: &str) -> InventoryResult<Option<String>> {
        self.policy_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.policy_failures.get(secret_id) {
            return Err(InventoryError::service("secretsmanager", "GetResourcePolicy", message));
        }
        Ok(self.policies.get(secret_id).cloned())
    }
}

/// Session with a fixed region list and one scripted client per region.
pub struct FakeSession {
    account: AccountInfo,
    regions: Vec<String>,
    apis: HashMap<String, Arc<ScriptedSecrets>>,
}

impl FakeSession {
    pub fn new() -> Self {
        FakeSession {
            account: AccountInfo::new(ACCOUNT_ID, ACCOUNT_NAME),
            regions: Vec::new(),
            apis: HashMap::new(),
        }
    }

    pub fn region(mut self, region: &str, api: Arc<ScriptedSecrets>) -> Self {
        self.regions.push(region.to_string());
        self.apis.insert(region.to_string(), api);
        self
    }
}

#[async_trait]
impl AccountSession for FakeSession {
    fn account(&self) -> &AccountInfo {
        &self.account
    }

    async fn regions(&self) -> InventoryResult<Vec<String>> {
        Ok(self.regions.clone())
    }

    fn secrets_api(&self, region: &str) -> InventoryResult<Arc<dyn SecretsApi>> {
        let api: Arc<dyn SecretsApi> = self.apis.get(region).cloned().unwrap_or_default();
        Ok(api)
    }
}

/// Resolver handing out one prepared session, or refusing the role.
pub struct FakeResolver {
    session: Mutex<Option<FakeSession>>,
    deny_role: bool,
}

impl FakeResolver {
    pub fn with_session(session: FakeSession) -> Self {
        FakeResolver {
            session: Mutex::new(Some(session)),
            deny_role: false,
        }
    }

    pub fn denying() -> Self {
        FakeResolver {
            session: Mutex::new(None),
            deny_role: true,
        }
    }
}

#[async_trait]
impl AccountResolver for FakeResolver {
    async fn resolve(&self, account_id: &str) -> InventoryResult<Box<dyn AccountSession>> {
        if self.deny_role {
            return Err(InventoryError::AssumeRole {
                account_id: account_id.to_string(),
                role_arn: format!("arn:aws:iam::{}:role/inventory-audit", account_id),
                message: "AccessDenied: not authorized to perform sts:AssumeRole".to_string(),
            });
        }
        let session = self
            .session
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| InventoryError::AccountNotFound(account_id.to_string()))?;
        Ok(Box::new(session))
    }
}

/// Sink keeping every write in order.
#[derive(Default)]
pub struct RecordingSink {
    writes: Mutex<Vec<(String, String, Value)>>,
}

impl RecordingSink {
    pub fn writes(&self) -> Vec<(String, String, Value)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn keys(&self) -> Vec<String> {
        self.writes().into_iter().map(|(_, key, _)| key).collect()
    }

    pub fn record(&self, key: &str) -> Option<Value> {
        self.writes()
            .into_iter()
            .rev()
            .find(|(_, k, _)| k == key)
            .map(|(_, _, value)| value)
    }
}

#[async_trait]
impl ResourceSink for RecordingSink {
    async fn save_resource(&self, category: &str, key: &str, record: &Value) -> InventoryResult<()> {
        self.writes
            .lock()
            .unwrap()
            .push((category.to_string(), key.to_string(), record.clone()));
        Ok(())
    }
}

/// Sink accepting a fixed number of writes, then failing every later one.
pub struct FailingSink {
    accepted: RecordingSink,
    capacity: usize,
    pub attempts: AtomicUsize,
}

impl FailingSink {
    pub fn after(capacity: usize) -> Self {
        FailingSink {
            accepted: RecordingSink::default(),
            capacity,
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.accepted.keys()
    }
}

#[async_trait]
impl ResourceSink for FailingSink {
    async fn save_resource(&self, category: &str, key: &str, record: &Value) -> InventoryResult<()> {
        if self.attempts.fetch_add(1, Ordering::SeqCst) >= self.capacity {
            return Err(InventoryError::service("s3", "PutObject", "SlowDown"));
        }
        self.accepted.save_resource(category, key, record).await
    }
}
