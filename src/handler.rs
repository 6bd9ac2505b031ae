//! Invocation entry point.
//!
//! One invocation inventories one account: parse the trigger, resolve the
//! account, then collect every region in turn. Failures are sorted by
//! [`FailureKind`]:
//!
//! - authorization failures are logged as a warning and absorbed,
//! - service failures are logged as an error and absorbed,
//! - unexpected failures are logged with the triggering message and the
//!   invocation context, then returned to the runtime.

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use crate::account::{AccountResolver, AccountSession, AwsAccountResolver};
use crate::cloud::s3::S3ResourceSink;
use crate::cloud::ResourceSink;
use crate::collectors::secrets::discover_secrets;
use crate::config::InventoryConfig;
use crate::error::{FailureKind, InventoryError, InventoryResult};
use crate::logging::LogContext;
use crate::trigger::InventoryMessage;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RegionSummary {
    pub region: String,
    pub records: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct InvocationSummary {
    pub account_id: String,
    pub account_name: String,
    pub regions: Vec<RegionSummary>,
}

impl InvocationSummary {
    pub fn total_records(&self) -> usize {
        self.regions.iter().map(|r| r.records).sum()
    }
}

/// How an invocation ended when it did not escalate.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvocationOutcome {
    Completed(InvocationSummary),
    AuthorizationFailed { account_id: String },
    ServiceFailed { account_id: String, error: String },
}

pub struct InventoryHandler {
    resolver: Arc<dyn AccountResolver>,
    sink: Arc<dyn ResourceSink>,
}

impl InventoryHandler {
    pub fn new(resolver: Arc<dyn AccountResolver>, sink: Arc<dyn ResourceSink>) -> Self {
        InventoryHandler { resolver, sink }
    }

    /// Build the AWS-backed handler: STS role assumption and the S3 sink.
    pub fn from_config(config: &InventoryConfig) -> Result<Self> {
        let resolver = AwsAccountResolver::new(config.clone())?;
        let sink = S3ResourceSink::new(
            &config.inventory_bucket,
            &config.resource_prefix,
            &config.home_region,
        )?;
        Ok(Self::new(Arc::new(resolver), Arc::new(sink)))
    }

    /// Handle one trigger payload.
    ///
    /// Returns `Err` only for unexpected failures.
    pub async fn handle(&self, payload: &Value, log: &LogContext) -> InventoryResult<InvocationOutcome> {
        log.debug(format!("Received event: {}", payload));

        let message = match InventoryMessage::from_payload(payload) {
            Ok(message) => message,
            Err(err) => return Err(escalate(err, payload, log)),
        };
        log.info(format!("Received message: {}", message.body));

        let session = match self.resolver.resolve(&message.account_id).await {
            Ok(session) => session,
            Err(err) => return absorb(err, &message.account_id, &message.account_id, payload, log),
        };
        log.debug(format!("Assumed role into {}", session.account()));

        match self.inventory_account(session.as_ref(), log).await {
            Ok(summary) => {
                log.info(format!(
                    "Inventoried {} secrets across {} regions for {}",
                    summary.total_records(),
                    summary.regions.len(),
                    session.account()
                ));
                Ok(InvocationOutcome::Completed(summary))
            }
            Err(err) => {
                let label = session.account().to_string();
                absorb(err, &message.account_id, &label, payload, log)
            }
        }
    }

    async fn inventory_account(
        &self,
        session: &dyn AccountSession,
        log: &LogContext,
    ) -> InventoryResult<InvocationSummary> {
        let account = session.account().clone();
        let mut regions = Vec::new();

        let region_names = session.regions().await?;
        log.debug(format!("{} has {} regions", account, region_names.len()));

        for region in region_names {
            let records = discover_secrets(session, &region, self.sink.as_ref(), log).await?;
            regions.push(RegionSummary { region, records });
        }

        Ok(InvocationSummary {
            account_id: account.account_id,
            account_name: account.account_name,
            regions,
        })
    }
}

fn absorb(
    err: InventoryError,
    account_id: &str,
    account_label: &str,
    payload: &Value,
    log: &LogContext,
) -> InventoryResult<InvocationOutcome> {
    match err.kind() {
        FailureKind::Authorization => {
            log.warn(format!("Unable to assume role into account {}: {}", account_label, err));
            Ok(InvocationOutcome::AuthorizationFailed {
                account_id: account_id.to_string(),
            })
        }
        FailureKind::Service => {
            log.error(format!("AWS Error getting info for {}: {}", account_label, err));
            Ok(InvocationOutcome::ServiceFailed {
                account_id: account_id.to_string(),
                error: err.to_string(),
            })
        }
        FailureKind::Unexpected => Err(escalate(err, payload, log)),
    }
}

fn escalate(err: InventoryError, payload: &Value, log: &LogContext) -> InventoryError {
    log.error(format!("{}\nMessage: {}\nContext: {}", err, payload, log.describe()));
    err
}
