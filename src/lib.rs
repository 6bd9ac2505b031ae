//! # secrets-inventory
//!
//! A cross-account AWS Secrets Manager inventory collector, run as an AWS
//! Lambda function behind an SNS topic.
//!
//! ## Overview
//!
//! Each invocation receives a notification naming one AWS account. The
//! function assumes the inventory audit role in that account, walks every
//! region, lists all secrets, enriches each one with its resource policy and
//! standard metadata, and writes a JSON snapshot per secret to the inventory
//! bucket. Snapshots are keyed by `{account_id}-{region}-{secret_name}` and
//! overwrite the previous run's snapshot.
//!
//! ## Features
//!
//! - **Generic collector pattern**: paginate, enrich and persist, reusable for
//!   other resource kinds
//! - **Cross-account access**: STS role assumption with per-region clients
//! - **Structured records**: explicit record types, optional fields omitted
//!   rather than written as null
//! - **Failure taxonomy**: authorization and API failures are absorbed,
//!   anything unexpected is escalated to the Lambda runtime
//!
//! ## Usage
//!
//! ```no_run
//! use serde_json::json;
//! use log::LevelFilter;
//! use secrets_inventory::config::InventoryConfig;
//! use secrets_inventory::handler::InventoryHandler;
//! use secrets_inventory::logging::LogContext;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = InventoryConfig::from_env()?;
//! let handler = InventoryHandler::from_config(&config)?;
//!
//! let event = json!({
//!     "Records": [{ "Sns": { "Message": "{\"account_id\": \"123456789012\"}" } }]
//! });
//! let log = LogContext::new("local-run", LevelFilter::Info);
//! let outcome = handler.handle(&event, &log).await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`handler`]: Invocation entry point and failure handling
//! - [`trigger`]: SNS notification parsing
//! - [`account`]: Target account resolution and per-region clients
//! - [`collectors`]: The generic collector and the Secrets Manager collector
//! - [`cloud`]: Record sinks (S3) and client helpers
//! - [`models`]: Core data models and key construction
//! - [`config`]: Configuration loading
//! - [`logging`]: Logger setup and the per-invocation logging context
//! - [`error`]: Error types and failure classification
//! - [`constants`]: Application-wide constants

/// Invocation entry point and failure handling
pub mod handler;

/// SNS trigger parsing
pub mod trigger;

/// Target account resolution
pub mod account;

/// Resource collectors
pub mod collectors;

/// Record sinks and AWS client helpers
pub mod cloud;

/// Core data models and structures used throughout the application
pub mod models;

/// Configuration management
pub mod config;

/// Logger setup and per-invocation logging context
pub mod logging;

/// Error types and failure classification
pub mod error;

/// Application constants and configuration values
pub mod constants;

/// Test utilities and helpers
#[cfg(test)]
pub mod test_utils;
