//! Resource collectors.
//!
//! Every collector follows the same shape: list a service's resources page by
//! page, enrich each one, and hand the result to a sink.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │   collect_region (list → enrich → emit)  │
//! ├──────────────────────────────────────────┤
//! │         ResourceCollector impls          │
//! │  ┌────────────────┐                      │
//! │  │ Secrets Manager│                      │
//! │  └────────────────┘                      │
//! ├──────────────────────────────────────────┤
//! │              ResourceSink                │
//! │  ┌────────────────┐                      │
//! │  │      S3        │                      │
//! │  └────────────────┘                      │
//! └──────────────────────────────────────────┘
//! ```
//!
//! ## Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use log::LevelFilter;
//! use rusoto_core::Region;
//! use rusoto_secretsmanager::SecretsManagerClient;
//! use secrets_inventory::cloud::s3::S3ResourceSink;
//! use secrets_inventory::collectors::collector::collect_region;
//! use secrets_inventory::collectors::secrets::SecretsCollector;
//! use secrets_inventory::logging::LogContext;
//! use secrets_inventory::models::AccountInfo;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let collector = SecretsCollector::new(Arc::new(SecretsManagerClient::new(Region::UsEast1)));
//! let sink = S3ResourceSink::new("inventory-bucket", "Resources", "us-east-1")?;
//! let account = AccountInfo::new("123456789012", "security-prod");
//! let log = LogContext::new("local", LevelFilter::Info);
//!
//! let written = collect_region(&collector, &account, "us-east-1", &sink, &log).await?;
//! println!("Wrote {} secrets", written);
//! # Ok(())
//! # }
//! ```

/// Generic paginate, enrich and persist driver
pub mod collector;

/// AWS Secrets Manager collector
pub mod secrets;
