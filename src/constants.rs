//! Global constants for the secrets inventory collector.
//!
//! This module centralizes hardcoded values such as resource names,
//! environment variable names and configuration defaults.

// Resource naming
/// Resource type stamped on every Secrets Manager record
pub const SECRETS_RESOURCE_TYPE: &str = "secretsmanager";

/// Top-level sink category for Secrets Manager records
pub const SECRETS_RESOURCE_PATH: &str = "secretsmanager";

/// Service endpoint prefix used when building custom regions
pub const SECRETS_ENDPOINT_PREFIX: &str = "secretsmanager";

/// Separator used between the account, region and name parts of a key
pub const KEY_SEPARATOR: char = '-';

/// Character in resource names that would nest the persistence key
pub const NAME_PATH_SEPARATOR: char = '/';

// Sink constants
/// Default key prefix under the inventory bucket
pub const DEFAULT_RESOURCE_PREFIX: &str = "Resources";

/// Content type of persisted records
pub const RECORD_CONTENT_TYPE: &str = "application/json";

/// File extension of persisted records
pub const RECORD_EXTENSION: &str = "json";

// Account resolution constants
/// Default STS session name for the cross-account role
pub const DEFAULT_ROLE_SESSION_NAME: &str = "inventory-secrets";

/// Default home region for STS, DynamoDB and region discovery
pub const DEFAULT_HOME_REGION: &str = "us-east-1";

/// Partition key of the account directory table
pub const ACCOUNT_TABLE_KEY: &str = "account_id";

/// Attribute of the account directory table holding the display name
pub const ACCOUNT_NAME_ATTRIBUTE: &str = "account_name";

// Environment variables
pub const ENV_CONFIG_FILE: &str = "INVENTORY_CONFIG";
pub const ENV_INVENTORY_BUCKET: &str = "INVENTORY_BUCKET";
pub const ENV_RESOURCE_PREFIX: &str = "RESOURCE_PREFIX";
pub const ENV_ROLE_NAME: &str = "ROLE_NAME";
pub const ENV_ROLE_SESSION: &str = "ROLE_SESSION";
pub const ENV_ACCOUNT_TABLE: &str = "ACCOUNT_TABLE";
pub const ENV_REGIONS: &str = "REGIONS";
pub const ENV_HOME_REGION: &str = "AWS_REGION";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

// Logging
/// Module prefixes whose log output is suppressed (HTTP and SDK internals)
pub const NOISY_LOG_TARGETS: &[&str] = &["rusoto_core", "rusoto_credential", "hyper", "h2", "rustls"];
