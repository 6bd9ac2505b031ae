use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, LevelFilter};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_HOME_REGION, DEFAULT_RESOURCE_PREFIX, DEFAULT_ROLE_SESSION_NAME, ENV_ACCOUNT_TABLE,
    ENV_CONFIG_FILE, ENV_HOME_REGION, ENV_INVENTORY_BUCKET, ENV_LOG_LEVEL, ENV_REGIONS,
    ENV_RESOURCE_PREFIX, ENV_ROLE_NAME, ENV_ROLE_SESSION,
};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct InventoryConfig {
    /// Bucket receiving the resource snapshots
    pub inventory_bucket: String,
    /// Key prefix under the bucket, before the resource category
    pub resource_prefix: String,
    /// Name of the audit role assumed in every target account
    pub role_name: String,
    pub role_session_name: String,
    /// DynamoDB table mapping account ids to account names
    pub account_table: Option<String>,
    /// Regions to inventory; discovered from EC2 when empty
    pub regions: Vec<String>,
    /// Region used for STS, DynamoDB and region discovery
    pub home_region: String,
    pub log_level: String,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        InventoryConfig {
            inventory_bucket: String::new(),
            resource_prefix: DEFAULT_RESOURCE_PREFIX.to_string(),
            role_name: String::new(),
            role_session_name: DEFAULT_ROLE_SESSION_NAME.to_string(),
            account_table: None,
            regions: Vec::new(),
            home_region: DEFAULT_HOME_REGION.to_string(),
            log_level: "debug".to_string(),
        }
    }
}

impl InventoryConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: InventoryConfig = serde_yaml::from_str(&content)
            .context("Failed to parse YAML config")?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::load(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// If `INVENTORY_CONFIG` names a YAML file it is read first; individual
    /// variables then override its values.
    pub fn load<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match non_empty(lookup(ENV_CONFIG_FILE)) {
            Some(path) => Self::from_yaml_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_overrides(&lookup);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = non_empty(lookup(ENV_INVENTORY_BUCKET)) {
            self.inventory_bucket = v;
        }
        if let Some(v) = non_empty(lookup(ENV_RESOURCE_PREFIX)) {
            self.resource_prefix = v;
        }
        if let Some(v) = non_empty(lookup(ENV_ROLE_NAME)) {
            self.role_name = v;
        }
        if let Some(v) = non_empty(lookup(ENV_ROLE_SESSION)) {
            self.role_session_name = v;
        }
        if let Some(v) = non_empty(lookup(ENV_ACCOUNT_TABLE)) {
            self.account_table = Some(v);
        }
        if let Some(v) = non_empty(lookup(ENV_REGIONS)) {
            self.regions = parse_region_list(&v);
        }
        if let Some(v) = non_empty(lookup(ENV_HOME_REGION)) {
            self.home_region = v;
        }
        if let Some(v) = non_empty(lookup(ENV_LOG_LEVEL)) {
            self.log_level = v;
        }
    }

    /// Check that required settings are present and well-formed
    pub fn validate(&self) -> Result<()> {
        if self.inventory_bucket.is_empty() {
            bail!("{} must be set", ENV_INVENTORY_BUCKET);
        }
        if self.role_name.is_empty() {
            bail!("{} must be set", ENV_ROLE_NAME);
        }
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| anyhow!("Invalid log level '{}'", self.log_level))
    }

    /// ARN of the audit role inside `account_id`
    pub fn role_arn(&self, account_id: &str) -> String {
        format!("arn:aws:iam::{}:role/{}", account_id, self.role_name)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Split a comma separated region list, ignoring blanks
pub fn parse_region_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}
