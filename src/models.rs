use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{KEY_SEPARATOR, NAME_PATH_SEPARATOR};

/// The account being inventoried in one invocation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    pub account_id: String,
    pub account_name: String,
}

impl AccountInfo {
    pub fn new(account_id: impl Into<String>, account_name: impl Into<String>) -> Self {
        AccountInfo {
            account_id: account_id.into(),
            account_name: account_name.into(),
        }
    }
}

impl fmt::Display for AccountInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.account_name, self.account_id)
    }
}

/// Flat tag-key to tag-value mapping.
pub type TagMap = BTreeMap<String, String>;

/// A normalized resource snapshot as written to the sink.
///
/// The service-specific body is flattened into the same JSON object as the
/// metadata fields, which are present on every record.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ResourceRecord<R> {
    #[serde(flatten)]
    pub resource: R,
    pub resource_type: String,
    pub region: String,
    pub account_id: String,
    pub account_name: String,
    pub last_seen: DateTime<Utc>,
}

impl<R> ResourceRecord<R> {
    pub fn new(resource: R, resource_type: &str, region: &str, account: &AccountInfo) -> Self {
        ResourceRecord {
            resource,
            resource_type: resource_type.to_string(),
            region: region.to_string(),
            account_id: account.account_id.clone(),
            account_name: account.account_name.clone(),
            last_seen: Utc::now(),
        }
    }
}

/// Replace path separators in a resource name so the key stays flat.
pub fn sanitize_resource_name(name: &str) -> String {
    name.replace(NAME_PATH_SEPARATOR, &KEY_SEPARATOR.to_string())
}

/// Deterministic persistence key: `{account_id}-{region}-{sanitized_name}`.
pub fn resource_key(account_id: &str, region: &str, resource_name: &str) -> String {
    format!(
        "{}{sep}{}{sep}{}",
        account_id,
        region,
        sanitize_resource_name(resource_name),
        sep = KEY_SEPARATOR
    )
}

/// Normalize the SDK's list of key/value pairs into a flat mapping.
///
/// Entries without a key are dropped, a missing value becomes the empty
/// string and later duplicates win.
pub fn parse_tags<I>(pairs: I) -> TagMap
where
    I: IntoIterator<Item = (Option<String>, Option<String>)>,
{
    pairs
        .into_iter()
        .filter_map(|(key, value)| key.map(|k| (k, value.unwrap_or_default())))
        .collect()
}

/// Convert an SDK epoch-seconds timestamp into a UTC datetime.
pub fn epoch_to_datetime(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let secs = seconds.floor();
    let nanos = ((seconds - secs) * 1_000_000_000.0).round() as u32;
    Utc.timestamp_opt(secs as i64, nanos.min(999_999_999)).single()
}
