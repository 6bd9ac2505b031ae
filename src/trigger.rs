//! Parsing of the SNS notification that triggers an invocation.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{InventoryError, InventoryResult};

#[derive(Debug, Deserialize)]
struct NotificationEnvelope {
    #[serde(rename = "Records", default)]
    records: Vec<NotificationRecord>,
}

#[derive(Debug, Deserialize)]
struct NotificationRecord {
    #[serde(rename = "Sns")]
    sns: SnsBody,
}

#[derive(Debug, Deserialize)]
struct SnsBody {
    #[serde(rename = "Message")]
    message: String,
}

/// The message asking for one account to be inventoried.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InventoryMessage {
    #[serde(deserialize_with = "account_id_string")]
    pub account_id: String,
    /// The full message body, keys sorted
    #[serde(skip)]
    pub body: Value,
}

impl InventoryMessage {
    /// Extract the message carried by the first record of an SNS envelope.
    pub fn from_payload(payload: &Value) -> InventoryResult<Self> {
        let envelope = NotificationEnvelope::deserialize(payload)
            .map_err(|e| InventoryError::InvalidTrigger(format!("not an SNS envelope: {}", e)))?;
        let record = envelope
            .records
            .into_iter()
            .next()
            .ok_or_else(|| InventoryError::InvalidTrigger("envelope has no records".to_string()))?;
        Self::from_message(&record.sns.message)
    }

    /// Parse the JSON message body itself.
    pub fn from_message(message: &str) -> InventoryResult<Self> {
        let bad_body = |e: serde_json::Error| InventoryError::InvalidTrigger(format!("bad message body: {}", e));
        let body: Value = serde_json::from_str(message).map_err(bad_body)?;
        let mut parsed = InventoryMessage::deserialize(&body).map_err(bad_body)?;
        if parsed.account_id.is_empty() {
            return Err(InventoryError::InvalidTrigger("account_id is empty".to_string()));
        }
        parsed.body = body;
        Ok(parsed)
    }
}

// Account ids sometimes arrive as JSON numbers.
fn account_id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) if n.is_u64() => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "account_id must be a string, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(message: &str) -> Value {
        json!({
            "Records": [{
                "EventSource": "aws:sns",
                "Sns": { "Message": message, "Subject": "inventory" }
            }]
        })
    }

    #[test]
    fn test_from_payload() {
        let msg = InventoryMessage::from_payload(&envelope(r#"{"account_id": "123456789012"}"#)).unwrap();
        assert_eq!(msg.account_id, "123456789012");
    }

    #[test]
    fn test_numeric_account_id() {
        let msg = InventoryMessage::from_message(r#"{"account_id": 123456789012}"#).unwrap();
        assert_eq!(msg.account_id, "123456789012");
    }

    #[test]
    fn test_extra_fields_ignored() {
        let msg = InventoryMessage::from_message(r#"{"account_id": "1", "payer_id": "2"}"#).unwrap();
        assert_eq!(msg.account_id, "1");
    }

    #[test]
    fn test_body_keeps_all_fields_sorted() {
        let msg = InventoryMessage::from_message(r#"{"payer_id": "2", "account_id": "1", "batch": 7}"#).unwrap();
        assert_eq!(msg.body, json!({"account_id": "1", "batch": 7, "payer_id": "2"}));
        assert_eq!(msg.body.to_string(), r#"{"account_id":"1","batch":7,"payer_id":"2"}"#);
    }

    #[test]
    fn test_invalid_payloads() {
        let cases = vec![
            json!({}),
            json!({"Records": []}),
            json!({"Records": [{"Sns": {}}]}),
            envelope("not json"),
            envelope(r#"{"other": 1}"#),
            envelope(r#"{"account_id": ""}"#),
            envelope(r#"{"account_id": [1]}"#),
        ];
        for payload in cases {
            let err = InventoryMessage::from_payload(&payload).unwrap_err();
            assert!(matches!(err, InventoryError::InvalidTrigger(_)), "{}", payload);
        }
    }
}
