//! Test utilities for the secrets inventory collector
//!
//! Shared fakes and builders for the unit test modules.

#![cfg(test)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use rusoto_secretsmanager::SecretListEntry;
use serde_json::Value;

use crate::cloud::ResourceSink;
use crate::error::InventoryResult;

/// A listing entry as Secrets Manager returns it for `name` in us-east-1.
pub fn secret_entry(name: &str) -> SecretListEntry {
    SecretListEntry {
        arn: Some(format!("arn:aws:secretsmanager:us-east-1:123:secret:{}", name)),
        name: Some(name.to_string()),
        ..Default::default()
    }
}

/// Sink keeping the latest record per (category, key), in write order.
#[derive(Default)]
pub struct MemorySink {
    writes: Mutex<Vec<(String, String, Value)>>,
}

impl MemorySink {
    fn latest(&self) -> BTreeMap<(String, String), Value> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .map(|(c, k, v)| ((c.clone(), k.clone()), v.clone()))
            .collect()
    }

    pub fn get(&self, category: &str, key: &str) -> Option<Value> {
        self.latest().get(&(category.to_string(), key.to_string())).cloned()
    }

    /// Keys written under `category`, in first-write order.
    pub fn keys(&self, category: &str) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for (c, k, _) in self.writes.lock().unwrap().iter() {
            if c == category && !keys.contains(k) {
                keys.push(k.clone());
            }
        }
        keys
    }

    pub fn len(&self) -> usize {
        self.latest().len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.lock().unwrap().is_empty()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }
}

#[async_trait]
impl ResourceSink for MemorySink {
    async fn save_resource(&self, category: &str, key: &str, record: &Value) -> InventoryResult<()> {
        self.writes
            .lock()
            .unwrap()
            .push((category.to_string(), key.to_string(), record.clone()));
        Ok(())
    }
}

#[test]
fn test_memory_sink_last_write_wins() {
    let sink = MemorySink::default();
    tokio_test::block_on(sink.save_resource("c", "k", &serde_json::json!({"v": 1}))).unwrap();
    tokio_test::block_on(sink.save_resource("c", "k", &serde_json::json!({"v": 2}))).unwrap();

    assert_eq!(sink.len(), 1);
    assert_eq!(sink.write_count(), 2);
    assert_eq!(sink.get("c", "k").unwrap()["v"], 2);
    assert_eq!(sink.keys("c"), vec!["k"]);
}
