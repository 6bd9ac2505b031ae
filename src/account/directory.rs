use std::collections::HashMap;

use rusoto_dynamodb::{AttributeValue, DynamoDb, DynamoDbClient, GetItemInput};

use crate::constants::{ACCOUNT_NAME_ATTRIBUTE, ACCOUNT_TABLE_KEY};
use crate::error::{InventoryError, InventoryResult};

/// The DynamoDB table listing every account the inventory covers.
pub struct AccountDirectory {
    client: DynamoDbClient,
    table: String,
}

impl AccountDirectory {
    pub fn new(client: DynamoDbClient, table: &str) -> Self {
        AccountDirectory {
            client,
            table: table.to_string(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Look up the display name of `account_id`.
    ///
    /// An account missing from the table is [`InventoryError::AccountNotFound`].
    pub async fn account_name(&self, account_id: &str) -> InventoryResult<String> {
        let input = GetItemInput {
            table_name: self.table.clone(),
            key: account_key(account_id),
            consistent_read: Some(true),
            ..Default::default()
        };

        let output = self.client.get_item(input).await
            .map_err(|e| InventoryError::service("dynamodb", "GetItem", e))?;

        let item = output
            .item
            .filter(|item| !item.is_empty())
            .ok_or_else(|| InventoryError::AccountNotFound(account_id.to_string()))?;

        Ok(account_name_from_item(&item, account_id))
    }
}

fn account_key(account_id: &str) -> HashMap<String, AttributeValue> {
    let mut key = HashMap::new();
    key.insert(
        ACCOUNT_TABLE_KEY.to_string(),
        AttributeValue {
            s: Some(account_id.to_string()),
            ..Default::default()
        },
    );
    key
}

/// The item's `account_name`, or the account id when the attribute is unset.
pub fn account_name_from_item(item: &HashMap<String, AttributeValue>, account_id: &str) -> String {
    item.get(ACCOUNT_NAME_ATTRIBUTE)
        .and_then(|v| v.s.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| account_id.to_string())
}
