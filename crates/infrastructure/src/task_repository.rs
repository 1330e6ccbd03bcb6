use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use chrono::Utc;
use tracing::debug;

use domain::{StoreError, Task, TaskId, UserId};

use crate::models::item_to_task;
use crate::repositories::{TaskPatch, TaskStore};
use crate::retry::retry_dynamodb_operation;
use crate::DynamoDbClient;

/// Tasks in the single-table layout: `USER#{user_id}` / `TASK#{task_id}`.
/// Keying under the owner's partition is what enforces per-user scoping.
#[derive(Clone)]
pub struct DynamoTaskRepository {
    db: DynamoDbClient,
}

impl DynamoTaskRepository {
    pub fn new(db: DynamoDbClient) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskStore for DynamoTaskRepository {
    async fn put(&self, task: &Task) -> Result<(), StoreError> {
        let pk = format!("USER#{}", task.user_id);
        let sk = format!("TASK#{}", task.id);

        retry_dynamodb_operation(
            || async {
                let mut builder = self
                    .db
                    .client()
                    .put_item()
                    .table_name(self.db.table_name())
                    .item("PK", AttributeValue::S(pk.clone()))
                    .item("SK", AttributeValue::S(sk.clone()))
                    .item("id", AttributeValue::S(task.id.to_string()))
                    .item("title", AttributeValue::S(task.title.clone()))
                    .item("completed", AttributeValue::Bool(task.completed))
                    .item("user_id", AttributeValue::S(task.user_id.to_string()))
                    .item("created_at", AttributeValue::S(task.created_at.to_rfc3339()))
                    .item("updated_at", AttributeValue::S(task.updated_at.to_rfc3339()));

                if let Some(description) = &task.description {
                    builder = builder.item("description", AttributeValue::S(description.clone()));
                }

                builder
                    .send()
                    .await
                    .map_err(|e| StoreError::DynamoDb(e.into_service_error().to_string()))?;
                Ok(())
            },
            None,
        )
        .await?;

        debug!(task_id = %task.id, "Task stored");
        Ok(())
    }

    async fn list(&self, user_id: &UserId) -> Result<Vec<Task>, StoreError> {
        let pk = format!("USER#{user_id}");

        let result = retry_dynamodb_operation(
            || async {
                self.db
                    .client()
                    .query()
                    .table_name(self.db.table_name())
                    .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
                    .expression_attribute_values(":pk", AttributeValue::S(pk.clone()))
                    .expression_attribute_values(":sk_prefix", AttributeValue::S("TASK#".to_string()))
                    // ULID sort keys: descending key order is newest first
                    .scan_index_forward(false)
                    .send()
                    .await
                    .map_err(|e| StoreError::DynamoDb(e.into_service_error().to_string()))
            },
            None,
        )
        .await?;

        Ok(result.items().iter().filter_map(item_to_task).collect())
    }

    async fn get(&self, user_id: &UserId, task_id: &TaskId) -> Result<Option<Task>, StoreError> {
        let pk = format!("USER#{user_id}");
        let sk = format!("TASK#{task_id}");

        let result = retry_dynamodb_operation(
            || async {
                self.db
                    .client()
                    .get_item()
                    .table_name(self.db.table_name())
                    .key("PK", AttributeValue::S(pk.clone()))
                    .key("SK", AttributeValue::S(sk.clone()))
                    .send()
                    .await
                    .map_err(|e| StoreError::DynamoDb(e.into_service_error().to_string()))
            },
            None,
        )
        .await?;

        match result.item() {
            Some(item) => item_to_task(item)
                .map(Some)
                .ok_or_else(|| StoreError::Corrupt(format!("task {task_id}"))),
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        user_id: &UserId,
        task_id: &TaskId,
        patch: TaskPatch,
    ) -> Result<Task, StoreError> {
        let pk = format!("USER#{user_id}");
        let sk = format!("TASK#{task_id}");
        let now = Utc::now().to_rfc3339();

        let result = retry_dynamodb_operation(
            || async {
                let mut update_parts = vec!["updated_at = :updated_at"];
                let mut builder = self
                    .db
                    .client()
                    .update_item()
                    .table_name(self.db.table_name())
                    .key("PK", AttributeValue::S(pk.clone()))
                    .key("SK", AttributeValue::S(sk.clone()))
                    // Bare update_item would create the item; require presence
                    .condition_expression("attribute_exists(PK) AND attribute_exists(SK)")
                    .expression_attribute_values(":updated_at", AttributeValue::S(now.clone()))
                    .return_values(ReturnValue::AllNew);

                if let Some(title) = &patch.title {
                    update_parts.push("title = :title");
                    builder = builder
                        .expression_attribute_values(":title", AttributeValue::S(title.clone()));
                }

                if let Some(description) = &patch.description {
                    update_parts.push("description = :description");
                    builder = builder.expression_attribute_values(
                        ":description",
                        AttributeValue::S(description.clone()),
                    );
                }

                if let Some(completed) = patch.completed {
                    update_parts.push("completed = :completed");
                    builder = builder
                        .expression_attribute_values(":completed", AttributeValue::Bool(completed));
                }

                builder
                    .update_expression(format!("SET {}", update_parts.join(", ")))
                    .send()
                    .await
                    .map_err(|e| {
                        let e = e.into_service_error();
                        if e.is_conditional_check_failed_exception() {
                            StoreError::NotFound
                        } else {
                            StoreError::DynamoDb(e.to_string())
                        }
                    })
            },
            None,
        )
        .await?;

        let item = result.attributes().ok_or(StoreError::NotFound)?;
        item_to_task(item).ok_or_else(|| StoreError::Corrupt(format!("task {task_id}")))
    }

    async fn delete(&self, user_id: &UserId, task_id: &TaskId) -> Result<(), StoreError> {
        let pk = format!("USER#{user_id}");
        let sk = format!("TASK#{task_id}");

        retry_dynamodb_operation(
            || async {
                self.db
                    .client()
                    .delete_item()
                    .table_name(self.db.table_name())
                    .key("PK", AttributeValue::S(pk.clone()))
                    .key("SK", AttributeValue::S(sk.clone()))
                    .condition_expression("attribute_exists(PK) AND attribute_exists(SK)")
                    .send()
                    .await
                    .map_err(|e| {
                        let e = e.into_service_error();
                        if e.is_conditional_check_failed_exception() {
                            StoreError::NotFound
                        } else {
                            StoreError::DynamoDb(e.to_string())
                        }
                    })?;
                Ok(())
            },
            None,
        )
        .await?;

        debug!(task_id = %task_id, "Task deleted");
        Ok(())
    }
}
