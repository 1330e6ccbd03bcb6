use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use tracing::debug;

use domain::{StoreError, User, UserId};

use crate::models::{item_to_user_record, UserRecord};
use crate::repositories::UserStore;
use crate::retry::retry_dynamodb_operation;
use crate::DynamoDbClient;

/// Users in the single-table layout: the profile lives at
/// `USER#{id}` / `PROFILE`, the uniqueness index at `EMAIL#{email}` / `USER`.
#[derive(Clone)]
pub struct DynamoUserRepository {
    db: DynamoDbClient,
}

impl DynamoUserRepository {
    pub fn new(db: DynamoDbClient) -> Self {
        Self { db }
    }

    async fn load_profile(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        let pk = format!("USER#{user_id}");

        let result = retry_dynamodb_operation(
            || async {
                self.db
                    .client()
                    .get_item()
                    .table_name(self.db.table_name())
                    .key("PK", AttributeValue::S(pk.clone()))
                    .key("SK", AttributeValue::S("PROFILE".to_string()))
                    .send()
                    .await
                    .map_err(|e| StoreError::DynamoDb(e.into_service_error().to_string()))
            },
            None,
        )
        .await?;

        match result.item() {
            Some(item) => item_to_user_record(item)
                .map(Some)
                .ok_or_else(|| StoreError::Corrupt(format!("user profile {user_id}"))),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl UserStore for DynamoUserRepository {
    async fn create(&self, user: &User, password_hash: &str) -> Result<(), StoreError> {
        let email_pk = format!("EMAIL#{}", user.email);

        // Claim the address first; losing this conditional write means the
        // email is already registered.
        self.db
            .client()
            .put_item()
            .table_name(self.db.table_name())
            .item("PK", AttributeValue::S(email_pk))
            .item("SK", AttributeValue::S("USER".to_string()))
            .item("user_id", AttributeValue::S(user.id.to_string()))
            .condition_expression("attribute_not_exists(PK)")
            .send()
            .await
            .map_err(|e| {
                let e = e.into_service_error();
                if e.is_conditional_check_failed_exception() {
                    StoreError::EmailTaken
                } else {
                    StoreError::DynamoDb(e.to_string())
                }
            })?;

        let pk = format!("USER#{}", user.id);
        retry_dynamodb_operation(
            || async {
                self.db
                    .client()
                    .put_item()
                    .table_name(self.db.table_name())
                    .item("PK", AttributeValue::S(pk.clone()))
                    .item("SK", AttributeValue::S("PROFILE".to_string()))
                    .item("id", AttributeValue::S(user.id.to_string()))
                    .item("name", AttributeValue::S(user.name.clone()))
                    .item("email", AttributeValue::S(user.email.clone()))
                    .item("password_hash", AttributeValue::S(password_hash.to_string()))
                    .item("created_at", AttributeValue::S(user.created_at.to_rfc3339()))
                    .item("updated_at", AttributeValue::S(user.updated_at.to_rfc3339()))
                    .send()
                    .await
                    .map_err(|e| StoreError::DynamoDb(e.into_service_error().to_string()))?;
                Ok(())
            },
            None,
        )
        .await?;

        debug!(user_id = %user.id, "User record stored");
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let pk = format!("EMAIL#{email}");

        let result = retry_dynamodb_operation(
            || async {
                self.db
                    .client()
                    .get_item()
                    .table_name(self.db.table_name())
                    .key("PK", AttributeValue::S(pk.clone()))
                    .key("SK", AttributeValue::S("USER".to_string()))
                    .send()
                    .await
                    .map_err(|e| StoreError::DynamoDb(e.into_service_error().to_string()))
            },
            None,
        )
        .await?;

        let Some(item) = result.item() else {
            return Ok(None);
        };
        let user_id = item
            .get("user_id")
            .and_then(|v| v.as_s().ok())
            .ok_or_else(|| StoreError::Corrupt(format!("email index {email}")))?;

        self.load_profile(user_id).await
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        Ok(self
            .load_profile(id.as_str())
            .await?
            .map(|record| record.user))
    }
}
