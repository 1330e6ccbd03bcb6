use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};

use domain::{Task, TaskId, User, UserId};

/// User item as stored in the table, credential included. The domain
/// [`User`] never carries the hash; this record is what login verifies
/// against.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

pub(crate) fn item_to_user_record(item: &HashMap<String, AttributeValue>) -> Option<UserRecord> {
    Some(UserRecord {
        user: User {
            id: UserId::from_string(item.get("id")?.as_s().ok()?.clone()),
            name: item.get("name")?.as_s().ok()?.clone(),
            email: item.get("email")?.as_s().ok()?.clone(),
            created_at: parse_timestamp(item.get("created_at")?)?,
            updated_at: parse_timestamp(item.get("updated_at")?)?,
        },
        password_hash: item.get("password_hash")?.as_s().ok()?.clone(),
    })
}

pub(crate) fn item_to_task(item: &HashMap<String, AttributeValue>) -> Option<Task> {
    let description = match item.get("description") {
        Some(value) => Some(value.as_s().ok()?.clone()),
        None => None,
    };

    Some(Task {
        id: TaskId::from_string(item.get("id")?.as_s().ok()?.clone()),
        title: item.get("title")?.as_s().ok()?.clone(),
        description,
        completed: *item.get("completed")?.as_bool().ok()?,
        user_id: UserId::from_string(item.get("user_id")?.as_s().ok()?.clone()),
        created_at: parse_timestamp(item.get("created_at")?)?,
        updated_at: parse_timestamp(item.get("updated_at")?)?,
    })
}

fn parse_timestamp(value: &AttributeValue) -> Option<DateTime<Utc>> {
    let raw = value.as_s().ok()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
