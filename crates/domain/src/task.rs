use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::user::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    pub fn from_string(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn timestamp_ms(&self) -> Option<u64> {
        ulid::Ulid::from_string(&self.0)
            .ok()
            .map(|ulid| ulid.timestamp_ms())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A to-do item owned by a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(user_id: UserId, title: &str, description: Option<&str>) -> Result<Self, DomainError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DomainError::Validation("Title is required".to_string()));
        }
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        let now = Utc::now();

        Ok(Self {
            id: TaskId::new(),
            title: title.to_string(),
            description,
            completed: false,
            user_id,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_id_is_a_26_char_ulid() {
        // Act
        let id = TaskId::new();

        // Assert: Crockford base32, 26 chars
        assert_eq!(id.as_str().len(), 26);
        let valid_chars = "0123456789ABCDEFGHJKMNPQRSTVWXYZ";
        for c in id.as_str().chars() {
            assert!(valid_chars.contains(c), "Invalid character: {c}");
        }
        assert!(id.timestamp_ms().is_some());
    }

    #[test]
    fn new_task_trims_and_defaults() {
        let owner = UserId::new();

        let task = Task::new(owner.clone(), "  Buy milk  ", Some("  2 liters ")).unwrap();

        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description.as_deref(), Some("2 liters"));
        assert!(!task.completed);
        assert_eq!(task.user_id, owner);
    }

    #[test]
    fn blank_description_becomes_none() {
        let task = Task::new(UserId::new(), "Buy milk", Some("   ")).unwrap();
        assert_eq!(task.description, None);
    }

    #[test]
    fn whitespace_title_is_rejected() {
        let err = Task::new(UserId::new(), "   ", None).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
