use async_trait::async_trait;

use domain::{StoreError, Task, TaskId, User, UserId};

use crate::models::UserRecord;

/// Partial update applied to a stored task. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }
}

/// Account storage: profile records plus the email uniqueness index.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new account. Fails with [`StoreError::EmailTaken`] when the
    /// address is already registered.
    async fn create(&self, user: &User, password_hash: &str) -> Result<(), StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError>;
}

/// Task storage, keyed under the owning user. A task id that belongs to a
/// different user behaves exactly like a missing one.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn put(&self, task: &Task) -> Result<(), StoreError>;

    /// The user's tasks, newest first.
    async fn list(&self, user_id: &UserId) -> Result<Vec<Task>, StoreError>;

    async fn get(&self, user_id: &UserId, task_id: &TaskId) -> Result<Option<Task>, StoreError>;

    /// Applies `patch` and returns the stored result.
    /// [`StoreError::NotFound`] when the task does not exist for this user.
    async fn update(
        &self,
        user_id: &UserId,
        task_id: &TaskId,
        patch: TaskPatch,
    ) -> Result<Task, StoreError>;

    /// [`StoreError::NotFound`] when the task does not exist for this user.
    async fn delete(&self, user_id: &UserId, task_id: &TaskId) -> Result<(), StoreError>;
}
