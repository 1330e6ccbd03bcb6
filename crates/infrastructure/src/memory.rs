//! In-memory store implementations, used by tests and for running the API
//! without AWS credentials.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use domain::{StoreError, Task, TaskId, User, UserId};

use crate::models::UserRecord;
use crate::repositories::{TaskPatch, TaskStore, UserStore};

#[derive(Default)]
pub struct InMemoryUserStore {
    // user id -> record
    records: Mutex<HashMap<String, UserRecord>>,
    // email -> user id
    emails: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: &User, password_hash: &str) -> Result<(), StoreError> {
        let mut emails = self.emails.lock().unwrap();
        if emails.contains_key(&user.email) {
            return Err(StoreError::EmailTaken);
        }
        emails.insert(user.email.clone(), user.id.to_string());

        self.records.lock().unwrap().insert(
            user.id.to_string(),
            UserRecord {
                user: user.clone(),
                password_hash: password_hash.to_string(),
            },
        );
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let emails = self.emails.lock().unwrap();
        let Some(user_id) = emails.get(email) else {
            return Ok(None);
        };
        Ok(self.records.lock().unwrap().get(user_id).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(id.as_str())
            .map(|record| record.user.clone()))
    }
}

#[derive(Default)]
pub struct InMemoryTaskStore {
    // (user id, task id) -> task
    tasks: Mutex<HashMap<(String, String), Task>>,
}

impl InMemoryTaskStore {
    fn key(user_id: &UserId, task_id: &TaskId) -> (String, String) {
        (user_id.to_string(), task_id.to_string())
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn put(&self, task: &Task) -> Result<(), StoreError> {
        self.tasks
            .lock()
            .unwrap()
            .insert(Self::key(&task.user_id, &task.id), task.clone());
        Ok(())
    }

    async fn list(&self, user_id: &UserId) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.lock().unwrap();
        let mut out: Vec<Task> = tasks
            .values()
            .filter(|task| &task.user_id == user_id)
            .cloned()
            .collect();
        // Newest first, matching the DynamoDB key order
        out.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_str().cmp(a.id.as_str()))
        });
        Ok(out)
    }

    async fn get(&self, user_id: &UserId, task_id: &TaskId) -> Result<Option<Task>, StoreError> {
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .get(&Self::key(user_id, task_id))
            .cloned())
    }

    async fn update(
        &self,
        user_id: &UserId,
        task_id: &TaskId,
        patch: TaskPatch,
    ) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .get_mut(&Self::key(user_id, task_id))
            .ok_or(StoreError::NotFound)?;

        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = Some(description);
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        task.updated_at = Utc::now();

        Ok(task.clone())
    }

    async fn delete(&self, user_id: &UserId, task_id: &TaskId) -> Result<(), StoreError> {
        self.tasks
            .lock()
            .unwrap()
            .remove(&Self::key(user_id, task_id))
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, email: &str) -> User {
        User::new(name, email).unwrap()
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = InMemoryUserStore::default();
        store
            .create(&user("Alice", "alice@example.com"), "hash-a")
            .await
            .unwrap();

        let err = store
            .create(&user("Imposter", "alice@example.com"), "hash-b")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::EmailTaken));
    }

    #[tokio::test]
    async fn lookup_by_email_returns_the_credential_record() {
        let store = InMemoryUserStore::default();
        let alice = user("Alice", "alice@example.com");
        store.create(&alice, "hash-a").await.unwrap();

        let record = store
            .find_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.user.id, alice.id);
        assert_eq!(record.password_hash, "hash-a");

        assert!(store
            .find_by_email("bob@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn tasks_are_scoped_to_their_owner() {
        let store = InMemoryTaskStore::default();
        let alice = UserId::new();
        let bob = UserId::new();
        let task = Task::new(alice.clone(), "Buy milk", None).unwrap();
        store.put(&task).await.unwrap();

        // Bob sees nothing, and Alice's task id resolves to nothing for him
        assert!(store.list(&bob).await.unwrap().is_empty());
        assert!(store.get(&bob, &task.id).await.unwrap().is_none());
        assert!(matches!(
            store.delete(&bob, &task.id).await.unwrap_err(),
            StoreError::NotFound
        ));

        assert_eq!(store.list(&alice).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let store = InMemoryTaskStore::default();
        let owner = UserId::new();

        let first = Task::new(owner.clone(), "first", None).unwrap();
        store.put(&first).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let second = Task::new(owner.clone(), "second", None).unwrap();
        store.put(&second).await.unwrap();

        let titles: Vec<String> = store
            .list(&owner)
            .await
            .unwrap()
            .into_iter()
            .map(|task| task.title)
            .collect();
        assert_eq!(titles, vec!["second".to_string(), "first".to_string()]);
    }

    #[tokio::test]
    async fn update_patches_only_the_given_fields() {
        let store = InMemoryTaskStore::default();
        let owner = UserId::new();
        let task = Task::new(owner.clone(), "Buy milk", Some("2 liters")).unwrap();
        store.put(&task).await.unwrap();

        let updated = store
            .update(
                &owner,
                &task.id,
                TaskPatch {
                    completed: Some(true),
                    ..TaskPatch::default()
                },
            )
            .await
            .unwrap();

        assert!(updated.completed);
        assert_eq!(updated.title, "Buy milk");
        assert_eq!(updated.description.as_deref(), Some("2 liters"));
        assert!(updated.updated_at >= task.updated_at);
    }

    #[tokio::test]
    async fn update_of_missing_task_is_not_found() {
        let store = InMemoryTaskStore::default();
        let err = store
            .update(&UserId::new(), &TaskId::new(), TaskPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }
}
