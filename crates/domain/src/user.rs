use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn from_string(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered account. The password hash lives in the persistence layer,
/// never on the entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: &str, email: &str) -> Result<Self, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation("Name is required".to_string()));
        }
        let email = normalize_email(email)?;
        let now = Utc::now();

        Ok(Self {
            id: UserId::new(),
            name: name.to_string(),
            email,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Lowercases an address and rejects anything without the `local@domain.tld` shape.
pub fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_ascii_lowercase();
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !well_formed {
        return Err(DomainError::InvalidEmail(email));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_is_a_uuid() {
        let id = UserId::new();
        assert!(uuid::Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn new_user_normalizes_email() {
        let user = User::new("Alice", "  Alice@Example.COM ").unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.name, "Alice");
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn new_user_rejects_blank_name() {
        let err = User::new("   ", "alice@example.com").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for email in ["", "no-at-sign", "@example.com", "a@nodot", "a@.com", "a@com."] {
            assert!(
                normalize_email(email).is_err(),
                "expected rejection: {email:?}"
            );
        }
    }
}
