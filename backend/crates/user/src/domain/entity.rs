//! User Entity

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;

/// Registered user
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Normalized (trimmed, lowercase) email, unique
    pub email: String,
    pub name: String,
    pub password_hash: HashedPassword,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: &str, name: &str, password_hash: HashedPassword) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            email: normalize_email(email),
            name: name.trim().to_string(),
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Canonical form used for storage and lookups
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::ClearTextPassword;

    #[test]
    fn test_new_user_normalizes_input() {
        let hash = ClearTextPassword::new("long enough pw").unwrap().hash().unwrap();
        let user = User::new("  Ada@Example.COM ", " Ada ", hash);
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.name, "Ada");
        assert_eq!(user.created_at, user.updated_at);
    }
}
