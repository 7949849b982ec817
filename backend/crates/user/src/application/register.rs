//! Register Use Case
//!
//! Creates a user account with an Argon2id password hash.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::domain::{User, UserRepository, normalize_email};
use crate::error::{UserError, UserResult};

/// Register input (already shape-validated by the DTO)
pub struct RegisterInput {
    pub email: String,
    pub name: String,
    pub password: String,
}

pub struct RegisterUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> RegisterUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: RegisterInput) -> UserResult<User> {
        let password = ClearTextPassword::new(&input.password)?;

        let email = normalize_email(&input.email);
        if self.repo.exists_by_email(&email).await? {
            return Err(UserError::EmailTaken);
        }

        let user = User::new(&email, &input.name, password.hash()?);
        // A concurrent registration can still win the race; the unique
        // constraint surfaces it as EmailTaken from create().
        self.repo.create(&user).await?;

        tracing::info!(user_id = %user.user_id, "User registered");

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryUserRepository;

    fn input(email: &str) -> RegisterInput {
        RegisterInput {
            email: email.to_string(),
            name: "Ada".to_string(),
            password: "correct horse battery".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_stores_user() {
        let repo = Arc::new(InMemoryUserRepository::default());
        let use_case = RegisterUseCase::new(repo.clone());

        let user = use_case.execute(input("Ada@Example.com")).await.unwrap();
        assert_eq!(user.email, "ada@example.com");

        let stored = repo.find_by_email("ada@example.com").await.unwrap();
        assert_eq!(stored.unwrap().user_id, user.user_id);
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let repo = Arc::new(InMemoryUserRepository::default());
        let use_case = RegisterUseCase::new(repo);

        use_case.execute(input("ada@example.com")).await.unwrap();
        let err = use_case.execute(input(" ADA@example.com")).await.unwrap_err();
        assert!(matches!(err, UserError::EmailTaken));
    }

    #[tokio::test]
    async fn test_register_applies_password_policy() {
        let use_case = RegisterUseCase::new(Arc::new(InMemoryUserRepository::default()));
        let mut weak = input("ada@example.com");
        weak.password = "          ".to_string();

        let err = use_case.execute(weak).await.unwrap_err();
        assert!(matches!(err, UserError::PasswordPolicy(_)));
    }
}
