//! Sign In Use Case
//!
//! Authenticates a user and creates a session.

use std::sync::Arc;

use chrono::TimeDelta;
use platform::password::ClearTextPassword;
use user::{User, UserRepository, domain::normalize_email};

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::domain::{AuthSession, SessionRepository};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
pub struct SignInOutput {
    pub user: User,
    pub session: AuthSession,
    /// Signed token for the session cookie
    pub session_token: String,
}

/// Sign in use case
pub struct SignInUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> SignInUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let email = normalize_email(&input.email);

        // Unknown email and wrong password are indistinguishable to the caller.
        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password = ClearTextPassword::for_verification(&input.password);
        if !user.password_hash.verify(&password) {
            return Err(AuthError::InvalidCredentials);
        }

        let ttl = TimeDelta::from_std(self.config.session_ttl)
            .map_err(|e| AuthError::Internal(format!("Invalid session TTL: {e}")))?;
        let session = AuthSession::new(user.user_id, ttl);
        self.session_repo.create(&session).await?;

        let session_token = session_token::issue(&self.config, &session.session_id);

        tracing::info!(
            user_id = %user.user_id,
            session_id = %session.session_id,
            "User signed in"
        );

        Ok(SignInOutput {
            user,
            session,
            session_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemorySessionRepository;
    use user::InMemoryUserRepository;

    async fn seeded_users() -> Arc<InMemoryUserRepository> {
        let repo = Arc::new(InMemoryUserRepository::default());
        let hash = ClearTextPassword::new("correct horse battery")
            .unwrap()
            .hash()
            .unwrap();
        repo.create(&User::new("ada@example.com", "Ada", hash))
            .await
            .unwrap();
        repo
    }

    fn input(email: &str, password: &str) -> SignInInput {
        SignInInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_in_creates_session() {
        let sessions = Arc::new(InMemorySessionRepository::default());
        let config = Arc::new(AuthConfig::with_random_secret());
        let use_case = SignInUseCase::new(seeded_users().await, sessions.clone(), config.clone());

        let output = use_case
            .execute(input("ADA@example.com", "correct horse battery"))
            .await
            .unwrap();

        assert_eq!(output.user.email, "ada@example.com");
        let stored = sessions.find_by_id(&output.session.session_id).await.unwrap();
        assert!(stored.is_some());
        assert_eq!(
            session_token::parse(&config, &output.session_token).unwrap(),
            output.session.session_id
        );
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_are_invalid_credentials() {
        let use_case = SignInUseCase::new(
            seeded_users().await,
            Arc::new(InMemorySessionRepository::default()),
            Arc::new(AuthConfig::with_random_secret()),
        );

        assert!(matches!(
            use_case.execute(input("ada@example.com", "wrong password")).await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            use_case.execute(input("bob@example.com", "correct horse battery")).await,
            Err(AuthError::InvalidCredentials)
        ));
    }
}
