//! Check Session Use Case
//!
//! Resolves a session cookie token to the signed-in user.

use std::sync::Arc;

use user::UserRepository;

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::domain::{CurrentUser, SessionRepository};
use crate::error::{AuthError, AuthResult};

pub struct CheckSessionUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> CheckSessionUseCase<U, S>
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

    /// Verify the token, load its session and the owning user
    ///
    /// Expired sessions are deleted on sight.
    pub async fn execute(&self, session_token: &str) -> AuthResult<CurrentUser> {
        let session_id = session_token::parse(&self.config, session_token)?;

        let session = self
            .session_repo
            .find_by_id(&session_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        if session.is_expired() {
            self.session_repo.delete(&session_id).await?;
            return Err(AuthError::SessionInvalid);
        }

        let user = self
            .user_repo
            .find_by_id(&session.user_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        Ok(CurrentUser::new(user, session_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AuthSession;
    use crate::infra::InMemorySessionRepository;
    use chrono::TimeDelta;
    use platform::password::ClearTextPassword;
    use user::{InMemoryUserRepository, User};

    struct Fixture {
        users: Arc<InMemoryUserRepository>,
        sessions: Arc<InMemorySessionRepository>,
        config: Arc<AuthConfig>,
        user: User,
    }

    async fn fixture() -> Fixture {
        let users = Arc::new(InMemoryUserRepository::default());
        let hash = ClearTextPassword::new("correct horse battery")
            .unwrap()
            .hash()
            .unwrap();
        let user = User::new("ada@example.com", "Ada", hash);
        users.create(&user).await.unwrap();

        Fixture {
            users,
            sessions: Arc::new(InMemorySessionRepository::default()),
            config: Arc::new(AuthConfig::with_random_secret()),
            user,
        }
    }

    impl Fixture {
        fn use_case(&self) -> CheckSessionUseCase<InMemoryUserRepository, InMemorySessionRepository> {
            CheckSessionUseCase::new(self.users.clone(), self.sessions.clone(), self.config.clone())
        }
    }

    #[tokio::test]
    async fn test_valid_session_resolves_user() {
        let f = fixture().await;
        let session = AuthSession::new(f.user.user_id, TimeDelta::hours(1));
        f.sessions.create(&session).await.unwrap();

        let token = session_token::issue(&f.config, &session.session_id);
        let current = f.use_case().execute(&token).await.unwrap();
        assert_eq!(current.id, f.user.user_id);
        assert_eq!(current.session_id, session.session_id);
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected_and_deleted() {
        let f = fixture().await;
        let session = AuthSession::new(f.user.user_id, TimeDelta::seconds(-1));
        f.sessions.create(&session).await.unwrap();

        let token = session_token::issue(&f.config, &session.session_id);
        assert!(matches!(
            f.use_case().execute(&token).await,
            Err(AuthError::SessionInvalid)
        ));
        assert!(f.sessions.find_by_id(&session.session_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_session_is_rejected() {
        let f = fixture().await;
        let token = session_token::issue(&f.config, &kernel::id::SessionId::new());
        assert!(matches!(
            f.use_case().execute(&token).await,
            Err(AuthError::SessionInvalid)
        ));
    }
}
