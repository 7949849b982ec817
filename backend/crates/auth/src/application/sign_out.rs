//! Sign Out Use Case
//!
//! Invalidates a user session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::domain::SessionRepository;
use crate::error::AuthResult;

pub struct SignOutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Delete the session a cookie token points at
    pub async fn execute(&self, session_token: &str) -> AuthResult<()> {
        let session_id = session_token::parse(&self.config, session_token)?;
        self.session_repo.delete(&session_id).await?;

        tracing::info!(session_id = %session_id, "User signed out");
        Ok(())
    }
}
