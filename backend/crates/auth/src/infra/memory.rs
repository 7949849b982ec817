//! In-memory Session Store

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use kernel::id::SessionId;
use tokio::sync::RwLock;

use crate::domain::{AuthSession, SessionRepository};
use crate::error::AuthResult;

#[derive(Clone, Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<SessionId, AuthSession>>>,
}

impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()> {
        self.sessions
            .write()
            .await
            .insert(session.session_id, session.clone());
        Ok(())
    }

    async fn find_by_id(&self, session_id: &SessionId) -> AuthResult<Option<AuthSession>> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn delete(&self, session_id: &SessionId) -> AuthResult<()> {
        self.sessions.write().await.remove(session_id);
        Ok(())
    }

    async fn delete_expired(&self) -> AuthResult<u64> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        Ok((before - sessions.len()) as u64)
    }
}
