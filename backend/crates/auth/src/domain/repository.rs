//! Repository Traits
//!
//! Interfaces for session persistence. Implementations are in `infra`.

use kernel::id::SessionId;

use crate::domain::session::AuthSession;
use crate::error::AuthResult;

#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()>;

    async fn find_by_id(&self, session_id: &SessionId) -> AuthResult<Option<AuthSession>>;

    /// Delete a session; deleting an unknown id is not an error
    async fn delete(&self, session_id: &SessionId) -> AuthResult<()>;

    /// Remove expired sessions, returning how many were deleted
    async fn delete_expired(&self) -> AuthResult<u64>;
}
