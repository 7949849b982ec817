//! Auth Session Entity
//!
//! A server-side session row; the cookie only carries its signed id.

use chrono::{DateTime, TimeDelta, Utc};
use kernel::id::{SessionId, UserId};

#[derive(Debug, Clone)]
pub struct AuthSession {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl AuthSession {
    /// Create a session for `user_id`
    ///
    /// TTL is provided by the application layer (config), not hard-coded here.
    pub fn new(user_id: UserId, ttl: TimeDelta) -> Self {
        let now = Utc::now();
        Self {
            session_id: SessionId::new(),
            user_id,
            expires_at: now + ttl,
            created_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_expiry() {
        let session = AuthSession::new(UserId::new(), TimeDelta::hours(1));
        assert!(!session.is_expired());
        assert!(session.is_expired_at(session.created_at + TimeDelta::hours(1)));
        assert!(!session.is_expired_at(session.created_at + TimeDelta::minutes(59)));
    }
}
