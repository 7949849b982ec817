//! Authenticated user, inserted into request extensions by `require_auth`

use kernel::id::{SessionId, UserId};
use serde::Serialize;
use user::User;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
    pub name: String,
    #[serde(skip)]
    pub session_id: SessionId,
}

impl CurrentUser {
    pub fn new(user: User, session_id: SessionId) -> Self {
        Self {
            id: user.user_id,
            email: user.email,
            name: user.name,
            session_id,
        }
    }
}
