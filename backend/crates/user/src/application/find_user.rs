//! Find User Use Case

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::{User, UserRepository};
use crate::error::{UserError, UserResult};

pub struct FindUserUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> FindUserUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Look a user up by the string form of its id
    ///
    /// A malformed id is reported as not found, the same as an unknown one.
    pub async fn execute(&self, raw_id: &str) -> UserResult<User> {
        let user_id: UserId = raw_id.parse().map_err(|_| UserError::NotFound)?;

        self.repo
            .find_by_id(&user_id)
            .await?
            .ok_or(UserError::NotFound)
    }
}
