//! Repository Traits

use kernel::id::UserId;

use crate::domain::entity::User;
use crate::error::UserResult;

/// User persistence
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user; a duplicate email is `UserError::EmailTaken`
    async fn create(&self, user: &User) -> UserResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> UserResult<Option<User>>;

    /// Lookup by normalized email
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    async fn exists_by_email(&self, email: &str) -> UserResult<bool>;
}
