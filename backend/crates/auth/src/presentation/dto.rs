//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::CurrentUser;

/// Login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, message = "The password field is required."))]
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: CurrentUser,
    /// Where the client should navigate next (the intended URL, or "/")
    pub redirect_to: String,
}
