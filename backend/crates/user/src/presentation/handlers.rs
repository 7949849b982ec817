//! HTTP Handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use kernel::extract::ValidatedJson;
use kernel::response::ApiResponse;

use crate::application::{FindUserUseCase, RegisterInput, RegisterUseCase};
use crate::domain::UserRepository;
use crate::error::UserResult;
use crate::presentation::dto::{RegisterRequest, UserResponse};

/// Shared state for user handlers
#[derive(Clone)]
pub struct UserAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
}

/// POST /users
pub async fn register<R>(
    State(state): State<UserAppState<R>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> UserResult<ApiResponse<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let input = RegisterInput {
        email: req.email,
        name: req.name,
        password: req.password,
    };

    let user = RegisterUseCase::new(state.repo.clone())
        .execute(input)
        .await?;

    Ok(ApiResponse::created(UserResponse::from(user)).message("User registered"))
}

/// GET /users/{id}
pub async fn show<R>(
    State(state): State<UserAppState<R>>,
    Path(id): Path<String>,
) -> UserResult<ApiResponse<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user = FindUserUseCase::new(state.repo.clone())
        .execute(&id)
        .await?;

    Ok(ApiResponse::ok(UserResponse::from(user)))
}
