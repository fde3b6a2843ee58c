//! Login, registration and caller identity.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
};
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};
use crate::identity::{WhoAmI, whoami};
use crate::store::{self, User};

#[derive(Debug, Default, Deserialize)]
pub(super) struct Credentials {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// Public view of a user.
#[derive(Debug, Serialize)]
pub(super) struct UserResponse {
    id: u64,
    username: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Handler for GET /api/whoami
pub(super) async fn handle_whoami(headers: HeaderMap) -> Json<WhoAmI> {
    let authorization = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    Json(whoami(authorization))
}

/// Handler for POST /api/auth/login
pub(super) async fn handle_login(
    State(state): State<AppState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Ok(Json(credentials)) = body else {
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    let user = store::authenticate(
        state.store.as_ref(),
        &credentials.username,
        &credentials.password,
    )
    .await?;
    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(user.into()))
}

/// Handler for POST /api/auth/register
pub(super) async fn handle_register(
    State(state): State<AppState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let credentials = body.map(|Json(c)| c).unwrap_or_default();
    if credentials.username.trim().is_empty() || credentials.password.is_empty() {
        return Err(ApiError::bad_request("Username and password are required"));
    }

    let user = store::register_user(
        state.store.as_ref(),
        credentials.username.trim(),
        &credentials.password,
    )
    .await?;
    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}
