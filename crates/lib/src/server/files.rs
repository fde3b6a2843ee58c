//! Editor files and the recently-opened list.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::store::{File, FileUpdate, NewFile, NewRecentFile, RecentFile, StoreError};

#[derive(Debug, Deserialize)]
pub(super) struct UserParams {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RecentFileBody {
    #[serde(default)]
    file_id: Option<u64>,
    #[serde(default)]
    user_id: Option<u64>,
}

fn parse_user_id(params: &UserParams) -> Result<u64, ApiError> {
    params
        .user_id
        .as_deref()
        .and_then(|raw| raw.trim().parse().ok())
        .ok_or_else(|| ApiError::bad_request("Invalid user ID"))
}

fn parse_file_id(raw: &str) -> Result<u64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid file ID"))
}

async fn existing_file(state: &AppState, id: u64) -> Result<File, ApiError> {
    state
        .store
        .file(id)
        .await?
        .ok_or_else(|| crate::Error::from(StoreError::FileNotFound { id }).into())
}

/// Handler for GET /api/files?userId=
pub(super) async fn handle_list_files(
    State(state): State<AppState>,
    Query(params): Query<UserParams>,
) -> Result<Json<Vec<File>>, ApiError> {
    let user_id = parse_user_id(&params)?;
    Ok(Json(state.store.files_by_user(user_id).await?))
}

/// Handler for GET /api/files/{id}
pub(super) async fn handle_get_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<File>, ApiError> {
    let id = parse_file_id(&id)?;
    Ok(Json(existing_file(&state, id).await?))
}

/// Handler for POST /api/files
pub(super) async fn handle_create_file(
    State(state): State<AppState>,
    body: Result<Json<NewFile>, JsonRejection>,
) -> Result<(StatusCode, Json<File>), ApiError> {
    let Json(new_file) =
        body.map_err(|e| ApiError::bad_request(format!("Invalid file data: {}", e.body_text())))?;

    let file = state.store.create_file(new_file).await?;
    tracing::info!(file_id = file.id, path = %file.path, "File created");
    Ok((StatusCode::CREATED, Json(file)))
}

/// Handler for PUT /api/files/{id}
pub(super) async fn handle_update_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<FileUpdate>, JsonRejection>,
) -> Result<Json<File>, ApiError> {
    let id = parse_file_id(&id)?;
    existing_file(&state, id).await?;
    let Json(update) =
        body.map_err(|e| ApiError::bad_request(format!("Invalid file data: {}", e.body_text())))?;

    Ok(Json(state.store.update_file(id, update).await?))
}

/// Handler for DELETE /api/files/{id}
pub(super) async fn handle_delete_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_file_id(&id)?;
    existing_file(&state, id).await?;
    state.store.delete_file(id).await?;
    tracing::info!(file_id = id, "File deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /api/recent-files?userId=
pub(super) async fn handle_list_recent_files(
    State(state): State<AppState>,
    Query(params): Query<UserParams>,
) -> Result<Json<Vec<RecentFile>>, ApiError> {
    let user_id = parse_user_id(&params)?;
    Ok(Json(state.store.recent_files_by_user(user_id).await?))
}

/// Handler for POST /api/recent-files
pub(super) async fn handle_add_recent_file(
    State(state): State<AppState>,
    body: Result<Json<RecentFileBody>, JsonRejection>,
) -> Result<(StatusCode, Json<RecentFile>), ApiError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let (Some(file_id), Some(user_id)) = (
        body.file_id.filter(|&id| id != 0),
        body.user_id.filter(|&id| id != 0),
    ) else {
        return Err(ApiError::bad_request("File ID and User ID are required"));
    };

    let recent = state
        .store
        .add_recent_file(NewRecentFile {
            file_id,
            user_id,
            opened_at: state.clock.timestamp(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(recent)))
}
