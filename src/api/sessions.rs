//! Session API endpoints
//!
//! Handles HTTP requests for chat session CRUD.

use crate::api::utils::RouterState;
use crate::error::AppError;
use crate::storage::{NewSession, Session, SessionPatch};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

/// GET /api/sessions - List all sessions, most recently updated first
pub async fn list_sessions(
    State((storage, _, _)): State<RouterState>,
) -> Result<Json<Vec<Session>>, AppError> {
    let sessions = storage.list_sessions().await?;
    Ok(Json(sessions))
}

/// GET /api/sessions/:id - Get a single session
pub async fn get_session(
    State((storage, _, _)): State<RouterState>,
    Path(id): Path<String>,
) -> Result<Json<Session>, AppError> {
    let session = storage
        .get_session(&id)
        .await?
        .ok_or_else(|| AppError::SessionNotFound(id))?;
    Ok(Json(session))
}

/// POST /api/sessions - Create a new session
pub async fn create_session(
    State((storage, _, _)): State<RouterState>,
    Json(request): Json<NewSession>,
) -> Result<(StatusCode, Json<Session>), AppError> {
    let session = storage.create_session(request).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// PATCH /api/sessions/:id - Merge partial fields over a session
pub async fn update_session(
    State((storage, _, _)): State<RouterState>,
    Path(id): Path<String>,
    Json(request): Json<SessionPatch>,
) -> Result<Json<Session>, AppError> {
    let session = storage
        .update_session(&id, request)
        .await?
        .ok_or_else(|| AppError::SessionNotFound(id))?;
    Ok(Json(session))
}

/// DELETE /api/sessions/:id - Delete a session and all its messages
pub async fn delete_session(
    State((storage, _, _)): State<RouterState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !storage.delete_session(&id).await? {
        return Err(AppError::SessionNotFound(id));
    }
    Ok(StatusCode::NO_CONTENT)
}
