//! Notes REST endpoints.
//!
//! - `POST /notes` - Create a note
//! - `GET /notes` - List every note
//! - `GET /notes/{id}` - Get one note
//! - `PUT /notes/{id}` - Partially update a note
//! - `DELETE /notes/{id}` - Delete a note
//!
//! Handlers only extract path parameters and bodies; all rules live in the
//! core service.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use notes_core::{NewNote, Note, NotePatch};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Delete confirmation body.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Create a note: `POST /notes`
pub async fn create_note(
    State(state): State<AppState>,
    payload: Result<Json<NewNote>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    let Json(input) = payload.map_err(reject_body)?;
    let note = state.with_service(move |service| service.create(input)).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// List notes: `GET /notes`
pub async fn find_all(State(state): State<AppState>) -> ApiResult<Json<Vec<Note>>> {
    let notes = state.with_service(|service| service.find_all()).await?;
    Ok(Json(notes))
}

/// Get one note: `GET /notes/{id}`
pub async fn find_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Note>> {
    let note = state
        .with_service(move |service| service.find_one(&id))
        .await?;
    Ok(Json(note))
}

/// Update a note: `PUT /notes/{id}`
pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NotePatch>, JsonRejection>,
) -> ApiResult<Json<Note>> {
    let Json(patch) = payload.map_err(reject_body)?;
    let note = state
        .with_service(move |service| service.update(&id, patch))
        .await?;
    Ok(Json(note))
}

/// Delete a note: `DELETE /notes/{id}`
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let confirmation = state
        .with_service(move |service| service.delete(&id))
        .await?;
    Ok(Json(DeleteResponse {
        message: confirmation.message.to_string(),
    }))
}

/// Liveness probe: `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// Bad JSON is the caller's data problem; transport-level refusals keep
// their own status.
fn reject_body(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
            ApiError::Validation(rejection.body_text())
        }
        other => ApiError::Rejected(other.status(), other.body_text()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_response_serialization() {
        let json = serde_json::to_string(&DeleteResponse {
            message: "Note deleted successfully".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"message":"Note deleted successfully"}"#);
    }

    #[test]
    fn test_update_body_ignores_unknown_fields() {
        let patch: NotePatch = serde_json::from_str(
            r#"{"id":"x","title":"t","content":"c","createdAt":5}"#,
        )
        .unwrap();
        assert_eq!(patch.title.as_deref(), Some("t"));
        assert_eq!(patch.content.as_deref(), Some("c"));
    }
}
