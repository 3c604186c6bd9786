use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use axum::response::Redirect;
use axum::Json;

use super::error::ApiError;
use crate::entity::{Note, NoteDraft};
use crate::service::NoteService;

pub async fn list_notes(State(service): State<NoteService>) -> Result<Json<Vec<Note>>, ApiError> {
    Ok(Json(service.list_notes().await?))
}

pub async fn get_note(
    State(service): State<NoteService>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Note>, ApiError> {
    let Path(id) = path?;
    Ok(Json(service.get_note(&id).await?))
}

pub async fn create_note(
    State(service): State<NoteService>,
    payload: Result<Json<NoteDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let Json(draft) = payload?;
    let note = service.create_note(draft).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn update_note(
    State(service): State<NoteService>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<NoteDraft>, JsonRejection>,
) -> Result<Json<Note>, ApiError> {
    let Json(draft) = payload?;
    let Path(id) = path?;
    Ok(Json(service.update_note(&id, draft).await?))
}

pub async fn delete_note(
    State(service): State<NoteService>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    service.delete_note(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `/notes` without the trailing slash: method-preserving redirect to the collection.
pub async fn redirect_to_collection(uri: Uri) -> Redirect {
    match uri.query() {
        Some(query) => Redirect::temporary(&format!("/notes/?{}", query)),
        None => Redirect::temporary("/notes/"),
    }
}

pub async fn fallback() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "detail": "Not Found" })),
    )
}
