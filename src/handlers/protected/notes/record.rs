// handlers/protected/notes/record.rs - GET/PUT/DELETE /api/notes/:id

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use serde::Serialize;

use super::utils::{parse_note_id, parse_note_input};
use crate::auth::Identity;
use crate::database::{Note, NoteInput};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: i32,
}

/// GET /api/notes/:id
pub async fn note_get(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> ApiResult<Note> {
    let id = parse_note_id(&id)?;
    let note = state.notes.get(&identity, id).await?;
    Ok(Json(note))
}

/// PUT /api/notes/:id - replace title and content
pub async fn note_put(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    payload: Result<Json<NoteInput>, JsonRejection>,
) -> ApiResult<Note> {
    let id = parse_note_id(&id)?;
    let input = parse_note_input(payload)?;
    let note = state.notes.update(&identity, id, input).await?;
    Ok(Json(note))
}

/// DELETE /api/notes/:id
pub async fn note_delete(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> ApiResult<DeletedResponse> {
    let id = parse_note_id(&id)?;
    state.notes.delete(&identity, id).await?;

    tracing::info!("Deleted note {} for '{}'", id, identity);
    Ok(Json(DeletedResponse { deleted: id }))
}
