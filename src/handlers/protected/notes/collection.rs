// handlers/protected/notes/collection.rs - GET/POST /api/notes

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};

use super::utils::parse_note_input;
use crate::auth::Identity;
use crate::database::{Note, NoteInput};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /api/notes - caller's notes, newest first
pub async fn notes_get(State(state): State<AppState>, identity: Identity) -> ApiResult<Vec<Note>> {
    let notes = state.notes.list(&identity).await?;
    Ok(Json(notes))
}

/// POST /api/notes - create a note owned by the caller
///
/// Expected Input:
/// ```json
/// { "title": "string", "content": "string" }
/// ```
pub async fn notes_post(
    State(state): State<AppState>,
    identity: Identity,
    payload: Result<Json<NoteInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let input = parse_note_input(payload)?;
    let note = state.notes.create(&identity, input).await?;

    tracing::info!("Created note {} for '{}'", note.id, identity);
    Ok((StatusCode::CREATED, Json(note)))
}
