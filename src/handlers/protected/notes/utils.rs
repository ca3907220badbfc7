use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::database::NoteInput;
use crate::error::ApiError;

/// Parse the `:id` path segment
pub fn parse_note_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>().map_err(|_| ApiError::bad_request("invalid id"))
}

/// Unwrap a JSON body, turning extractor rejections into a 400 with a JSON body
pub fn parse_note_input(
    payload: Result<Json<NoteInput>, JsonRejection>,
) -> Result<NoteInput, ApiError> {
    match payload {
        Ok(Json(input)) => Ok(input),
        Err(rejection) => {
            tracing::debug!("Rejected note body: {}", rejection.body_text());
            Err(ApiError::bad_request("invalid input"))
        }
    }
}
