// handlers/public/auth/login.rs - POST /login handler

use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /login - issue a bearer token
///
/// There is no credential store yet: the token is issued for the configured
/// login identity (`NOTES_DEMO_USER`). Nothing in the request body is used,
/// so a caller cannot pick who they become.
///
/// Output:
/// ```json
/// { "token": "eyJhbGciOiJIUzI1NiI..." }
/// ```
pub async fn login_post(State(state): State<AppState>) -> ApiResult<LoginResponse> {
    let token = state.codec.issue(&state.login_identity, None)?;

    tracing::info!(
        "Issued token for '{}' (ttl {}h)",
        state.login_identity,
        state.codec.default_ttl().num_hours()
    );

    Ok(Json(LoginResponse { token }))
}
