// handlers/protected/auth/whoami.rs - GET /api/whoami handler

use axum::response::Json;
use serde::Serialize;

use crate::auth::Identity;

#[derive(Debug, Serialize)]
pub struct WhoamiResponse {
    pub identity: Identity,
}

/// Echo the identity the gate bound to this request.
pub async fn whoami_get(identity: Identity) -> Json<WhoamiResponse> {
    Json(WhoamiResponse { identity })
}
