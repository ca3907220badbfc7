use std::sync::Arc;

use crate::auth::{Identity, TokenCodec};
use crate::database::NoteStore;

/// Shared handler state. Cheap to clone; everything lives behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub codec: Arc<TokenCodec>,
    pub notes: Arc<dyn NoteStore>,
    /// Identity `/login` issues tokens for
    pub login_identity: Identity,
}

impl AppState {
    pub fn new(codec: TokenCodec, notes: Arc<dyn NoteStore>, login_identity: Identity) -> Self {
        Self {
            codec: Arc::new(codec),
            notes,
            login_identity,
        }
    }
}
