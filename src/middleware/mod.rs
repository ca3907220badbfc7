pub mod auth;
pub mod cors;

pub use auth::{bearer_token, require_identity, AuthRejection};
pub use cors::cors_layer;
