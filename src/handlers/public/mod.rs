// handlers/public/mod.rs - Handlers reachable without a token

pub mod auth;
pub mod system;

pub use auth::login_post;
pub use system::{health_get, root_get};
