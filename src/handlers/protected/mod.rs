// handlers/protected/mod.rs - Handlers behind the bearer token gate
//
// Every handler here takes the caller's `Identity` as an extractor argument.
// That identity comes from the verified token only; request bodies never
// decide whose data is touched.

pub mod auth;
pub mod notes;

pub use auth::whoami_get;
pub use notes::{note_delete, note_get, note_put, notes_get, notes_post};
