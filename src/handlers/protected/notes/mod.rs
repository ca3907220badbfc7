// handlers/protected/notes/mod.rs - /api/notes endpoints
//
// collection.rs: GET, POST        /api/notes
// record.rs:     GET, PUT, DELETE /api/notes/:id

pub mod collection;
pub mod record;
pub mod utils;

pub use collection::{notes_get, notes_post};
pub use record::{note_delete, note_get, note_put};
