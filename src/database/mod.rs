pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryNoteStore;
pub use models::{Note, NoteInput};
pub use repository::{NoteStore, PgNoteStore};
