use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::Identity;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Note, NoteInput};

/// Per-user note storage.
///
/// Every read and write is scoped by the `owner` handed in by the caller,
/// which must be the identity the auth gate bound to the request.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// All of `owner`'s notes, newest first
    async fn list(&self, owner: &Identity) -> Result<Vec<Note>, DatabaseError>;

    async fn get(&self, owner: &Identity, id: i32) -> Result<Note, DatabaseError>;

    async fn create(&self, owner: &Identity, input: NoteInput) -> Result<Note, DatabaseError>;

    async fn update(
        &self,
        owner: &Identity,
        id: i32,
        input: NoteInput,
    ) -> Result<Note, DatabaseError>;

    async fn delete(&self, owner: &Identity, id: i32) -> Result<(), DatabaseError>;

    /// Connectivity check for health reporting
    async fn ping(&self) -> Result<(), DatabaseError>;
}

pub(crate) fn note_not_found(id: i32) -> DatabaseError {
    DatabaseError::NotFound(format!("note {} not found", id))
}

/// Postgres-backed store over the `notes` table
#[derive(Clone)]
pub struct PgNoteStore {
    pool: PgPool,
}

impl PgNoteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn list(&self, owner: &Identity) -> Result<Vec<Note>, DatabaseError> {
        let notes = sqlx::query_as::<_, Note>(
            "SELECT id, user_id, title, content, created_at
             FROM notes
             WHERE user_id = $1
             ORDER BY id DESC",
        )
        .bind(owner.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(notes)
    }

    async fn get(&self, owner: &Identity, id: i32) -> Result<Note, DatabaseError> {
        sqlx::query_as::<_, Note>(
            "SELECT id, user_id, title, content, created_at
             FROM notes
             WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(owner.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| note_not_found(id))
    }

    async fn create(&self, owner: &Identity, input: NoteInput) -> Result<Note, DatabaseError> {
        let note = sqlx::query_as::<_, Note>(
            "INSERT INTO notes (user_id, title, content, created_at)
             VALUES ($1, $2, $3, NOW())
             RETURNING id, user_id, title, content, created_at",
        )
        .bind(owner.as_str())
        .bind(&input.title)
        .bind(&input.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(note)
    }

    async fn update(
        &self,
        owner: &Identity,
        id: i32,
        input: NoteInput,
    ) -> Result<Note, DatabaseError> {
        sqlx::query_as::<_, Note>(
            "UPDATE notes
             SET title = $1, content = $2
             WHERE id = $3 AND user_id = $4
             RETURNING id, user_id, title, content, created_at",
        )
        .bind(&input.title)
        .bind(&input.content)
        .bind(id)
        .bind(owner.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| note_not_found(id))
    }

    async fn delete(&self, owner: &Identity, id: i32) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(note_not_found(id));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
