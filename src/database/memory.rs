use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::auth::Identity;
use crate::database::manager::DatabaseError;
use crate::database::models::{Note, NoteInput};
use crate::database::repository::{note_not_found, NoteStore};

/// Process-local note store with the same scoping rules as `PgNoteStore`.
///
/// Used by `--in-memory` runs and the integration tests; contents are lost
/// on exit.
#[derive(Debug, Default)]
pub struct MemoryNoteStore {
    inner: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i32,
    notes: BTreeMap<i32, Note>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn owned<'a>(state: &'a MemoryState, owner: &Identity, id: i32) -> Option<&'a Note> {
    state
        .notes
        .get(&id)
        .filter(|note| note.user_id == owner.as_str())
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn list(&self, owner: &Identity) -> Result<Vec<Note>, DatabaseError> {
        let state = self.inner.read().await;
        Ok(state
            .notes
            .values()
            .rev()
            .filter(|note| note.user_id == owner.as_str())
            .cloned()
            .collect())
    }

    async fn get(&self, owner: &Identity, id: i32) -> Result<Note, DatabaseError> {
        let state = self.inner.read().await;
        owned(&state, owner, id)
            .cloned()
            .ok_or_else(|| note_not_found(id))
    }

    async fn create(&self, owner: &Identity, input: NoteInput) -> Result<Note, DatabaseError> {
        let mut state = self.inner.write().await;
        state.last_id += 1;
        let note = Note {
            id: state.last_id,
            user_id: owner.as_str().to_string(),
            title: input.title,
            content: input.content,
            created_at: Utc::now(),
        };
        state.notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn update(
        &self,
        owner: &Identity,
        id: i32,
        input: NoteInput,
    ) -> Result<Note, DatabaseError> {
        let mut state = self.inner.write().await;
        let note = state
            .notes
            .get_mut(&id)
            .filter(|note| note.user_id == owner.as_str())
            .ok_or_else(|| note_not_found(id))?;

        note.title = input.title;
        note.content = input.content;
        Ok(note.clone())
    }

    async fn delete(&self, owner: &Identity, id: i32) -> Result<(), DatabaseError> {
        let mut state = self.inner.write().await;
        if owned(&state, owner, id).is_none() {
            return Err(note_not_found(id));
        }
        state.notes.remove(&id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str) -> NoteInput {
        NoteInput {
            title: title.to_string(),
            content: format!("{} body", title),
        }
    }

    #[tokio::test]
    async fn notes_are_scoped_to_owner() {
        let store = MemoryNoteStore::new();
        let alice = Identity::new("alice").unwrap();
        let bob = Identity::new("bob").unwrap();

        let first = store.create(&alice, input("groceries")).await.unwrap();
        let second = store.create(&alice, input("todo")).await.unwrap();
        let bobs = store.create(&bob, input("secret")).await.unwrap();

        let listed = store.list(&alice).await.unwrap();
        assert_eq!(
            listed.iter().map(|n| n.id).collect::<Vec<_>>(),
            vec![second.id, first.id]
        );
        assert!(listed.iter().all(|n| n.user_id == "alice"));

        assert!(matches!(store.get(&alice, bobs.id).await, Err(DatabaseError::NotFound(_))));
        assert!(matches!(
            store.update(&alice, bobs.id, input("hijack")).await,
            Err(DatabaseError::NotFound(_))
        ));
        assert!(matches!(store.delete(&alice, bobs.id).await, Err(DatabaseError::NotFound(_))));
        assert_eq!(store.get(&bob, bobs.id).await.unwrap().title, "secret");
    }

    #[tokio::test]
    async fn update_and_delete_round_trip() {
        let store = MemoryNoteStore::new();
        let alice = Identity::new("alice").unwrap();

        let note = store.create(&alice, input("draft")).await.unwrap();
        let updated = store.update(&alice, note.id, input("final")).await.unwrap();
        assert_eq!(updated.title, "final");
        assert_eq!(updated.created_at, note.created_at);

        store.delete(&alice, note.id).await.unwrap();
        assert!(matches!(store.get(&alice, note.id).await, Err(DatabaseError::NotFound(_))));
        assert!(matches!(store.delete(&alice, note.id).await, Err(DatabaseError::NotFound(_))));
    }
}
