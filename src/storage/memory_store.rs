use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::{NewNote, NoteChanges, NoteStore};
use crate::entity::{Note, NoteId};
use crate::error::Result;

/// In-process note collection with the same semantics as the MongoDB gateway:
/// insertion order, store-assigned ObjectIds, hard deletes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    notes: RwLock<Vec<Note>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.notes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.notes.read().await.is_empty()
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn list(&self, limit: usize) -> Result<Vec<Note>> {
        let notes = self.notes.read().await;
        Ok(notes.iter().take(limit).cloned().collect())
    }

    async fn get(&self, id: &NoteId) -> Result<Option<Note>> {
        let notes = self.notes.read().await;
        Ok(notes.iter().find(|n| n.id == *id).cloned())
    }

    async fn insert(&self, note: NewNote) -> Result<Note> {
        let stored = Note {
            id: NoteId::from(ObjectId::new()),
            title: note.title,
            content: note.content,
            tags: note.tags,
            created_at: note.created_at,
            updated_at: note.updated_at,
        };
        self.notes.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn replace(&self, id: &NoteId, changes: NoteChanges) -> Result<Option<Note>> {
        let mut notes = self.notes.write().await;
        let Some(note) = notes.iter_mut().find(|n| n.id == *id) else {
            return Ok(None);
        };
        note.title = changes.title;
        note.content = changes.content;
        note.tags = changes.tags;
        note.updated_at = changes.updated_at;
        Ok(Some(note.clone()))
    }

    async fn delete(&self, id: &NoteId) -> Result<bool> {
        let mut notes = self.notes.write().await;
        let before = notes.len();
        notes.retain(|n| n.id != *id);
        Ok(notes.len() < before)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
