//! Note use-cases over an injected [`NoteStore`].
//!
//! Identifiers arrive as raw strings and are parsed here, before any store
//! round-trip, so a malformed id is always `InvalidIdentifier` and never
//! `NotFound`. Timestamps are stamped here as well; stores only persist them.

use std::sync::Arc;

use chrono::Utc;

use crate::entity::{Note, NoteDraft, NoteId};
use crate::error::{NotesError, Result};
use crate::storage::{NewNote, NoteChanges, NoteStore};

/// Hard cap on the number of notes returned by `list_notes`.
pub const MAX_LIST_LIMIT: usize = 100;

#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn NoteStore>,
}

impl NoteService {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    pub async fn list_notes(&self) -> Result<Vec<Note>> {
        self.store.list(MAX_LIST_LIMIT).await
    }

    pub async fn get_note(&self, id: &str) -> Result<Note> {
        let id: NoteId = id.parse()?;
        self.store
            .get(&id)
            .await?
            .ok_or_else(|| NotesError::NotFound(id.to_string()))
    }

    pub async fn create_note(&self, draft: NoteDraft) -> Result<Note> {
        draft.validate()?;
        let (title, content, tags) = draft.into_parts();

        let now = Utc::now();
        let note = self
            .store
            .insert(NewNote {
                title,
                content,
                tags,
                created_at: now,
                updated_at: now,
            })
            .await?;

        tracing::info!(id = %note.id, "note created");
        Ok(note)
    }

    pub async fn update_note(&self, id: &str, draft: NoteDraft) -> Result<Note> {
        let id: NoteId = id.parse()?;
        draft.validate()?;
        let (title, content, tags) = draft.into_parts();

        let changes = NoteChanges {
            title,
            content,
            tags,
            updated_at: Utc::now(),
        };
        let note = self
            .store
            .replace(&id, changes)
            .await?
            .ok_or_else(|| NotesError::NotFound(id.to_string()))?;

        tracing::info!(%id, "note updated");
        Ok(note)
    }

    pub async fn delete_note(&self, id: &str) -> Result<()> {
        let id: NoteId = id.parse()?;
        if !self.store.delete(&id).await? {
            return Err(NotesError::NotFound(id.to_string()));
        }

        tracing::info!(%id, "note deleted");
        Ok(())
    }

    /// Check that the store answers.
    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }
}
