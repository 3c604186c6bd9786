//! Document store gateway for the note collection.
//!
//! `NoteStore` is the seam between the service and the database. Every
//! implementation maps store-native documents to [`Note`] at its own edge, so
//! callers only ever see typed notes and [`NoteId`]s.

mod memory_store;
mod mongo_store;

pub use memory_store::MemoryStore;
pub use mongo_store::{MongoStore, NoteDocument};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entity::{Note, NoteId};
use crate::error::Result;

/// Insert payload for a new note. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full-replace payload for an existing note. `created_at` is never part of it.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteChanges {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

/// Single-document primitives over the note collection.
///
/// Each call touches at most one document and is atomic at the store level.
/// Absence is reported as `None`/`false`; only infrastructure failures are
/// errors.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Up to `limit` notes in store-native order.
    async fn list(&self, limit: usize) -> Result<Vec<Note>>;

    async fn get(&self, id: &NoteId) -> Result<Option<Note>>;

    /// Insert and return the stored note with its generated id.
    async fn insert(&self, note: NewNote) -> Result<Note>;

    /// Replace title, content and tags and return the post-update note.
    async fn replace(&self, id: &NoteId, changes: NoteChanges) -> Result<Option<Note>>;

    /// Returns whether a document was removed.
    async fn delete(&self, id: &NoteId) -> Result<bool>;

    /// Round-trip to the store to check connectivity.
    async fn ping(&self) -> Result<()>;
}
