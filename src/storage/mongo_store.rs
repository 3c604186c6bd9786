use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use mongodb::options::{ClientOptions, ReturnDocument};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use super::{NewNote, NoteChanges, NoteStore};
use crate::entity::{Note, NoteId};
use crate::error::{NotesError, Result};

const APP_NAME: &str = "notes-api";

/// Shape of a note as persisted in the collection.
///
/// Documents written by older clients may carry `tags: null` or no `tags` at
/// all; both read back as an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    pub created_at: BsonDateTime,
    pub updated_at: BsonDateTime,
}

impl NoteDocument {
    pub fn into_note(self) -> Result<Note> {
        let id = self.id.ok_or_else(|| {
            NotesError::CorruptDocument("stored note has no _id".to_string())
        })?;
        Ok(Note {
            id: NoteId::from(id),
            title: self.title,
            content: self.content,
            tags: self.tags.unwrap_or_default(),
            created_at: from_bson_datetime(self.created_at)?,
            updated_at: from_bson_datetime(self.updated_at)?,
        })
    }
}

impl From<NewNote> for NoteDocument {
    fn from(note: NewNote) -> Self {
        Self {
            id: None,
            title: note.title,
            content: note.content,
            tags: Some(note.tags),
            created_at: to_bson_datetime(note.created_at),
            updated_at: to_bson_datetime(note.updated_at),
        }
    }
}

fn to_bson_datetime(dt: DateTime<Utc>) -> BsonDateTime {
    BsonDateTime::from_millis(dt.timestamp_millis())
}

fn from_bson_datetime(dt: BsonDateTime) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis()).ok_or_else(|| {
        NotesError::CorruptDocument(format!("stored timestamp out of range: {}", dt))
    })
}

/// Gateway to the MongoDB note collection.
///
/// The driver's `Client` pools connections internally and is cheap to clone,
/// so one `MongoStore` is built at startup and shared by every request.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    collection: Collection<NoteDocument>,
}

impl MongoStore {
    /// Build a client for `uri` bound to `database.collection`.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self> {
        let mut options = ClientOptions::parse(uri).await?;
        options.app_name = Some(APP_NAME.to_string());
        let client = Client::with_options(options)?;
        let collection = client
            .database(database)
            .collection::<NoteDocument>(collection);

        tracing::info!(
            database,
            collection = collection.name(),
            "document store client created"
        );

        Ok(Self { client, collection })
    }
}

#[async_trait]
impl NoteStore for MongoStore {
    async fn list(&self, limit: usize) -> Result<Vec<Note>> {
        let cursor = self
            .collection
            .find(doc! {})
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .await?;
        let documents: Vec<NoteDocument> = cursor.try_collect().await?;

        tracing::debug!(count = documents.len(), "listed notes");
        documents.into_iter().map(NoteDocument::into_note).collect()
    }

    async fn get(&self, id: &NoteId) -> Result<Option<Note>> {
        let document = self
            .collection
            .find_one(doc! { "_id": id.object_id() })
            .await?;
        document.map(NoteDocument::into_note).transpose()
    }

    async fn insert(&self, note: NewNote) -> Result<Note> {
        let mut document = NoteDocument::from(note);
        let result = self.collection.insert_one(&document).await?;
        let oid = result.inserted_id.as_object_id().ok_or_else(|| {
            NotesError::StoreUnavailable(format!(
                "unexpected inserted id: {}",
                result.inserted_id
            ))
        })?;
        document.id = Some(oid);

        tracing::debug!(id = %oid, "inserted note");
        document.into_note()
    }

    async fn replace(&self, id: &NoteId, changes: NoteChanges) -> Result<Option<Note>> {
        let update = doc! {
            "$set": {
                "title": changes.title,
                "content": changes.content,
                "tags": changes.tags,
                "updated_at": to_bson_datetime(changes.updated_at),
            }
        };
        let document = self
            .collection
            .find_one_and_update(doc! { "_id": id.object_id() }, update)
            .return_document(ReturnDocument::After)
            .await?;

        tracing::debug!(%id, found = document.is_some(), "replaced note");
        document.map(NoteDocument::into_note).transpose()
    }

    async fn delete(&self, id: &NoteId) -> Result<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.object_id() })
            .await?;

        tracing::debug!(%id, deleted = result.deleted_count, "deleted note");
        Ok(result.deleted_count > 0)
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}
