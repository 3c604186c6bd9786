// src/entity/note.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NoteId;
use crate::error::{NotesError, Result};

/// Limits applied to incoming note payloads.
pub mod validation {
    pub const MAX_TITLE_LENGTH: usize = 500;
    pub const MAX_CONTENT_SIZE: usize = 102_400; // 100KB
    pub const MAX_TAG_LENGTH: usize = 100;
    pub const MAX_TAGS_COUNT: usize = 50;
}

/// A stored note, as returned by every read and write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or fully replacing a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tags: None,
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Check the draft against the payload limits.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(NotesError::validation("title", "Title is required"));
        }
        // Measured as stored, padding included.
        let title_len = self.title.chars().count();
        if title_len > validation::MAX_TITLE_LENGTH {
            return Err(NotesError::validation(
                "title",
                format!(
                    "Title too long: {} characters (max {})",
                    title_len,
                    validation::MAX_TITLE_LENGTH
                ),
            ));
        }
        if self.content.len() > validation::MAX_CONTENT_SIZE {
            return Err(NotesError::validation(
                "content",
                format!(
                    "Content too large: {} bytes (max {})",
                    self.content.len(),
                    validation::MAX_CONTENT_SIZE
                ),
            ));
        }
        if let Some(tags) = &self.tags {
            if tags.len() > validation::MAX_TAGS_COUNT {
                return Err(NotesError::validation(
                    "tags",
                    format!("Maximum {} tags allowed", validation::MAX_TAGS_COUNT),
                ));
            }
            for tag in tags {
                if tag.chars().count() > validation::MAX_TAG_LENGTH {
                    return Err(NotesError::validation(
                        "tags",
                        format!(
                            "Tag '{}' exceeds maximum length of {}",
                            tag,
                            validation::MAX_TAG_LENGTH
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Split into title, content and tags, with omitted tags as empty.
    pub fn into_parts(self) -> (String, String, Vec<String>) {
        (self.title, self.content, self.tags.unwrap_or_default())
    }
}
