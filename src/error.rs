use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotesError {
    #[error("Invalid note ID: {0}")]
    InvalidIdentifier(String),

    #[error("Note not found: {0}")]
    NotFound(String),

    #[error("Validation failed for field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Document store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Malformed stored document: {0}")]
    CorruptDocument(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NotesError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        NotesError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<mongodb::error::Error> for NotesError {
    fn from(err: mongodb::error::Error) -> Self {
        NotesError::StoreUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NotesError>;
