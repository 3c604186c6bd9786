pub mod cli;
pub mod client;
pub mod config;
pub mod entity;
pub mod error;
pub mod http;
pub mod logging;
pub mod service;
pub mod storage;

pub use client::NotesClient;
pub use config::Config;
pub use entity::{Note, NoteDraft, NoteId};
pub use error::{NotesError, Result};
pub use service::NoteService;
pub use storage::{MemoryStore, MongoStore, NoteStore};
