use clap::{Args, Parser, Subcommand};

use crate::client::DEFAULT_API_URL;

#[derive(Parser, Debug)]
#[command(name = "notes-api")]
#[command(version, about = "A small note-taking service and its command-line client")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Notes collection URL used by the client commands
    #[arg(long, global = true, env = "NOTES_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP service
    Serve(ServeArgs),

    /// Check connectivity to the document store
    Ping(StoreArgs),

    /// List notes
    List {
        /// Only notes whose title or content contains this text (case-insensitive)
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Only notes carrying this tag
        #[arg(long, short = 't')]
        tag: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Get a single note by ID
    Get {
        /// Note ID (24 hex characters)
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a new note
    Add {
        /// Note title
        title: String,

        #[command(flatten)]
        body: NoteBodyArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace an existing note's title, content and tags
    Update {
        /// Note ID (24 hex characters)
        id: String,

        /// New title
        #[arg(long)]
        title: String,

        #[command(flatten)]
        body: NoteBodyArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a note
    Delete {
        /// Note ID (24 hex characters)
        id: String,
    },

    /// Show tags in use with note counts
    Tags {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct NoteBodyArgs {
    /// Note content
    #[arg(long, short = 'c', conflicts_with = "stdin")]
    pub content: Option<String>,

    /// Read content from stdin
    #[arg(long)]
    pub stdin: bool,

    /// Tags (can be specified multiple times)
    #[arg(long = "tag", short = 't')]
    pub tags: Vec<String>,
}

/// Document store location. Unset flags fall back to the environment.
#[derive(Args, Debug, Default)]
pub struct StoreArgs {
    /// MongoDB connection string (default: $MONGODB_URI)
    #[arg(long)]
    pub mongodb_uri: Option<String>,

    /// Database name (default: $NOTES_DATABASE or notes_app_db)
    #[arg(long)]
    pub database: Option<String>,

    /// Collection name (default: $NOTES_COLLECTION or notes)
    #[arg(long)]
    pub collection: Option<String>,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Listen host (default: $NOTES_HOST or 0.0.0.0)
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port (default: $NOTES_PORT or 8000)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Keep notes in memory instead of MongoDB (lost on exit)
    #[arg(long)]
    pub in_memory: bool,
}
