use std::future::Future;
use std::io::{self, Read};
use std::sync::Arc;

use tokio::net::TcpListener;

use super::commands::{NoteBodyArgs, ServeArgs, StoreArgs};
use crate::client::{tag_summary, NoteFilter, NotesClient};
use crate::config::Config;
use crate::entity::{Note, NoteDraft};
use crate::error::Result;
use crate::http;
use crate::service::NoteService;
use crate::storage::{MemoryStore, MongoStore, NoteStore};

/// Characters of content shown per note in list output.
const CONTENT_PREVIEW_CHARS: usize = 200;

fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Runtime::new()?;
    Ok(runtime.block_on(future))
}

fn resolve_config(store: &StoreArgs) -> Result<Config> {
    let mut config = Config::from_env()?;
    if let Some(uri) = &store.mongodb_uri {
        config.mongodb_uri = uri.clone();
    }
    if let Some(database) = &store.database {
        config.database = database.clone();
    }
    if let Some(collection) = &store.collection {
        config.collection = collection.clone();
    }
    Ok(config)
}

pub fn handle_serve(args: ServeArgs) -> Result<()> {
    let mut config = resolve_config(&args.store)?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    block_on(serve(config, args.in_memory))?
}

async fn serve(config: Config, in_memory: bool) -> Result<()> {
    let store: Arc<dyn NoteStore> = if in_memory {
        tracing::warn!("using in-memory store; notes are lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        let store =
            MongoStore::connect(&config.mongodb_uri, &config.database, &config.collection).await?;
        if let Err(e) = store.ping().await {
            tracing::warn!(error = %e, "document store not reachable at startup");
        }
        Arc::new(store)
    };

    let app = http::router(NoteService::new(store), &config.cors_origins);
    let listener = TcpListener::bind(config.bind_addr()).await?;
    http::serve(listener, app).await
}

pub fn handle_ping(args: StoreArgs) -> Result<()> {
    let config = resolve_config(&args)?;

    block_on(ping(&config))??;
    println!(
        "Document store reachable (database: {}, collection: {})",
        config.database, config.collection
    );
    Ok(())
}

async fn ping(config: &Config) -> Result<()> {
    let store =
        MongoStore::connect(&config.mongodb_uri, &config.database, &config.collection).await?;
    store.ping().await
}

pub fn handle_list(
    api_url: &str,
    search: Option<String>,
    tag: Option<String>,
    json: bool,
) -> Result<()> {
    let client = NotesClient::new(api_url)?;
    let notes = block_on(client.list())??;

    let filter = NoteFilter { search, tag };
    let shown = filter.apply(&notes);

    if json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    if shown.is_empty() {
        if filter.is_empty() {
            println!("No notes yet.");
        } else {
            println!("No notes match your search criteria.");
        }
        return Ok(());
    }

    if !filter.is_empty() {
        println!("Showing {} of {} notes", shown.len(), notes.len());
        println!();
    }
    for note in shown {
        println!("{}", format_note_summary(note));
    }
    Ok(())
}

pub fn handle_get(api_url: &str, id: String, json: bool) -> Result<()> {
    let client = NotesClient::new(api_url)?;
    let note = block_on(client.get(&id))??;

    if json {
        println!("{}", serde_json::to_string_pretty(&note)?);
    } else {
        println!("{}", format_note_detail(&note));
    }
    Ok(())
}

pub fn handle_add(api_url: &str, title: String, body: NoteBodyArgs, json: bool) -> Result<()> {
    let client = NotesClient::new(api_url)?;
    let draft = build_draft(title, body)?;
    let note = block_on(client.create(&draft))??;

    if json {
        println!("{}", serde_json::to_string_pretty(&note)?);
    } else {
        println!("Created note {}: {}", note.id, note.title);
    }
    Ok(())
}

pub fn handle_update(
    api_url: &str,
    id: String,
    title: String,
    body: NoteBodyArgs,
    json: bool,
) -> Result<()> {
    let client = NotesClient::new(api_url)?;
    let draft = build_draft(title, body)?;
    let note = block_on(client.update(&id, &draft))??;

    if json {
        println!("{}", serde_json::to_string_pretty(&note)?);
    } else {
        println!("Updated note {}: {}", note.id, note.title);
    }
    Ok(())
}

pub fn handle_delete(api_url: &str, id: String) -> Result<()> {
    let client = NotesClient::new(api_url)?;
    block_on(client.delete(&id))??;
    println!("Deleted note {}", id);
    Ok(())
}

pub fn handle_tags(api_url: &str, json: bool) -> Result<()> {
    let client = NotesClient::new(api_url)?;
    let notes = block_on(client.list())??;
    let summary = tag_summary(&notes);

    if json {
        let entries: Vec<serde_json::Value> = summary
            .iter()
            .map(|(tag, count)| serde_json::json!({ "tag": tag, "count": count }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if summary.is_empty() {
        println!("No tags in use.");
    } else {
        for (tag, count) in summary {
            println!("{:>4}  {}", count, tag);
        }
    }
    Ok(())
}

fn build_draft(title: String, body: NoteBodyArgs) -> Result<NoteDraft> {
    let content = if body.stdin {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;
        content
    } else {
        body.content.unwrap_or_default()
    };
    Ok(NoteDraft::new(title, content).with_tags(body.tags))
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

pub fn format_note_summary(note: &Note) -> String {
    let mut out = format!("{}  {}", note.id, note.title);
    if !note.tags.is_empty() {
        out.push_str(&format!("  [{}]", note.tags.join(", ")));
    }
    let preview = note.content.split_whitespace().collect::<Vec<_>>().join(" ");
    if !preview.is_empty() {
        out.push_str("\n    ");
        out.push_str(&truncate_chars(&preview, CONTENT_PREVIEW_CHARS));
    }
    out
}

pub fn format_note_detail(note: &Note) -> String {
    let mut out = format!("{}\n", note.title);
    out.push_str(&format!("  id:      {}\n", note.id));
    if !note.tags.is_empty() {
        out.push_str(&format!("  tags:    {}\n", note.tags.join(", ")));
    }
    out.push_str(&format!(
        "  created: {}\n",
        note.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!(
        "  updated: {}\n",
        note.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if !note.content.is_empty() {
        out.push('\n');
        out.push_str(&note.content);
    }
    out
}
