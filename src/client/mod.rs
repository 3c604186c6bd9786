//! Typed HTTP client for the notes API.

mod filter;

pub use filter::{tag_summary, NoteFilter};

use reqwest::{Response, Url};
use serde::Deserialize;

use crate::entity::{Note, NoteDraft};
use crate::error::{NotesError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/notes/";

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Debug, Clone)]
pub struct NotesClient {
    http: reqwest::Client,
    collection_url: Url,
}

impl NotesClient {
    /// Create a client for the collection at `api_url`.
    ///
    /// A missing trailing slash is added, since the server answers the bare
    /// collection path with a redirect.
    pub fn new(api_url: &str) -> Result<Self> {
        let normalized = if api_url.ends_with('/') {
            api_url.to_string()
        } else {
            format!("{}/", api_url)
        };
        let collection_url = Url::parse(&normalized)
            .map_err(|e| NotesError::Config(format!("invalid API URL '{}': {}", api_url, e)))?;

        Ok(Self {
            http: reqwest::Client::new(),
            collection_url,
        })
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection_url
    }

    fn note_url(&self, id: &str) -> Result<Url> {
        let mut url = self.collection_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                NotesError::Config(format!("API URL cannot be a base: {}", self.collection_url))
            })?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    pub async fn list(&self) -> Result<Vec<Note>> {
        let response = self.http.get(self.collection_url.clone()).send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn get(&self, id: &str) -> Result<Note> {
        let response = self.http.get(self.note_url(id)?).send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn create(&self, draft: &NoteDraft) -> Result<Note> {
        let response = self
            .http
            .post(self.collection_url.clone())
            .json(draft)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn update(&self, id: &str, draft: &NoteDraft) -> Result<Note> {
        let response = self.http.put(self.note_url(id)?).json(draft).send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let response = self.http.delete(self.note_url(id)?).send().await?;
        check(response).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into `NotesError::Api`, using the `detail` field when present.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.detail)
        .unwrap_or_else(|_| {
            if text.is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                text
            }
        });

    tracing::debug!(status = status.as_u16(), %detail, "API request failed");
    Err(NotesError::Api {
        status: status.as_u16(),
        detail,
    })
}
