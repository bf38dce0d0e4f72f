//! HTTP client for the notes REST API.
//!
//! # Responsibility
//! - Wrap the four note endpoints as plain async calls.
//! - Normalize the store identifier field (`id` or `_id`) into `id`.
//!
//! # Invariants
//! - One request per call: no retry, no timeout, no caching.
//! - Transport and status errors reach the caller unchanged.

use std::future::Future;

use log::debug;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/notes/";

/// Note as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

/// Editable fields sent on create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

impl From<&NoteRecord> for NoteDraft {
    fn from(note: &NoteRecord) -> Self {
        Self::new(note.title.clone(), note.content.clone())
    }
}

/// Delete acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeleteConfirmation {
    pub message: String,
}

/// Structured error body returned by the server.
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    message: String,
}

/// The four note operations the view depends on.
pub trait NotesApi {
    fn fetch_notes(&self) -> impl Future<Output = ClientResult<Vec<NoteRecord>>> + Send;
    fn create_note(
        &self,
        draft: &NoteDraft,
    ) -> impl Future<Output = ClientResult<NoteRecord>> + Send;
    fn update_note(
        &self,
        id: &str,
        draft: &NoteDraft,
    ) -> impl Future<Output = ClientResult<NoteRecord>> + Send;
    fn delete_note(&self, id: &str)
        -> impl Future<Output = ClientResult<DeleteConfirmation>> + Send;
}

/// `reqwest`-backed API client bound to one base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    /// Creates a client for the collection at `base_url`.
    ///
    /// A trailing slash is added when missing so identifiers join as path
    /// segments.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base_url = Url::parse(&normalized)
            .map_err(|err| ClientError::InvalidUrl(format!("`{normalized}`: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!(
                "`{normalized}` cannot be used as a base"
            )));
        }

        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn note_url(&self, id: &str) -> ClientResult<Url> {
        if id.is_empty() || id.contains('/') {
            return Err(ClientError::InvalidUrl(format!("invalid note id `{id}`")));
        }
        self.base_url
            .join(id)
            .map_err(|err| ClientError::InvalidUrl(format!("`{id}`: {err}")))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("event=api_request module=client status=start method={method} url={url}");
        self.http.request(method, url)
    }
}

impl NotesApi for ApiClient {
    async fn fetch_notes(&self) -> ClientResult<Vec<NoteRecord>> {
        let response = self
            .request(Method::GET, self.base_url.clone())
            .send()
            .await?;
        decode(response).await
    }

    async fn create_note(&self, draft: &NoteDraft) -> ClientResult<NoteRecord> {
        let response = self
            .request(Method::POST, self.base_url.clone())
            .json(draft)
            .send()
            .await?;
        decode(response).await
    }

    async fn update_note(&self, id: &str, draft: &NoteDraft) -> ClientResult<NoteRecord> {
        let url = self.note_url(id)?;
        let response = self.request(Method::PUT, url).json(draft).send().await?;
        decode(response).await
    }

    async fn delete_note(&self, id: &str) -> ClientResult<DeleteConfirmation> {
        let url = self.note_url(id)?;
        let response = self.request(Method::DELETE, url).send().await?;
        decode(response).await
    }
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await?;
    let message = serde_json::from_str::<ErrorPayload>(&body)
        .map(|payload| payload.message)
        .unwrap_or(body);
    Err(ClientError::Server {
        status: status.as_u16(),
        message,
    })
}
