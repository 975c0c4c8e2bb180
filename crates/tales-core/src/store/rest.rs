//! PostgREST-backed note store.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;

use super::NoteStore;
use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::models::{Note, NoteDraft, NoteId};

/// Longest raw response body quoted in an error message, in characters
const MAX_ERROR_BODY_CHARS: usize = 180;

/// Note store talking to the hosted table's REST endpoint.
#[derive(Clone)]
pub struct RestNoteStore {
    table_url: String,
    anon_key: String,
    client: Client,
}

impl RestNoteStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        Ok(Self {
            table_url: config.rest_table_url(),
            anon_key: config.anon_key.clone(),
            client: Client::builder().build()?,
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        let response = self.authorized(request).send().await?;
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(Error::Api(parse_api_error(status, &body)))
    }

    fn id_filter(id: &NoteId) -> (&'static str, String) {
        ("id", format!("eq.{id}"))
    }
}

#[async_trait]
impl NoteStore for RestNoteStore {
    async fn list_newest_first(&self) -> Result<Vec<Note>> {
        let request = self
            .client
            .get(&self.table_url)
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        let response = self.send(request).await?;
        let body = response.text().await?;
        let notes: Vec<Note> = serde_json::from_str(&body)?;
        tracing::debug!("Fetched {} notes from store", notes.len());
        Ok(notes)
    }

    async fn insert(&self, draft: &NoteDraft) -> Result<()> {
        let request = self
            .client
            .post(&self.table_url)
            .header("Prefer", "return=minimal")
            .json(&[draft]);
        self.send(request).await?;
        Ok(())
    }

    async fn update(&self, id: &NoteId, draft: &NoteDraft) -> Result<()> {
        let request = self
            .client
            .patch(&self.table_url)
            .query(&[Self::id_filter(id)])
            .header("Prefer", "return=minimal")
            .json(draft);
        self.send(request).await?;
        Ok(())
    }

    async fn delete(&self, id: &NoteId) -> Result<()> {
        let request = self
            .client
            .delete(&self.table_url)
            .query(&[Self::id_filter(id)]);
        self.send(request).await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    error: Option<String>,
    hint: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return match payload.hint {
                Some(hint) if !hint.trim().is_empty() => {
                    format!("{} ({}; hint: {})", message.trim(), status.as_u16(), hint.trim())
                }
                _ => format!("{} ({})", message.trim(), status.as_u16()),
            };
        }
    }

    let trimmed = body
        .trim()
        .chars()
        .take(MAX_ERROR_BODY_CHARS)
        .collect::<String>();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}
