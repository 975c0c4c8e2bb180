//! Note model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Store-assigned note identifier.
///
/// The hosted table may use integer or text keys, so the id is kept as its
/// textual form and only ever compared or echoed back to the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NoteId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput("note id must not be empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<u64> for NoteId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for NoteId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Ok(Self(text)),
            RawId::Number(number) => Ok(Self(number.to_string())),
        }
    }
}

/// A story as stored in the remote notes table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier
    pub id: NoteId,
    /// Display title
    pub title: String,
    /// Free text content
    pub body: String,
    /// Display name of the writer
    pub author: String,
    /// Creation timestamp assigned by the store
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Case-insensitive substring match over title, body and author.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.body.to_lowercase().contains(needle)
            || self.author.to_lowercase().contains(needle)
    }

    /// Form values for editing this note
    #[must_use]
    pub fn to_draft(&self) -> NoteDraft {
        NoteDraft {
            title: self.title.clone(),
            body: self.body.clone(),
            author: self.author.clone(),
        }
    }
}

/// User-entered fields of the creation/edit form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub body: String,
    pub author: String,
}

impl NoteDraft {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            author: author.into(),
        }
    }

    /// Trim every field, rejecting the draft when any of them ends up empty.
    pub fn normalized(&self) -> Result<Self> {
        let title = self.title.trim();
        let body = self.body.trim();
        let author = self.author.trim();

        if title.is_empty() || body.is_empty() || author.is_empty() {
            return Err(Error::InvalidInput(
                "title, body and author are required".to_string(),
            ));
        }

        Ok(Self::new(title, body, author))
    }
}
