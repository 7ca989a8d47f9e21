//! Note records and the create/edit draft.

use crate::tags::split_tags;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// A note as returned by `GET /notes` and `GET /search`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Note {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Comma-separated tag string; missing and `null` both read as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: String,
    #[serde(rename = "fileUrl", default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Note {
    /// Trimmed, non-empty tags in the order they were written.
    pub fn tag_list(&self) -> Vec<&str> {
        split_tags(&self.tags).collect()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        split_tags(&self.tags).any(|candidate| candidate == tag)
    }

    /// Absolute attachment URL, resolved against the API base URL.
    ///
    /// Absolute `fileUrl` values are returned unchanged.
    pub fn attachment_url(&self, api_url: &str) -> Option<String> {
        let file_url = self.file_url.as_deref().map(str::trim)?;
        if file_url.is_empty() {
            return None;
        }
        if file_url.starts_with("http://") || file_url.starts_with("https://") {
            return Some(file_url.to_string());
        }
        let base = api_url.trim_end_matches('/');
        if file_url.starts_with('/') {
            Some(format!("{}{}", base, file_url))
        } else {
            Some(format!("{}/{}", base, file_url))
        }
    }
}

/// Whether a submitted draft creates a note or replaces an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    Create,
    Update { id: String },
}

impl SaveTarget {
    pub fn from_editing_id(editing_id: Option<&str>) -> Self {
        match editing_id {
            Some(id) => Self::Update { id: id.to_string() },
            None => Self::Create,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update { .. } => "Update",
        }
    }
}

/// Unsaved contents of the create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tags: String,
    pub attachment: Option<PathBuf>,
}

impl NoteDraft {
    /// Draft pre-filled from an existing note. Attachments are never copied.
    pub fn from_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            tags: note.tags.clone(),
            attachment: None,
        }
    }

    /// Title and content are required, tags and attachment are optional.
    ///
    /// # Errors
    /// Returns the message to show when a required field is blank.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("Title is required");
        }
        if self.content.trim().is_empty() {
            return Err("Content is required");
        }
        Ok(())
    }

    pub fn is_blank(&self) -> bool {
        self.title.is_empty()
            && self.content.is_empty()
            && self.tags.is_empty()
            && self.attachment.is_none()
    }
}
