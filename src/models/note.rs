use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{NoteId, Tag};
use crate::NoteError;

/// A persisted note.
///
/// Title and text are never blank; `created_time` is fixed at creation and
/// is the default sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    id: NoteId,
    title: String,
    text: String,
    #[serde(with = "time::serde::rfc3339")]
    created_time: OffsetDateTime,
    tags: BTreeSet<Tag>,
}

impl Note {
    pub fn id(&self) -> &NoteId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_time(&self) -> OffsetDateTime {
        self.created_time
    }

    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    /// Replaces the title. Callers are responsible for rejecting blank input.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replaces the body text. Callers are responsible for rejecting blank input.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Replaces the whole tag set.
    pub fn set_tags(&mut self, tags: BTreeSet<Tag>) {
        self.tags = tags;
    }
}

/// Returns true if `value` is empty or whitespace only.
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Builder for constructing `Note` instances with optional fields.
///
/// # Examples
///
/// ```
/// use notes::{NoteBuilder, NoteId};
///
/// let note = NoteBuilder::new()
///     .id(NoteId::new("n-1"))
///     .title("Groceries")
///     .text("milk and eggs")
///     .build()
///     .unwrap();
///
/// assert_eq!(note.title(), "Groceries");
/// assert!(note.tags().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct NoteBuilder {
    id: Option<NoteId>,
    title: Option<String>,
    text: Option<String>,
    created_time: Option<OffsetDateTime>,
    tags: Option<BTreeSet<Tag>>,
}

impl NoteBuilder {
    /// Creates a new `NoteBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the note ID.
    pub fn id(mut self, id: NoteId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the creation timestamp.
    pub fn created_time(mut self, created_time: OffsetDateTime) -> Self {
        self.created_time = Some(created_time);
        self
    }

    /// Sets the tags.
    pub fn tags(mut self, tags: BTreeSet<Tag>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Builds the `Note`, using the current instant and an empty tag set
    /// for fields that were not set.
    ///
    /// # Errors
    ///
    /// Returns `NoteError::Validation` if the id is missing or the title or
    /// text is missing or blank.
    pub fn build(self) -> Result<Note, NoteError> {
        let id = self
            .id
            .ok_or_else(|| NoteError::Validation("Note id is required".to_string()))?;
        let title = self
            .title
            .filter(|t| !is_blank(t))
            .ok_or_else(|| NoteError::Validation("Title can not be empty".to_string()))?;
        let text = self
            .text
            .filter(|t| !is_blank(t))
            .ok_or_else(|| NoteError::Validation("Text can not be empty".to_string()))?;

        Ok(Note {
            id,
            title,
            text,
            created_time: self.created_time.unwrap_or_else(OffsetDateTime::now_utc),
            tags: self.tags.unwrap_or_default(),
        })
    }
}
