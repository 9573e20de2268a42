use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{Note, NoteId, Tag};

/// Externally visible representation of a note.
///
/// Mirrors [`Note`] and adds `word_stats`, which is derived from the text
/// every time a view is built and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteView {
    pub id: NoteId,
    pub title: String,
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_time: OffsetDateTime,
    pub tags: BTreeSet<Tag>,
    pub word_stats: BTreeMap<String, u64>,
}

impl From<&Note> for NoteView {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id().clone(),
            title: note.title().to_string(),
            text: note.text().to_string(),
            created_time: note.created_time(),
            tags: note.tags().clone(),
            word_stats: word_stats(note.text()),
        }
    }
}

impl From<Note> for NoteView {
    fn from(note: Note) -> Self {
        Self::from(&note)
    }
}

/// Lightweight listing projection of a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteSummary {
    pub id: NoteId,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_time: OffsetDateTime,
}

impl From<&Note> for NoteSummary {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id().clone(),
            title: note.title().to_string(),
            created_time: note.created_time(),
        }
    }
}

/// Counts occurrences of each lowercased word in `text`.
///
/// Words are maximal runs of ASCII letters, digits and underscores;
/// everything else separates them, so `Café` counts as `caf`.
///
/// # Examples
///
/// ```
/// use notes::models::word_stats;
///
/// let stats = word_stats("Hello world hello again");
/// assert_eq!(stats["hello"], 2);
/// assert_eq!(stats["world"], 1);
/// assert_eq!(stats["again"], 1);
/// ```
#[must_use]
pub fn word_stats(text: &str) -> BTreeMap<String, u64> {
    let mut stats = BTreeMap::new();
    for word in text
        .to_lowercase()
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
    {
        *stats.entry(word.to_string()).or_insert(0) += 1;
    }
    stats
}
