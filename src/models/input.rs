use serde::Deserialize;

/// Fields supplied when creating a note.
///
/// Tags are raw strings here; the service maps them onto [`Tag`](super::Tag)
/// and rejects the whole request if any of them is unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateNote {
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateNote {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Partial update of a note.
///
/// Overwrite rules per field:
/// - `title`, `text`: replaced only when present and not blank.
/// - `tags`: when present, replaces the tag set wholesale, so `Some(vec![])`
///   clears every tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateNote {
    pub title: Option<String>,
    pub text: Option<String>,
    pub tags: Option<Vec<String>>,
}
