use thiserror::Error;

use crate::NoteId;

/// Errors returned by note operations.
#[derive(Debug, Error)]
pub enum NoteError {
    /// A required field is missing or blank
    #[error("{0}")]
    Validation(String),

    /// A tag string outside the fixed tag set
    #[error("Invalid tag: {0}")]
    InvalidTag(String),

    /// No note exists with the given id
    #[error("Note not found with id {0}")]
    NotFound(NoteId),

    /// A sort field outside the sortable allow-list
    #[error("Invalid sort field: {0}")]
    InvalidSortField(String),

    /// Unusable pagination parameters
    #[error("Invalid page request: {0}")]
    InvalidPage(String),

    /// Failure reported by the underlying store
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl NoteError {
    /// Returns true for errors caused by the caller's input rather than by
    /// the store.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}
