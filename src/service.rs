use std::collections::BTreeSet;

use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::models::is_blank;
use crate::{
    CreateNote, Database, NoteError, NoteId, NoteSummary, NoteView, Page, PageRequest, SortField,
    SortOrder, Tag, UpdateNote,
};

/// Service layer providing note management operations.
///
/// NoteService owns a Database instance and provides the business rules on
/// top of it: field validation, tag mapping and view construction. It is
/// independent of the HTTP and CLI front ends.
///
/// # Examples
///
/// ```
/// use notes::{CreateNote, Database, NoteService};
///
/// # fn main() -> anyhow::Result<()> {
/// let service = NoteService::new(Database::in_memory()?);
///
/// let view = service.create(CreateNote::new("Greeting", "Hello world hello again"))?;
/// assert_eq!(view.word_stats["hello"], 2);
/// # Ok(())
/// # }
/// ```
pub struct NoteService {
    db: Database,
}

impl NoteService {
    /// Creates a new NoteService with the given database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Returns a reference to the underlying database.
    ///
    /// Useful for testing or advanced operations that need direct database access.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Creates a note stamped with the current instant.
    ///
    /// # Errors
    ///
    /// - `Validation` if the title or text is blank
    /// - `InvalidTag` if any tag string is unknown; nothing is persisted
    pub fn create(&self, input: CreateNote) -> Result<NoteView, NoteError> {
        if is_blank(&input.title) || is_blank(&input.text) {
            return Err(NoteError::Validation(
                "Title and text must not be empty".to_string(),
            ));
        }
        let tags = map_tags(&input.tags)?;

        let note = self.db.insert_note(
            &input.title,
            &input.text,
            OffsetDateTime::now_utc(),
            &tags,
        )?;
        debug!(id = %note.id(), tags = tags.len(), "created note");

        Ok(NoteView::from(note))
    }

    /// Applies a partial update to an existing note.
    ///
    /// Title and text are overwritten only when supplied and not blank. Tags,
    /// when supplied, replace the existing set, so an empty list clears it.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no note has this id
    /// - `InvalidTag` if any tag string is unknown; the note is left unchanged
    pub fn update(&self, id: &NoteId, input: UpdateNote) -> Result<NoteView, NoteError> {
        let mut note = self
            .db
            .find_note(id)?
            .ok_or_else(|| NoteError::NotFound(id.clone()))?;

        let tags = input.tags.as_deref().map(map_tags).transpose()?;

        if let Some(title) = input.title.filter(|t| !is_blank(t)) {
            note.set_title(title);
        }
        if let Some(text) = input.text.filter(|t| !is_blank(t)) {
            note.set_text(text);
        }
        if let Some(tags) = tags {
            note.set_tags(tags);
        }

        if !self.db.save_note(&note)? {
            return Err(NoteError::NotFound(id.clone()));
        }
        debug!(%id, "updated note");

        Ok(NoteView::from(note))
    }

    /// Deletes a note.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no note has this id.
    pub fn delete(&self, id: &NoteId) -> Result<(), NoteError> {
        if !self.db.delete_note(id)? {
            return Err(NoteError::NotFound(id.clone()));
        }
        debug!(%id, "deleted note");
        Ok(())
    }

    /// Retrieves a note with freshly computed word statistics.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no note has this id.
    pub fn get_by_id(&self, id: &NoteId) -> Result<NoteView, NoteError> {
        self.db
            .find_note(id)?
            .map(NoteView::from)
            .ok_or_else(|| NoteError::NotFound(id.clone()))
    }

    /// Lists id/title/creation-time projections in the requested order.
    pub fn list_summaries(&self, request: &PageRequest) -> Result<Vec<NoteSummary>, NoteError> {
        let page = self.db.find_all(request)?;
        Ok(page.content.iter().map(NoteSummary::from).collect())
    }

    /// Lists notes sharing at least one tag with `tags`.
    ///
    /// An empty set lists every note. Either way the results are returned
    /// newest first, whatever ordering `request` carries.
    pub fn list_by_tags(
        &self,
        tags: &BTreeSet<Tag>,
        request: &PageRequest,
    ) -> Result<Page<NoteView>, NoteError> {
        let request = request.sorted_by(SortField::CreatedTime, SortOrder::Descending);
        let page = if tags.is_empty() {
            self.db.find_all(&request)?
        } else {
            self.db.find_by_tags_in(tags, &request)?
        };
        Ok(page.map(NoteView::from))
    }

    /// Lists every note as full views, in the requested order.
    pub fn list(&self, request: &PageRequest) -> Result<Page<NoteView>, NoteError> {
        Ok(self.db.find_all(request)?.map(NoteView::from))
    }
}

/// Maps raw tag strings onto the tag set, ignoring case and collapsing
/// duplicates.
///
/// # Errors
///
/// Returns `InvalidTag` naming the first string that is not a tag.
pub fn map_tags<S: AsRef<str>>(raw: &[S]) -> Result<BTreeSet<Tag>, NoteError> {
    raw.iter()
        .map(|s| {
            s.as_ref().parse::<Tag>().inspect_err(|_| {
                warn!(tag = s.as_ref(), "rejected unknown tag");
            })
        })
        .collect()
}
