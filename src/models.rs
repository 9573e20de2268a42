mod ids;
mod input;
mod note;
mod page;
mod tag;
mod view;

pub use ids::NoteId;
pub use input::{CreateNote, UpdateNote};
pub use note::{Note, NoteBuilder};
pub(crate) use note::is_blank;
pub use page::{DEFAULT_PAGE_SIZE, Page, PageRequest, SortField, SortOrder};
pub use tag::Tag;
pub use view::{NoteSummary, NoteView, word_stats};
