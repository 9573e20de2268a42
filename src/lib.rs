pub mod api;
pub mod config;
pub mod db;
mod error;
pub mod models;
pub mod service;

pub use config::Config;
pub use db::Database;
pub use error::NoteError;
pub use models::{
    CreateNote, DEFAULT_PAGE_SIZE, Note, NoteBuilder, NoteId, NoteSummary, NoteView, Page,
    PageRequest, SortField, SortOrder, Tag, UpdateNote,
};
pub use service::{NoteService, map_tags};
