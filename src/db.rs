mod schema;

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, ToSql};
use time::OffsetDateTime;

use crate::{Note, NoteBuilder, NoteId, Page, PageRequest, Tag};
use schema::INITIAL_SCHEMA;

/// Raw `notes` row before tags are attached.
type NoteRow = (String, String, String, i64);

const NOTE_COLUMNS: &str = "n.id, n.title, n.text, n.created_time";

/// Database wrapper providing connection management, schema initialization
/// and the note document operations the service builds on.
///
/// Ids are assigned here on insert. Multi-table writes for a single note run
/// in one transaction, so a failed write leaves nothing behind.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens an in-memory SQLite database.
    ///
    /// Automatically initializes the schema on connection open.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Opens a file-based SQLite database at the given path.
    ///
    /// Creates the database file if it does not exist.
    /// Automatically initializes the schema on connection open.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// Uses IF NOT EXISTS for idempotent execution.
    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute("PRAGMA foreign_keys = ON", [])?;
        self.conn.execute_batch(INITIAL_SCHEMA)?;
        Ok(())
    }

    /// Returns a reference to the underlying connection.
    ///
    /// Useful for executing custom queries in tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Inserts a new note, assigning it a fresh id.
    pub fn insert_note(
        &self,
        title: &str,
        text: &str,
        created_time: OffsetDateTime,
        tags: &BTreeSet<Tag>,
    ) -> Result<Note> {
        let note = NoteBuilder::new()
            .id(NoteId::generate())
            .title(title)
            .text(text)
            .created_time(created_time)
            .tags(tags.clone())
            .build()?;

        self.in_transaction(|conn| {
            conn.execute(
                "INSERT INTO notes (id, title, text, created_time) VALUES (?1, ?2, ?3, ?4)",
                (
                    note.id().as_str(),
                    note.title(),
                    note.text(),
                    to_nanos(note.created_time())?,
                ),
            )?;
            insert_tags(conn, note.id(), note.tags())
        })?;

        Ok(note)
    }

    /// Writes the title, text and tag set of an existing note.
    ///
    /// The id and creation time are never rewritten. Returns `false` if no
    /// note with that id exists.
    pub fn save_note(&self, note: &Note) -> Result<bool> {
        self.in_transaction(|conn| {
            let updated = conn.execute(
                "UPDATE notes SET title = ?1, text = ?2 WHERE id = ?3",
                (note.title(), note.text(), note.id().as_str()),
            )?;
            if updated == 0 {
                return Ok(false);
            }

            conn.execute(
                "DELETE FROM note_tags WHERE note_id = ?1",
                [note.id().as_str()],
            )?;
            insert_tags(conn, note.id(), note.tags())?;
            Ok(true)
        })
    }

    /// Retrieves a note by its ID.
    ///
    /// Returns `None` if no note exists with the given ID.
    pub fn find_note(&self, id: &NoteId) -> Result<Option<Note>> {
        let row: Option<NoteRow> = self
            .conn
            .query_row(
                &format!("SELECT {NOTE_COLUMNS} FROM notes n WHERE n.id = ?1"),
                [id.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;

        row.map(|row| self.note_from_row(row)).transpose()
    }

    /// Deletes a note and its tags. Returns `false` if no note had that id.
    pub fn delete_note(&self, id: &NoteId) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1", [id.as_str()])?;
        Ok(deleted > 0)
    }

    /// Returns one page of all notes in the requested order.
    pub fn find_all(&self, request: &PageRequest) -> Result<Page<Note>> {
        let total: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;

        let query = format!(
            "SELECT {NOTE_COLUMNS} FROM notes n {} LIMIT ?1 OFFSET ?2",
            order_clause(request)
        );
        let limit = i64::from(request.size());
        let offset = i64::try_from(request.offset())?;
        let notes = self.query_notes(&query, rusqlite::params![limit, offset])?;

        Ok(Page::new(notes, request, u64::try_from(total)?))
    }

    /// Returns one page of the notes holding at least one of `tags`.
    ///
    /// An empty tag set matches no notes.
    pub fn find_by_tags_in(&self, tags: &BTreeSet<Tag>, request: &PageRequest) -> Result<Page<Note>> {
        if tags.is_empty() {
            return Ok(Page::new(Vec::new(), request, 0));
        }

        let tag_names: Vec<String> = tags.iter().map(|tag| tag.as_str().to_string()).collect();
        let placeholders = vec!["?"; tag_names.len()].join(", ");
        let membership = format!(
            "EXISTS (SELECT 1 FROM note_tags nt WHERE nt.note_id = n.id AND nt.tag IN ({placeholders}))"
        );

        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM notes n WHERE {membership}"),
            rusqlite::params_from_iter(&tag_names),
            |row| row.get(0),
        )?;

        let query = format!(
            "SELECT {NOTE_COLUMNS} FROM notes n WHERE {membership} {} LIMIT ? OFFSET ?",
            order_clause(request)
        );
        let limit = i64::from(request.size());
        let offset = i64::try_from(request.offset())?;

        let mut params: Vec<&dyn ToSql> = Vec::new();
        for name in &tag_names {
            params.push(name);
        }
        params.push(&limit);
        params.push(&offset);

        let notes = self.query_notes(&query, rusqlite::params_from_iter(params))?;

        Ok(Page::new(notes, request, u64::try_from(total)?))
    }

    fn query_notes(&self, query: &str, params: impl rusqlite::Params) -> Result<Vec<Note>> {
        let mut stmt = self.conn.prepare(query)?;
        let rows = stmt.query_map(params, |row| -> rusqlite::Result<NoteRow> {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })?;

        let mut notes = Vec::new();
        for row_result in rows {
            notes.push(self.note_from_row(row_result?)?);
        }
        Ok(notes)
    }

    fn note_from_row(&self, (id, title, text, created_time): NoteRow) -> Result<Note> {
        let tags = self.load_tags(&id)?;
        let note = NoteBuilder::new()
            .id(NoteId::new(id))
            .title(title)
            .text(text)
            .created_time(from_nanos(created_time)?)
            .tags(tags)
            .build()?;
        Ok(note)
    }

    fn load_tags(&self, note_id: &str) -> Result<BTreeSet<Tag>> {
        let mut stmt = self
            .conn
            .prepare("SELECT tag FROM note_tags WHERE note_id = ?1")?;
        let rows = stmt.query_map([note_id], |row| row.get::<_, String>(0))?;

        let mut tags = BTreeSet::new();
        for row_result in rows {
            tags.insert(row_result?.parse::<Tag>()?);
        }
        Ok(tags)
    }

    /// Runs `work` inside a transaction, rolling back if it fails.
    fn in_transaction<T>(&self, work: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = &self.conn;
        conn.execute("BEGIN TRANSACTION", [])?;

        match work(conn) {
            Ok(value) => {
                conn.execute("COMMIT", [])?;
                Ok(value)
            }
            Err(e) => {
                conn.execute("ROLLBACK", []).ok();
                Err(e)
            }
        }
    }
}

fn insert_tags(conn: &Connection, note_id: &NoteId, tags: &BTreeSet<Tag>) -> Result<()> {
    for tag in tags {
        conn.execute(
            "INSERT INTO note_tags (note_id, tag) VALUES (?1, ?2)",
            (note_id.as_str(), tag.as_str()),
        )?;
    }
    Ok(())
}

/// ORDER BY for a page request, with insertion order breaking ties.
fn order_clause(request: &PageRequest) -> String {
    let direction = request.order().as_sql();
    format!(
        "ORDER BY n.{} {direction}, n.rowid {direction}",
        request.sort_field().column()
    )
}

fn to_nanos(timestamp: OffsetDateTime) -> Result<i64> {
    Ok(i64::try_from(timestamp.unix_timestamp_nanos())?)
}

fn from_nanos(nanos: i64) -> Result<OffsetDateTime> {
    Ok(OffsetDateTime::from_unix_timestamp_nanos(i128::from(nanos))?)
}
