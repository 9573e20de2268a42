/// Complete database schema for the notes application.
///
/// Uses CREATE TABLE/INDEX IF NOT EXISTS for idempotent execution.
pub const INITIAL_SCHEMA: &str = r#"
-- Notes table: one row per note, created_time in unix nanoseconds
CREATE TABLE IF NOT EXISTS notes (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL CHECK (trim(title, ' ' || char(9) || char(10) || char(13)) <> ''),
    text TEXT NOT NULL CHECK (trim(text, ' ' || char(9) || char(10) || char(13)) <> ''),
    created_time INTEGER NOT NULL
);

-- Tag set of each note, restricted to the fixed tag names
CREATE TABLE IF NOT EXISTS note_tags (
    note_id TEXT NOT NULL,
    tag TEXT NOT NULL CHECK (tag IN ('BUSINESS', 'PERSONAL', 'IMPORTANT')),
    PRIMARY KEY (note_id, tag),
    FOREIGN KEY (note_id) REFERENCES notes(id) ON DELETE CASCADE
);

-- Index for sorting notes by creation time
CREATE INDEX IF NOT EXISTS idx_notes_created ON notes(created_time);

-- Index for tag membership filtering
CREATE INDEX IF NOT EXISTS idx_note_tags_tag ON note_tags(tag);
"#;
