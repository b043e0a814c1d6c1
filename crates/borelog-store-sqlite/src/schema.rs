//! SQL schema for the borelog SQLite store.
//!
//! Executed once at connection startup. Every foreign key cascades on
//! delete, so removing a user or project removes everything beneath it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL DEFAULT '',
    password_hash TEXT NOT NULL,
    date_joined   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sessions (
    token_hash TEXT PRIMARY KEY,          -- hex SHA-256 of the cookie token
    user_id    INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    expires_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS projects (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    lead_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title       TEXT NOT NULL,
    reference   TEXT NOT NULL,
    client      TEXT NOT NULL,
    description TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    sketch      TEXT                      -- path relative to the media root
);

-- Decimal columns hold scaled integers: coordinates in 1e-6, levels in 1e-2.
CREATE TABLE IF NOT EXISTS boreholes (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    logger_id          INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    project_id         INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    reference          TEXT NOT NULL,
    created_at         TEXT NOT NULL,
    northing           INTEGER,
    easting            INTEGER,
    ground_level       INTEGER NOT NULL,
    drilling_equipment TEXT NOT NULL,
    diameter           INTEGER NOT NULL CHECK (diameter BETWEEN 0 AND 32767)
);

CREATE TABLE IF NOT EXISTS geology (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    borehole_id        INTEGER NOT NULL REFERENCES boreholes(id) ON DELETE CASCADE,
    start_depth        INTEGER NOT NULL,
    end_depth          INTEGER NOT NULL,
    sample_number      TEXT,
    spt_result         TEXT,
    field_test_details TEXT NOT NULL,
    description        TEXT NOT NULL,
    created_at         TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS messages (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    user_id    INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    text       TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS sessions_user_idx     ON sessions(user_id);
CREATE INDEX IF NOT EXISTS projects_lead_idx     ON projects(lead_id);
CREATE INDEX IF NOT EXISTS boreholes_project_idx ON boreholes(project_id);
CREATE INDEX IF NOT EXISTS boreholes_logger_idx  ON boreholes(logger_id);
CREATE INDEX IF NOT EXISTS geology_borehole_idx  ON geology(borehole_id);
CREATE INDEX IF NOT EXISTS messages_project_idx  ON messages(project_id);

PRAGMA user_version = 1;
";
