//! SQL schema for the history store.

/// Whether the history table already exists.
pub const HAS_TABLE: &str =
  "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'player_history'";

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Strictly append-only: no UPDATE or DELETE is ever issued.
-- Ancestor columns use 0 / 0 / '' for \"no ancestor\".
CREATE TABLE IF NOT EXISTS player_history (
    id                      INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id              INTEGER NOT NULL,
    participant_id          INTEGER NOT NULL,
    role_type               INTEGER NOT NULL,   -- 1 row | 2 column
    choice                  INTEGER NOT NULL,   -- 1 cooperate | 2 defect
    advice                  TEXT    NOT NULL DEFAULT '',
    ancestor_session_id     INTEGER NOT NULL DEFAULT 0,
    ancestor_participant_id INTEGER NOT NULL DEFAULT 0,
    ancestor_advice         TEXT    NOT NULL DEFAULT '',
    recorded_at             TEXT    NOT NULL    -- ISO 8601 UTC; server-assigned
);

CREATE INDEX IF NOT EXISTS player_history_session_idx ON player_history(session_id);

PRAGMA user_version = 1;
";
