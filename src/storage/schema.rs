//! SQLite schema definitions for the selection database
//!
//! Tables:
//! - candidates: People the test data belongs to
//! - test_records: One Fibonacci value per row with its parity flags

use rusqlite::{Connection, Result};

/// Create all tables in the database
pub fn create_tables(conn: &Connection) -> Result<()> {
    // Candidates, registration timestamp filled by the column default
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS candidates (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            registered_at TEXT DEFAULT (datetime('now'))
        )
        "#,
        [],
    )?;

    // Fibonacci test records; exactly one of the parity flags must be set
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS test_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            candidate_id INTEGER NOT NULL REFERENCES candidates(id),
            fibonacci_value INTEGER NOT NULL,
            is_even INTEGER NOT NULL CHECK(is_even IN (0, 1)),
            is_odd INTEGER NOT NULL CHECK(is_odd IN (0, 1)),
            CHECK(is_even + is_odd = 1)
        )
        "#,
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_test_records_candidate ON test_records(candidate_id)",
        [],
    )?;

    Ok(())
}
