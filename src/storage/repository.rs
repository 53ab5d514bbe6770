//! SQLite repository for candidates and their Fibonacci test records

use rusqlite::{params, Connection};
use std::path::Path;

use super::error::Result;
use super::schema::create_tables;
use crate::fibonacci::Parity;

/// A stored candidate row
#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: i64,
    pub name: String,
    pub registered_at: String,
}

/// Even/odd record counts for the stored sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParityCounts {
    pub even: i64,
    pub odd: i64,
}

impl ParityCounts {
    /// Total number of records counted
    pub fn total(&self) -> i64 {
        self.even + self.odd
    }
}

/// Repository for the selection database
pub struct SelectionRepository {
    conn: Connection,
}

impl SelectionRepository {
    /// Open a repository, initializing the database if needed
    pub fn open(db_path: &Path) -> Result<Self> {
        // Create parent directories if needed
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path)?;

        // Enable foreign keys
        conn.execute("PRAGMA foreign_keys = ON", [])?;

        // Create tables if they don't exist
        create_tables(&conn)?;

        Ok(Self { conn })
    }

    /// Create an in-memory repository (for testing)
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        create_tables(&conn)?;
        Ok(Self { conn })
    }

    // ==================== Insert Operations ====================

    /// Insert a candidate, returning the generated id
    pub fn insert_candidate(&self, name: &str) -> Result<i64> {
        self.conn
            .execute("INSERT INTO candidates (name) VALUES (?1)", params![name])?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert one test record per value for the given candidate.
    ///
    /// The whole batch runs in a single transaction: either every value is
    /// persisted or none is. Returns the number of rows inserted.
    pub fn insert_test_batch(&mut self, candidate_id: i64, values: &[i64]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO test_records (candidate_id, fibonacci_value, is_even, is_odd)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )?;
            for &value in values {
                let (is_even, is_odd) = Parity::of(value).as_flags();
                stmt.execute(params![candidate_id, value, is_even, is_odd])?;
            }
        }
        tx.commit()?;
        Ok(values.len())
    }

    // ==================== Query Operations ====================

    /// Fetch a candidate by id
    pub fn get_candidate(&self, id: i64) -> Result<Candidate> {
        let candidate = self.conn.query_row(
            "SELECT id, name, registered_at FROM candidates WHERE id = ?1",
            params![id],
            |row| {
                Ok(Candidate {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    registered_at: row.get(2)?,
                })
            },
        )?;
        Ok(candidate)
    }

    /// All stored values in insertion order
    pub fn list_sequence(&self) -> Result<Vec<i64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT fibonacci_value FROM test_records ORDER BY id ASC")?;

        let values = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(values)
    }

    /// The k largest stored values, largest first
    pub fn top_values(&self, k: usize) -> Result<Vec<i64>> {
        let mut stmt = self.conn.prepare(
            "SELECT fibonacci_value FROM test_records ORDER BY fibonacci_value DESC LIMIT ?1",
        )?;

        let values = stmt
            .query_map([k as i64], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(values)
    }

    /// Count stored records by parity flag
    pub fn parity_counts(&self) -> Result<ParityCounts> {
        let even: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM test_records WHERE is_even = 1",
            [],
            |row| row.get(0),
        )?;
        let odd: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM test_records WHERE is_odd = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(ParityCounts { even, odd })
    }

    /// Get candidate count
    pub fn candidate_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM candidates", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get test record count
    pub fn test_record_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM test_records", [], |row| row.get(0))?;
        Ok(count)
    }

    // ==================== Delete Operations ====================

    /// Delete every record whose value strictly exceeds the threshold,
    /// returning the number of rows removed
    pub fn delete_greater_than(&self, threshold: i64) -> Result<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM test_records WHERE fibonacci_value > ?1",
            params![threshold],
        )?;
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fibonacci;
    use crate::storage::error::StorageError;

    fn seeded_repo() -> SelectionRepository {
        let mut repo = SelectionRepository::in_memory().unwrap();
        let id = repo.insert_candidate("Test Candidate").unwrap();
        repo.insert_test_batch(id, &fibonacci::generate(30)).unwrap();
        repo
    }

    #[test]
    fn test_insert_candidate_returns_monotonic_ids() {
        let repo = SelectionRepository::in_memory().unwrap();
        let first = repo.insert_candidate("First").unwrap();
        let second = repo.insert_candidate("Second").unwrap();
        assert!(second > first);
        assert_eq!(repo.candidate_count().unwrap(), 2);
    }

    #[test]
    fn test_get_candidate_round_trip() {
        let repo = SelectionRepository::in_memory().unwrap();
        let id = repo.insert_candidate("Someone").unwrap();

        let candidate = repo.get_candidate(id).unwrap();
        assert_eq!(candidate.id, id);
        assert_eq!(candidate.name, "Someone");
        // Filled by the column default
        assert!(!candidate.registered_at.is_empty());
    }

    #[test]
    fn test_get_missing_candidate_is_not_found() {
        let repo = SelectionRepository::in_memory().unwrap();
        let err = repo.get_candidate(42).unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[test]
    fn test_batch_insert_and_insertion_order() {
        let repo = seeded_repo();

        let values = repo.list_sequence().unwrap();
        assert_eq!(values.len(), 30);
        assert_eq!(&values[..5], &[1, 1, 2, 3, 5]);
        for i in 2..values.len() {
            assert_eq!(values[i], values[i - 1] + values[i - 2]);
        }
    }

    #[test]
    fn test_top_values_descending() {
        let repo = seeded_repo();

        let top = repo.top_values(5).unwrap();
        assert_eq!(top, vec![832_040, 514_229, 317_811, 196_418, 121_393]);
    }

    #[test]
    fn test_parity_counts_sum_to_total() {
        let repo = seeded_repo();

        let counts = repo.parity_counts().unwrap();
        assert_eq!(counts.total(), repo.test_record_count().unwrap());
        assert_eq!(counts.total(), 30);
        // Every third Fibonacci value is even
        assert_eq!(counts.even, 10);
        assert_eq!(counts.odd, 20);
    }

    #[test]
    fn test_delete_greater_than_is_idempotent() {
        let repo = seeded_repo();

        // 11 of the first 30 values exceed 5000
        let deleted = repo.delete_greater_than(5000).unwrap();
        assert_eq!(deleted, 11);
        assert_eq!(repo.test_record_count().unwrap(), 19);

        let remaining = repo.list_sequence().unwrap();
        assert!(remaining.iter().all(|&v| v <= 5000));

        // Second identical call deletes nothing
        assert_eq!(repo.delete_greater_than(5000).unwrap(), 0);
        assert_eq!(repo.test_record_count().unwrap(), 19);
    }

    #[test]
    fn test_batch_insert_unknown_candidate_rejected() {
        let mut repo = SelectionRepository::in_memory().unwrap();

        let err = repo.insert_test_batch(999, &[1, 1, 2]).unwrap_err();
        assert!(matches!(err, StorageError::Constraint(_)));
        // Nothing from the failed batch is persisted
        assert_eq!(repo.test_record_count().unwrap(), 0);
    }

    #[test]
    fn test_parity_flags_enforced_by_schema() {
        let repo = SelectionRepository::in_memory().unwrap();
        let id = repo.insert_candidate("Someone").unwrap();

        for (is_even, is_odd) in [(1, 1), (0, 0)] {
            let result = repo.conn.execute(
                "INSERT INTO test_records (candidate_id, fibonacci_value, is_even, is_odd)
                 VALUES (?1, ?2, ?3, ?4)",
                params![id, 7, is_even, is_odd],
            );
            assert!(result.is_err());
        }
        assert_eq!(repo.test_record_count().unwrap(), 0);
    }
}
