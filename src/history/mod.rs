//! Assessment history log
//!
//! Append-only persisted store for completed assessments, backed by a
//! single SQLite table. Every operation is one SQL statement, so appends,
//! queries and deletes are atomic with respect to each other. Queries are
//! ordered by ascending timestamp; a range that matches nothing returns an
//! empty sequence, and deleting a nonexistent id is a no-op.

use std::path::Path;

use chrono::NaiveDateTime;
use rusqlite::{Connection, params};

use crate::error::{Result, ScreeningError};
use crate::models::{Assessment, HistoryEntry};

/// On-disk timestamp format (second precision, sorts lexicographically)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Inclusive timestamp range for queries and range deletes.
///
/// An unset bound is unbounded on that side; the default range matches
/// everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    /// Inclusive lower bound
    pub start: Option<NaiveDateTime>,
    /// Inclusive upper bound
    pub end: Option<NaiveDateTime>,
}

impl TimeRange {
    /// The unbounded range
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Range bounded on both sides
    #[must_use]
    pub fn between(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Range bounded below only
    #[must_use]
    pub fn since(start: NaiveDateTime) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// Range bounded above only
    #[must_use]
    pub fn until(end: NaiveDateTime) -> Self {
        Self {
            start: None,
            end: Some(end),
        }
    }
}

/// Accumulates WHERE clauses and positional parameters for a time range
struct TimeBounds {
    clauses: Vec<String>,
    params: Vec<String>,
}

impl TimeBounds {
    fn new(column: &str, range: &TimeRange) -> Self {
        let mut clauses = Vec::new();
        let mut params = Vec::new();
        if let Some(start) = range.start {
            params.push(start.format(TIMESTAMP_FORMAT).to_string());
            clauses.push(format!("{column} >= ?{}", params.len()));
        }
        if let Some(end) = range.end {
            params.push(end.format(TIMESTAMP_FORMAT).to_string());
            clauses.push(format!("{column} <= ?{}", params.len()));
        }
        Self { clauses, params }
    }

    fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }
}

/// Raw row fetched from SQLite before field decoding
struct RawEntry {
    id: i64,
    timestamp: String,
    sex: String,
    age_months: u32,
    height_cm: f64,
    z_score: f64,
    risk_indicators: String,
    classifier_label: String,
    final_status: String,
}

impl RawEntry {
    fn decode(self) -> Result<HistoryEntry> {
        let timestamp = NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT)
            .map_err(|e| {
                ScreeningError::DataError(format!(
                    "history row {}: bad timestamp {:?}: {e}",
                    self.id, self.timestamp
                ))
            })?;
        Ok(HistoryEntry {
            id: self.id,
            timestamp,
            sex: self.sex.parse()?,
            age_months: self.age_months,
            height_cm: self.height_cm,
            z_score: self.z_score,
            risk_indicators: self.risk_indicators,
            classifier_label: self.classifier_label.parse()?,
            final_status: self.final_status.parse()?,
        })
    }
}

/// Append-only log of completed assessments
#[derive(Debug)]
pub struct PredictionLog {
    conn: Connection,
}

impl PredictionLog {
    /// Open (or create) the log at a file path
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory log, mainly for tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                sex TEXT NOT NULL,
                age_months INTEGER NOT NULL,
                height_cm REAL NOT NULL,
                z_score REAL NOT NULL,
                risk_indicators TEXT NOT NULL,
                classifier_label TEXT NOT NULL,
                final_status TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Append a completed assessment, returning its auto-assigned id.
    ///
    /// Ids are strictly increasing across appends for the lifetime of the
    /// log file (AUTOINCREMENT).
    pub fn append(&self, timestamp: NaiveDateTime, assessment: &Assessment) -> Result<i64> {
        let height = assessment.subject.height_cm.ok_or_else(|| {
            ScreeningError::InvalidInput(
                "cannot persist an assessment without a measured height".to_string(),
            )
        })?;
        self.conn.execute(
            "INSERT INTO history (timestamp, sex, age_months, height_cm, z_score,
                                  risk_indicators, classifier_label, final_status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                timestamp.format(TIMESTAMP_FORMAT).to_string(),
                assessment.subject.sex.to_string(),
                assessment.subject.age_months,
                height,
                assessment.z_score,
                assessment.subject.indicators.flag_string(),
                assessment.label.to_string(),
                assessment.status.to_string(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Fetch the entries whose timestamp falls inside `range`, ascending
    pub fn query(&self, range: &TimeRange) -> Result<Vec<HistoryEntry>> {
        let bounds = TimeBounds::new("timestamp", range);
        let sql = format!(
            "SELECT id, timestamp, sex, age_months, height_cm, z_score,
                    risk_indicators, classifier_label, final_status
             FROM history{} ORDER BY timestamp ASC, id ASC",
            bounds.where_clause()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(bounds.params.iter()), |row| {
            Ok(RawEntry {
                id: row.get(0)?,
                timestamp: row.get(1)?,
                sex: row.get(2)?,
                age_months: row.get(3)?,
                height_cm: row.get(4)?,
                z_score: row.get(5)?,
                risk_indicators: row.get(6)?,
                classifier_label: row.get(7)?,
                final_status: row.get(8)?,
            })
        })?;

        let raw: Vec<RawEntry> = rows.collect::<rusqlite::Result<_>>()?;
        raw.into_iter().map(RawEntry::decode).collect()
    }

    /// Delete one entry by id. Returns whether an entry was removed;
    /// a nonexistent id is a no-op, not an error.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM history WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// Delete every entry whose timestamp falls inside `range`.
    /// Returns the number of entries removed.
    pub fn delete_range(&self, range: &TimeRange) -> Result<usize> {
        let bounds = TimeBounds::new("timestamp", range);
        let sql = format!("DELETE FROM history{}", bounds.where_clause());
        let affected = self
            .conn
            .execute(&sql, rusqlite::params_from_iter(bounds.params.iter()))?;
        Ok(affected)
    }

    /// Number of entries currently in the log
    pub fn count(&self) -> Result<u64> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM history", [], |row| row.get(0))?;
        Ok(n.unsigned_abs())
    }
}
