//! SQLite persistence for scanned signals.
//!
//! Storage is optional and best-effort: callers log failures and carry on.
//! Timestamps are stored as fixed-width RFC 3339 UTC text so that string
//! order is time order.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{SignalRecord, SignalSummary};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS signals (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    scan_id TEXT NOT NULL,
    name TEXT NOT NULL,
    description TEXT,
    growth_reason TEXT,
    source_link TEXT,
    sector TEXT,
    funding_stage TEXT,
    signal_type TEXT,
    score INTEGER,
    timestamp TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_signals_timestamp ON signals(timestamp);
CREATE INDEX IF NOT EXISTS idx_signals_sector ON signals(sector);
CREATE INDEX IF NOT EXISTS idx_signals_score ON signals(score);
";

const SELECT_COLUMNS: &str = "name, description, growth_reason, source_link, sector, \
                              funding_stage, signal_type, score, timestamp";

/// Errors from the signal store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Aggregates over a trailing time window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub period_days: u32,
    pub since: DateTime<Utc>,
    pub summary: SignalSummary,
}

/// SQLite-backed record store
pub struct SignalStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SignalStore {
    /// Open (or create) a database file
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// In-memory database (tests, dry runs)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, path: None })
    }

    /// Database file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Insert one scan's records in a single transaction
    pub fn store_records(
        &mut self,
        scan_id: Uuid,
        records: &[SignalRecord],
    ) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO signals (scan_id, name, description, growth_reason, source_link, \
                 sector, funding_stage, signal_type, score, timestamp) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;

            for record in records {
                stmt.execute(params![
                    scan_id.to_string(),
                    record.name,
                    record.description,
                    record.growth_reason,
                    record.source_link,
                    record.sector,
                    record.funding_stage,
                    record.signal_type,
                    record.score,
                    encode_timestamp(record.timestamp),
                ])?;
            }
        }
        tx.commit()?;

        Ok(records.len())
    }

    /// Most recently captured records first
    pub fn recent(&self, limit: usize) -> Result<Vec<SignalRecord>, StoreError> {
        let sql = format!(
            "SELECT {} FROM signals ORDER BY timestamp DESC, id DESC LIMIT ?1",
            SELECT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let records = stmt
            .query_map(params![limit], record_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Records captured at or after `cutoff`, newest first
    pub fn since(&self, cutoff: DateTime<Utc>) -> Result<Vec<SignalRecord>, StoreError> {
        let sql = format!(
            "SELECT {} FROM signals WHERE timestamp >= ?1 ORDER BY timestamp DESC, id DESC",
            SELECT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![encode_timestamp(cutoff)], record_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Aggregates over the last `days` days, `None` if nothing was captured
    pub fn trends(&self, days: u32, now: DateTime<Utc>) -> Result<Option<TrendReport>, StoreError> {
        // Windows reaching past the representable range cover everything
        let since = now
            .checked_sub_signed(Duration::days(i64::from(days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let records = self.since(since)?;

        if records.is_empty() {
            return Ok(None);
        }

        Ok(Some(TrendReport {
            period_days: days,
            since,
            summary: SignalSummary::from_records(&records),
        }))
    }

    /// Total stored records
    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM signals", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

fn encode_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<SignalRecord> {
    let raw_timestamp: String = row.get(8)?;
    let timestamp = DateTime::parse_from_rfc3339(&raw_timestamp)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(SignalRecord {
        name: row.get(0)?,
        description: row.get(1)?,
        growth_reason: row.get(2)?,
        source_link: row.get(3)?,
        sector: row.get(4)?,
        funding_stage: row.get(5)?,
        signal_type: row.get(6)?,
        score: row.get(7)?,
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_timestamp_encoding_is_fixed_width() {
        let a = encode_timestamp(ts("2026-01-02T03:04:05Z"));
        let b = encode_timestamp(ts("2026-01-02T03:04:05.5+00:00"));
        assert_eq!(a, "2026-01-02T03:04:05.000000Z");
        assert_eq!(a.len(), b.len());
        assert!(a < b);
    }

    #[test]
    fn test_empty_store() {
        let store = SignalStore::open_in_memory().unwrap();
        assert_eq!(store.count().unwrap(), 0);
        assert!(store.recent(10).unwrap().is_empty());
        assert!(store.trends(30, Utc::now()).unwrap().is_none());
        assert!(store.path().is_none());
    }
}
