//! Signal Store Integration Tests
//!
//! Tests for persisting scans to SQLite and reading history and trends back.

use chrono::{DateTime, Duration, TimeZone, Utc};
use tempfile::TempDir;
use uuid::Uuid;

use signalminer::core::{format_signals_at, Orchestrator};
use signalminer::{SignalRecord, SignalStore};

fn ts(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
}

fn records_at(names: &[&str], captured_at: DateTime<Utc>) -> Vec<SignalRecord> {
    let entries = names
        .iter()
        .map(|name| serde_json::json!({"name": name, "sector": "Healthcare"}));
    format_signals_at(entries, captured_at)
}

#[test]
fn test_file_database_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("signals.db");

    {
        let mut store = SignalStore::open(&path).unwrap();
        let stored = store
            .store_records(Uuid::new_v4(), &Orchestrator::fallback_records())
            .unwrap();
        assert_eq!(stored, 10);
        assert_eq!(store.path(), Some(path.as_path()));
    }

    let store = SignalStore::open(&path).unwrap();
    assert_eq!(store.count().unwrap(), 10);
}

#[test]
fn test_recent_is_newest_first() {
    let mut store = SignalStore::open_in_memory().unwrap();
    store
        .store_records(Uuid::new_v4(), &records_at(&["old"], ts(1, 9)))
        .unwrap();
    store
        .store_records(Uuid::new_v4(), &records_at(&["new-a", "new-b"], ts(5, 9)))
        .unwrap();

    let recent = store.recent(2).unwrap();
    assert_eq!(recent.len(), 2);
    assert!(recent.iter().all(|r| r.timestamp == ts(5, 9)));

    let all = store.recent(50).unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[2].name, "old");
}

#[test]
fn test_stored_record_reads_back_unchanged() {
    let mut store = SignalStore::open_in_memory().unwrap();
    let records = records_at(&["Roundtrip"], ts(2, 14));

    store.store_records(Uuid::new_v4(), &records).unwrap();

    assert_eq!(store.recent(1).unwrap(), records);
}

#[test]
fn test_trends_cover_only_the_window() {
    let mut store = SignalStore::open_in_memory().unwrap();
    store
        .store_records(Uuid::new_v4(), &records_at(&["stale"], ts(1, 0)))
        .unwrap();
    store
        .store_records(Uuid::new_v4(), &records_at(&["fresh-1", "fresh-2"], ts(20, 0)))
        .unwrap();

    let now = ts(25, 0);
    let report = store.trends(7, now).unwrap().unwrap();

    assert_eq!(report.period_days, 7);
    assert_eq!(report.since, now - Duration::days(7));
    assert_eq!(report.summary.total, 2);
    assert_eq!(report.summary.by_sector.get("Healthcare"), Some(&2));

    // Nothing captured in the last day
    assert!(store.trends(1, now).unwrap().is_none());
}

#[test]
fn test_unbounded_trend_window_covers_everything() {
    let mut store = SignalStore::open_in_memory().unwrap();
    store
        .store_records(Uuid::new_v4(), &records_at(&["ancient", "recent"], ts(1, 0)))
        .unwrap();

    let report = store.trends(u32::MAX, Utc::now()).unwrap().unwrap();

    assert_eq!(report.period_days, u32::MAX);
    assert_eq!(report.since, DateTime::<Utc>::MIN_UTC);
    assert_eq!(report.summary.total, 2);
}
