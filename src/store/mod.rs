//! Append-only persisted emoji log.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Timelike};
use tokio::sync::Mutex;

use crate::models::EmojiEntry;

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_warn};

struct StoreInner {
    entries: Vec<EmojiEntry>,
    last_error: Option<String>,
}

/// Timestamped log of annotations, backed by a single JSON array file.
///
/// Mutated only by append; the on-disk file always reflects the last append
/// that completed, never a torn write. Cloning shares the same log.
#[derive(Clone)]
pub struct EmojiLogStore {
    path: Arc<PathBuf>,
    inner: Arc<Mutex<StoreInner>>,
}

impl EmojiLogStore {
    /// Opens the log at `path`, reading any persisted entries.
    ///
    /// A missing file is an empty store. A file that fails to parse also
    /// yields an empty store, but the failure is kept readable through
    /// [`EmojiLogStore::last_error`] so callers can tell "no data" from
    /// "corrupt data".
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (entries, last_error) = match load_entries(&path) {
            Ok(entries) => (entries, None),
            Err(err) => {
                log_warn!("emoji log load failed, starting empty: {err:?}");
                (Vec::new(), Some(format!("{err:#}")))
            }
        };

        Self {
            path: Arc::new(path),
            inner: Arc::new(Mutex::new(StoreInner {
                entries,
                last_error,
            })),
        }
    }

    /// Appends `entry` and persists the full sequence.
    ///
    /// Appends are serialized; concurrent callers never lose or duplicate
    /// entries. A persistence failure leaves the entry visible in memory
    /// and is recorded, not propagated.
    pub async fn append(&self, entry: EmojiEntry) {
        let mut inner = self.inner.lock().await;
        inner.entries.push(entry);

        if let Err(err) = persist(&self.path, &inner.entries) {
            log_error!(
                "emoji log persist failed, {} entries remain in memory only: {err:?}",
                inner.entries.len()
            );
            inner.last_error = Some(format!("{err:#}"));
        }
    }

    /// Snapshot of all entries in insertion order.
    pub async fn entries(&self) -> Vec<EmojiEntry> {
        self.inner.lock().await.entries.clone()
    }

    /// Buckets the emojis logged on `date`'s local calendar day by hour.
    /// Always 24 buckets, hours 0 through 23; empty hours are empty lists.
    pub async fn group_by_hour(&self, date: DateTime<Local>) -> Vec<(u32, Vec<String>)> {
        let day = date.date_naive();
        let mut buckets: Vec<(u32, Vec<String>)> = (0..24).map(|hour| (hour, Vec::new())).collect();

        let inner = self.inner.lock().await;
        for entry in &inner.entries {
            let local = entry.timestamp.with_timezone(&Local);
            if local.date_naive() == day {
                buckets[local.hour() as usize].1.push(entry.emoji.clone());
            }
        }

        buckets
    }

    /// Most recent load or persist failure, if any.
    pub async fn last_error(&self) -> Option<String> {
        self.inner.lock().await.last_error.clone()
    }
}

fn load_entries(path: &Path) -> Result<Vec<EmojiEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read emoji log from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("emoji log at {} is not a valid entry array", path.display()))
}

/// Write-to-temporary-then-rename so a crash mid-write cannot corrupt the
/// committed log.
fn persist(path: &Path, entries: &[EmojiEntry]) -> Result<()> {
    let serialized = serde_json::to_string_pretty(entries)?;
    let tmp = path.with_extension("json.tmp");

    fs::write(&tmp, serialized)
        .with_context(|| format!("failed to write emoji log scratch file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("failed to replace emoji log at {}", path.display()))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    use super::*;

    fn log_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("emoji_log.json")
    }

    #[tokio::test]
    async fn missing_file_is_an_empty_store_without_error() {
        let dir = tempdir().unwrap();
        let store = EmojiLogStore::new(log_path(&dir));

        assert!(store.entries().await.is_empty());
        assert!(store.last_error().await.is_none());
    }

    #[tokio::test]
    async fn corrupt_file_starts_empty_but_records_the_error() {
        let dir = tempdir().unwrap();
        let path = log_path(&dir);
        fs::write(&path, "definitely not json").unwrap();

        let store = EmojiLogStore::new(path);
        assert!(store.entries().await.is_empty());
        assert!(store.last_error().await.is_some());
    }

    #[tokio::test]
    async fn append_round_trips_through_a_fresh_store() {
        let dir = tempdir().unwrap();
        let path = log_path(&dir);

        let entry = EmojiEntry::new("🌞");
        let store = EmojiLogStore::new(path.clone());
        store.append(entry.clone()).await;
        assert!(store.last_error().await.is_none());

        let reopened = EmojiLogStore::new(path);
        assert_eq!(reopened.entries().await, vec![entry]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_lose_nothing() {
        let dir = tempdir().unwrap();
        let path = log_path(&dir);
        let store = EmojiLogStore::new(path.clone());

        let mut tasks = Vec::new();
        for _ in 0..32 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store.append(EmojiEntry::new("🎈")).await;
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let entries = store.entries().await;
        assert_eq!(entries.len(), 32);

        let mut ids: Vec<&str> = entries.iter().map(|entry| entry.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 32, "an entry was lost or duplicated");

        // All 32 made it to disk as well.
        assert_eq!(EmojiLogStore::new(path).entries().await.len(), 32);
    }

    #[tokio::test]
    async fn groups_same_local_day_by_hour() {
        let dir = tempdir().unwrap();
        let store = EmojiLogStore::new(log_path(&dir));

        let day = Local.with_ymd_and_hms(2026, 3, 14, 0, 0, 0).unwrap();
        let at_hour = |hour: u32| {
            Local
                .with_ymd_and_hms(2026, 3, 14, hour, 30, 0)
                .unwrap()
                .with_timezone(&Utc)
        };

        store.append(EmojiEntry::at(at_hour(9), "☕️")).await;
        store.append(EmojiEntry::at(at_hour(9), "📚")).await;
        store.append(EmojiEntry::at(at_hour(21), "🌙")).await;
        // Different calendar day, must not appear.
        store
            .append(EmojiEntry::at(
                Local
                    .with_ymd_and_hms(2026, 3, 15, 9, 0, 0)
                    .unwrap()
                    .with_timezone(&Utc),
                "🚫",
            ))
            .await;

        let buckets = store.group_by_hour(day).await;
        assert_eq!(buckets.len(), 24);
        assert_eq!(buckets[9].1, vec!["☕️", "📚"]);
        assert_eq!(buckets[21].1, vec!["🌙"]);

        let total: usize = buckets.iter().map(|(_, emojis)| emojis.len()).sum();
        assert_eq!(total, 3);

        for (hour, (bucket_hour, emojis)) in buckets.iter().enumerate() {
            assert_eq!(*bucket_hour, hour as u32);
            if hour != 9 && hour != 21 {
                assert!(emojis.is_empty());
            }
        }
    }
}
