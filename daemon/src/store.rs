use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use keyscout_core::SuggestionBucketSet;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::protocol::{Platform, SearchType};

/// Composite record identity. The query is stored verbatim: identity is
/// case-sensitive on the query even though bucket dedup is not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    pub query: String,
    pub platform: Platform,
    pub search_type: SearchType,
    pub language: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    #[serde(default)]
    pub buckets: SuggestionBucketSet,
    #[serde(default)]
    pub total_merge_count: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The persistence collaborator of the research pipeline. Writes are
/// best-effort from the caller's point of view: a failed persist is logged
/// upstream and the computed merge result is still returned.
///
/// No cross-request locking is provided. Two concurrent searches for the
/// identical key can interleave read-merge-write and the last writer wins.
pub trait RecordStore: Send + Sync {
    fn find(&self, key: &RecordKey) -> Option<StoredRecord>;
    fn persist(&self, key: &RecordKey, record: StoredRecord) -> Result<()>;
    /// Most-liked record for `(query, platform)` across all search types and
    /// locales. App Store like routing depends on this lookup.
    fn find_most_liked(&self, query: &str, platform: Platform) -> Option<(RecordKey, StoredRecord)>;
    fn record_like(&self, key: &RecordKey) -> Result<u64>;
}

#[derive(Debug, Serialize, Deserialize)]
struct RecordEntry {
    key: RecordKey,
    record: StoredRecord,
}

/// JSON-file-backed store. The whole map is rewritten through a temp file on
/// every persist so a crash mid-write never leaves a torn records file.
pub struct JsonFileStore {
    path: PathBuf,
    records: Mutex<HashMap<RecordKey, StoredRecord>>,
}

impl JsonFileStore {
    pub fn open(path: &Path) -> Result<Self> {
        let records = if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("failed to open records file {}", path.display()))?;
            let entries: Vec<RecordEntry> = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("invalid records file {}", path.display()))?;
            entries
                .into_iter()
                .map(|entry| (entry.key, entry.record))
                .collect()
        } else {
            HashMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            records: Mutex::new(records),
        })
    }

    pub fn len(&self) -> usize {
        self.records.lock().expect("records lock poisoned").len()
    }

    fn flush(&self, records: &HashMap<RecordKey, StoredRecord>) -> Result<()> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create store directory {}", parent.display()))?;

        let entries: Vec<RecordEntry> = records
            .iter()
            .map(|(key, record)| RecordEntry {
                key: key.clone(),
                record: record.clone(),
            })
            .collect();

        let temp_file = NamedTempFile::new_in(parent)
            .with_context(|| format!("failed to create temp file in {}", parent.display()))?;
        serde_json::to_writer(BufWriter::new(&temp_file), &entries)
            .context("failed to serialize records")?;
        temp_file
            .persist(&self.path)
            .with_context(|| format!("failed to replace records file {}", self.path.display()))?;
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn find(&self, key: &RecordKey) -> Option<StoredRecord> {
        self.records
            .lock()
            .expect("records lock poisoned")
            .get(key)
            .cloned()
    }

    fn persist(&self, key: &RecordKey, record: StoredRecord) -> Result<()> {
        let mut records = self.records.lock().expect("records lock poisoned");
        records.insert(key.clone(), record);
        self.flush(&records)
    }

    fn find_most_liked(&self, query: &str, platform: Platform) -> Option<(RecordKey, StoredRecord)> {
        let records = self.records.lock().expect("records lock poisoned");
        records
            .iter()
            .filter(|(key, _)| key.query == query && key.platform == platform)
            .max_by_key(|(_, record)| record.likes)
            .map(|(key, record)| (key.clone(), record.clone()))
    }

    fn record_like(&self, key: &RecordKey) -> Result<u64> {
        let mut records = self.records.lock().expect("records lock poisoned");
        let record = records
            .get_mut(key)
            .with_context(|| format!("no stored record for {:?}", key.query))?;
        record.likes += 1;
        record.updated_at = Utc::now();
        let likes = record.likes;
        self.flush(&records)?;
        Ok(likes)
    }
}
