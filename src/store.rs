//! Dataset persistence: dedup merge and crash-safe writes.
//!
//! The on-disk file is only ever replaced through a sibling temp file and an
//! atomic rename, so a failed write leaves the previous dataset intact. An
//! optional backup copy of the current file is taken before each overwrite.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{info, warn};

use crate::error::PersistenceError;
use crate::models::JobRecord;

const DATASET_SOURCE: &str = "emploitogo.info";

/// On-disk envelope: a metadata block plus the record array.
#[derive(Debug, Serialize, Deserialize)]
struct DatasetFile {
    metadata: DatasetMetadata,
    jobs: Vec<JobRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub total_jobs: usize,
    pub last_updated: String,
    pub source: String,
    pub crawler_version: String,
}

/// Insertion-ordered collection of job records, keyed by `JobRecord.key`.
#[derive(Debug, Default)]
pub struct Dataset {
    records: Vec<JobRecord>,
    index: HashMap<String, usize>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the dataset from disk.
    ///
    /// A missing file yields an empty dataset. An unreadable or malformed
    /// file is logged and also treated as empty rather than aborting the run;
    /// the backup copy taken before the next write preserves the bad file
    /// for inspection.
    pub async fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::new(),
            Err(e) => {
                warn!("could not read existing dataset {}: {e}", path.display());
                return Self::new();
            }
        };

        match Self::from_json(&content) {
            Ok(dataset) => {
                info!(
                    "loaded {} existing records from {}",
                    dataset.len(),
                    path.display()
                );
                dataset
            }
            Err(e) => {
                warn!("could not parse existing dataset {}: {e}", path.display());
                Self::new()
            }
        }
    }

    /// Accepts both the metadata envelope and a bare record array.
    fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let jobs = match serde_json::from_str::<DatasetFile>(content) {
            Ok(file) => file.jobs,
            Err(_) => serde_json::from_str::<Vec<JobRecord>>(content)?,
        };

        let mut dataset = Self::new();
        dataset.merge(jobs);
        Ok(dataset)
    }

    /// Merge records into the dataset, returning how many keys were new.
    ///
    /// An existing key is overwritten in place, keeping its original
    /// position; unseen keys are appended in the order given.
    pub fn merge(&mut self, records: Vec<JobRecord>) -> usize {
        let mut added = 0;
        for record in records {
            match self.index.get(&record.key) {
                Some(&position) => self.records[position] = record,
                None => {
                    self.index.insert(record.key.clone(), self.records.len());
                    self.records.push(record);
                    added += 1;
                }
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&JobRecord> {
        self.index.get(key).map(|&position| &self.records[position])
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.key.as_str())
    }

    /// Write the dataset to `path` atomically.
    ///
    /// With `backup_enabled`, the current file is first copied to
    /// `<path>.bak` — best effort, a backup failure is logged but never
    /// fatal. The payload then goes to `<path>.tmp` and is renamed over the
    /// target, so a crash or write failure at any point leaves the previous
    /// file as it was.
    pub async fn write(&self, path: &Path, backup_enabled: bool) -> Result<(), PersistenceError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|source| PersistenceError::Write {
                        path: parent.display().to_string(),
                        source,
                    })?;
            }
        }

        if backup_enabled {
            let backup = sibling_path(path, ".bak");
            match fs::copy(path, &backup).await {
                Ok(_) => info!("backup written to {}", backup.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    // First run, nothing to back up yet.
                }
                Err(e) => warn!("backup of {} failed: {e}", path.display()),
            }
        }

        let file = DatasetFile {
            metadata: DatasetMetadata {
                total_jobs: self.records.len(),
                last_updated: Utc::now().to_rfc3339(),
                source: DATASET_SOURCE.to_string(),
                crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            },
            jobs: self.records.clone(),
        };
        let content = serde_json::to_string_pretty(&file)?;

        let tmp = sibling_path(path, ".tmp");
        fs::write(&tmp, content)
            .await
            .map_err(|source| PersistenceError::Write {
                path: tmp.display().to_string(),
                source,
            })?;
        fs::rename(&tmp, path)
            .await
            .map_err(|source| PersistenceError::Replace {
                path: path.display().to_string(),
                source,
            })?;

        info!(
            "dataset written: {} records in {}",
            self.records.len(),
            path.display()
        );
        Ok(())
    }
}

/// `<path><suffix>` in the same directory, so the final rename cannot cross
/// a filesystem boundary.
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut os: OsString = path.as_os_str().to_owned();
    os.push(suffix);
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tags;
    use chrono::Utc;

    fn record(key: &str, title: &str) -> JobRecord {
        JobRecord {
            key: key.to_string(),
            title: title.to_string(),
            url: key.to_string(),
            publication_date: None,
            category: None,
            content: String::new(),
            tags: Tags::default(),
            scraped_at: Utc::now(),
        }
    }

    #[test]
    fn merge_appends_new_keys_in_order() {
        let mut dataset = Dataset::new();
        let added = dataset.merge(vec![record("a", "A"), record("b", "B")]);

        assert_eq!(added, 2);
        assert_eq!(
            dataset.keys().collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn merge_overwrites_in_place_preserving_position() {
        let mut dataset = Dataset::new();
        dataset.merge(vec![record("a", "A"), record("b", "B"), record("c", "C")]);

        let added = dataset.merge(vec![record("b", "B updated"), record("d", "D")]);

        assert_eq!(added, 1);
        assert_eq!(
            dataset.keys().collect::<Vec<_>>(),
            vec!["a", "b", "c", "d"]
        );
        assert_eq!(dataset.get("b").unwrap().title, "B updated");
    }

    #[tokio::test]
    async fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = Dataset::load(&dir.path().join("absent.json")).await;
        assert!(dataset.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        std::fs::write(&path, "{ not json").unwrap();

        let dataset = Dataset::load(&path).await;
        assert!(dataset.is_empty());
    }

    #[tokio::test]
    async fn write_then_load_round_trips_through_the_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");

        let mut dataset = Dataset::new();
        dataset.merge(vec![record("a", "A"), record("b", "B")]);
        dataset.write(&path, false).await.unwrap();

        let loaded = Dataset::load(&path).await;
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("a").unwrap().title, "A");
        assert!(!sibling_path(&path, ".tmp").exists());
    }

    #[tokio::test]
    async fn load_accepts_a_bare_record_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        let jobs = serde_json::to_string(&vec![record("a", "A")]).unwrap();
        std::fs::write(&path, jobs).unwrap();

        let dataset = Dataset::load(&path).await;
        assert_eq!(dataset.len(), 1);
    }

    #[tokio::test]
    async fn failed_write_leaves_previous_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");

        let mut dataset = Dataset::new();
        dataset.merge(vec![record("a", "A")]);
        dataset.write(&path, false).await.unwrap();
        let before = std::fs::read(&path).unwrap();

        // Occupy the temp path with a directory so the staging write fails.
        std::fs::create_dir(sibling_path(&path, ".tmp")).unwrap();

        dataset.merge(vec![record("b", "B")]);
        let result = dataset.write(&path, false).await;

        assert!(matches!(result, Err(PersistenceError::Write { .. })));
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn backup_copy_is_taken_before_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");

        let mut dataset = Dataset::new();
        dataset.merge(vec![record("a", "A")]);
        dataset.write(&path, true).await.unwrap();
        let first = std::fs::read(&path).unwrap();

        dataset.merge(vec![record("b", "B")]);
        dataset.write(&path, true).await.unwrap();

        let backup = std::fs::read(sibling_path(&path, ".bak")).unwrap();
        assert_eq!(backup, first);
    }

    #[tokio::test]
    async fn first_write_with_backup_enabled_succeeds_without_a_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");

        let mut dataset = Dataset::new();
        dataset.merge(vec![record("a", "A")]);
        dataset.write(&path, true).await.unwrap();

        assert!(path.exists());
        assert!(!sibling_path(&path, ".bak").exists());
    }
}
