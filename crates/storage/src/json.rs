use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use trainer_core::model::{Bucket, ProgressRecord};

use crate::mirror::{MirrorError, ProgressMirror};

/// On-disk shape of one mirror entry. The map key is the source word, so the
/// entry itself only carries the snapshot fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MirrorEntry {
    target: String,
    bucket: Bucket,
    correct: bool,
    time: DateTime<Utc>,
}

impl MirrorEntry {
    fn from_record(record: &ProgressRecord) -> Self {
        Self {
            target: record.target_word.clone(),
            bucket: record.bucket,
            correct: record.last_correct,
            time: record.updated_at,
        }
    }

    fn into_record(self, source_word: &str) -> ProgressRecord {
        ProgressRecord::new(source_word, self.target, self.bucket, self.correct, self.time)
    }
}

type MirrorDocument = BTreeMap<String, MirrorEntry>;

/// Progress mirror persisted as a single JSON document on disk.
///
/// The whole document is read on every access and rewritten on every write;
/// the mirror holds at most one entry per vocabulary word, so the document
/// stays small. Writes go through a temp file in the same directory followed
/// by a rename, so a crash mid-write leaves the previous document intact.
#[derive(Debug, Clone)]
pub struct JsonFileMirror {
    path: PathBuf,
}

impl JsonFileMirror {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<MirrorDocument, MirrorError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            // A mirror that was never written reads as empty.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(MirrorDocument::new());
            }
            Err(err) => return Err(err.into()),
        };
        serde_json::from_str(&raw).map_err(|e| MirrorError::Serialization(e.to_string()))
    }

    fn store(&self, document: &MirrorDocument) -> Result<(), MirrorError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let raw = serde_json::to_string_pretty(document)
            .map_err(|e| MirrorError::Serialization(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[async_trait]
impl ProgressMirror for JsonFileMirror {
    async fn upsert(&self, record: &ProgressRecord) -> Result<(), MirrorError> {
        let mut document = self.load()?;
        document.insert(record.source_word.clone(), MirrorEntry::from_record(record));
        self.store(&document)
    }

    async fn get(&self, source_word: &str) -> Result<Option<ProgressRecord>, MirrorError> {
        let mut document = self.load()?;
        Ok(document
            .remove(source_word)
            .map(|entry| entry.into_record(source_word)))
    }

    async fn snapshot(&self) -> Result<Vec<ProgressRecord>, MirrorError> {
        let document = self.load()?;
        Ok(document
            .into_iter()
            .map(|(source, entry)| entry.into_record(&source))
            .collect())
    }

    async fn clear(&self) -> Result<(), MirrorError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
