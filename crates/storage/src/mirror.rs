use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use trainer_core::model::ProgressRecord;

/// Errors surfaced by progress mirror backends.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MirrorError {
    #[error("mirror I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("mirror serialization error: {0}")]
    Serialization(String),

    #[error("mirror lock poisoned")]
    Poisoned,
}

/// Local cache of each word's last-seen judgment, keyed by the
/// source-language word.
///
/// Writes are whole-record overwrites (last-write-wins, no merge). The
/// mirror is a display cache only; the scoring service's aggregate
/// progress is the system of record.
#[async_trait]
pub trait ProgressMirror: Send + Sync {
    /// Insert or overwrite the record for its source word.
    ///
    /// # Errors
    ///
    /// Returns `MirrorError` if the record cannot be stored.
    async fn upsert(&self, record: &ProgressRecord) -> Result<(), MirrorError>;

    /// Fetch the record for a source word, if one was ever written.
    ///
    /// # Errors
    ///
    /// Returns `MirrorError` on backend failures; a missing word is `Ok(None)`.
    async fn get(&self, source_word: &str) -> Result<Option<ProgressRecord>, MirrorError>;

    /// All records, sorted by source word for stable display.
    ///
    /// # Errors
    ///
    /// Returns `MirrorError` if the mirror cannot be read.
    async fn snapshot(&self) -> Result<Vec<ProgressRecord>, MirrorError>;

    /// Delete every record. Used by the explicit user-confirmed reset.
    ///
    /// # Errors
    ///
    /// Returns `MirrorError` if the mirror cannot be cleared.
    async fn clear(&self) -> Result<(), MirrorError>;
}

/// Simple in-memory mirror for testing and for degraded sessions where the
/// file-backed mirror is unavailable.
#[derive(Clone, Default)]
pub struct InMemoryMirror {
    records: Arc<Mutex<HashMap<String, ProgressRecord>>>,
}

impl InMemoryMirror {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressMirror for InMemoryMirror {
    async fn upsert(&self, record: &ProgressRecord) -> Result<(), MirrorError> {
        let mut guard = self.records.lock().map_err(|_| MirrorError::Poisoned)?;
        guard.insert(record.source_word.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, source_word: &str) -> Result<Option<ProgressRecord>, MirrorError> {
        let guard = self.records.lock().map_err(|_| MirrorError::Poisoned)?;
        Ok(guard.get(source_word).cloned())
    }

    async fn snapshot(&self) -> Result<Vec<ProgressRecord>, MirrorError> {
        let guard = self.records.lock().map_err(|_| MirrorError::Poisoned)?;
        let mut records: Vec<ProgressRecord> = guard.values().cloned().collect();
        records.sort_by(|a, b| a.source_word.cmp(&b.source_word));
        Ok(records)
    }

    async fn clear(&self) -> Result<(), MirrorError> {
        let mut guard = self.records.lock().map_err(|_| MirrorError::Poisoned)?;
        guard.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trainer_core::model::Bucket;
    use trainer_core::time::fixed_now;

    fn record(source: &str, bucket: Bucket, correct: bool) -> ProgressRecord {
        ProgressRecord::new(source, "kat", bucket, correct, fixed_now())
    }

    #[tokio::test]
    async fn later_writes_overwrite_earlier_ones() {
        let mirror = InMemoryMirror::new();
        mirror
            .upsert(&record("chat", Bucket::Learning, false))
            .await
            .unwrap();
        mirror
            .upsert(&record("chat", Bucket::Mastered, true))
            .await
            .unwrap();

        let stored = mirror.get("chat").await.unwrap().unwrap();
        assert_eq!(stored.bucket, Bucket::Mastered);
        assert!(stored.last_correct);
        assert_eq!(mirror.snapshot().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn snapshot_is_sorted_by_source_word() {
        let mirror = InMemoryMirror::new();
        for word in ["pomme", "arbre", "chien"] {
            mirror
                .upsert(&record(word, Bucket::Review, false))
                .await
                .unwrap();
        }

        let words: Vec<String> = mirror
            .snapshot()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.source_word)
            .collect();
        assert_eq!(words, vec!["arbre", "chien", "pomme"]);
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let mirror = InMemoryMirror::new();
        mirror
            .upsert(&record("chat", Bucket::Mastered, true))
            .await
            .unwrap();
        mirror.clear().await.unwrap();

        assert!(mirror.get("chat").await.unwrap().is_none());
        assert!(mirror.snapshot().await.unwrap().is_empty());
    }
}
