use std::sync::Arc;

use storage::{InMemoryMirror, JsonFileMirror, ProgressMirror};
use trainer_core::model::{Bucket, ProgressRecord};
use trainer_core::time::fixed_now;

fn record(source: &str, bucket: Bucket, correct: bool) -> ProgressRecord {
    ProgressRecord::new(source, "kat", bucket, correct, fixed_now())
}

async fn exercise_mirror(mirror: Arc<dyn ProgressMirror>) {
    // One record per source word, last write wins.
    mirror
        .upsert(&record("chat", Bucket::Learning, false))
        .await
        .unwrap();
    mirror
        .upsert(&record("chat", Bucket::Mastered, true))
        .await
        .unwrap();
    mirror
        .upsert(&record("chien", Bucket::Review, false))
        .await
        .unwrap();

    let snapshot = mirror.snapshot().await.unwrap();
    assert_eq!(snapshot.len(), 2);

    let chat = mirror.get("chat").await.unwrap().unwrap();
    assert_eq!(chat.bucket, Bucket::Mastered);
    assert!(chat.last_correct);

    // Explicit reset empties the mirror entirely.
    mirror.clear().await.unwrap();
    assert!(mirror.snapshot().await.unwrap().is_empty());
}

#[tokio::test]
async fn in_memory_mirror_honors_the_contract() {
    exercise_mirror(Arc::new(InMemoryMirror::new())).await;
}

#[tokio::test]
async fn json_file_mirror_honors_the_contract() {
    let dir = tempfile::tempdir().unwrap();
    let mirror = JsonFileMirror::new(dir.path().join("progress.json"));
    exercise_mirror(Arc::new(mirror)).await;
}

#[tokio::test]
async fn json_mirror_survives_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("progress.json");

    {
        let mirror = JsonFileMirror::new(&path);
        mirror
            .upsert(&record("pomme", Bucket::Learning, true))
            .await
            .unwrap();
    }

    let reopened = JsonFileMirror::new(&path);
    let rec = reopened.get("pomme").await.unwrap().unwrap();
    assert_eq!(rec.bucket, Bucket::Learning);
    assert_eq!(rec.updated_at, fixed_now());
}
