//! Ingestion queue behavior: serialized execution and failure isolation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, TimeZone};
use tempfile::TempDir;
use tokio::sync::mpsc;

use voxnote::{
    Candidate, Config, IngestionQueue, LocalStorage, PipelineNotice, ProcessingPipeline,
    TextGenerator, Transcriber,
};

/// Tracks how many transcriptions run at once
struct CountingTranscriber {
    active: AtomicUsize,
    max_active: Arc<AtomicUsize>,
}

#[async_trait]
impl Transcriber for CountingTranscriber {
    async fn transcribe(
        &self,
        _audio: &[u8],
        _media_type: &str,
        _file_name: &str,
    ) -> anyhow::Result<String> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);

        // Long enough that overlapping runs would be observed
        tokio::time::sleep(Duration::from_millis(50)).await;

        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok("transcript text".to_string())
    }
}

/// Fails for any file whose name contains "bad"
struct SelectiveTranscriber;

#[async_trait]
impl Transcriber for SelectiveTranscriber {
    async fn transcribe(
        &self,
        _audio: &[u8],
        _media_type: &str,
        file_name: &str,
    ) -> anyhow::Result<String> {
        if file_name.contains("bad") {
            anyhow::bail!("corrupt audio")
        }
        Ok("transcript text".to_string())
    }
}

struct FixedGenerator;

#[async_trait]
impl TextGenerator for FixedGenerator {
    async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
        Ok("Headline\n- point".to_string())
    }
}

struct Fixture {
    _temp: TempDir,
    config: Config,
}

impl Fixture {
    async fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let watch_dir = temp.path().join("voice-notes");
        tokio::fs::create_dir_all(&watch_dir).await.unwrap();

        let config = Config {
            api_key: "sk-test".to_string(),
            processed_dir: temp.path().join("voice-notes-processed"),
            output_dir: temp.path().join("voice-notes-output"),
            watch_dir,
            extensions: vec!["mp3".to_string(), "m4a".to_string()],
            append_transcript: true,
        };

        Self { _temp: temp, config }
    }

    fn queue(
        &self,
        transcriber: Arc<dyn Transcriber>,
    ) -> (IngestionQueue, mpsc::UnboundedReceiver<PipelineNotice>) {
        let pipeline = ProcessingPipeline::new(
            transcriber,
            Arc::new(FixedGenerator),
            Arc::new(LocalStorage::new()),
            &self.config,
        );
        let (tx, rx) = mpsc::unbounded_channel();
        (IngestionQueue::start(pipeline, tx), rx)
    }

    async fn recording(&self, name: &str, minute: u32) -> Candidate {
        let path = self.config.watch_dir.join(name);
        tokio::fs::write(&path, b"fake audio").await.unwrap();
        Candidate::new(
            path,
            "m4a".to_string(),
            Local.with_ymd_and_hms(2024, 5, 1, 9, minute, 0).unwrap(),
        )
    }
}

fn drain(rx: &mut mpsc::UnboundedReceiver<PipelineNotice>) -> Vec<PipelineNotice> {
    let mut notices = Vec::new();
    while let Ok(n) = rx.try_recv() {
        notices.push(n);
    }
    notices
}

#[tokio::test]
async fn test_runs_never_overlap() {
    let fx = Fixture::new().await;

    let max_active = Arc::new(AtomicUsize::new(0));
    let transcriber = Arc::new(CountingTranscriber {
        active: AtomicUsize::new(0),
        max_active: max_active.clone(),
    });

    let (queue, mut rx) = fx.queue(transcriber);

    for i in 0..4 {
        let candidate = fx.recording(&format!("memo-{}.m4a", i), i).await;
        assert!(queue.enqueue(candidate));
    }

    queue.shutdown().await;

    assert_eq!(max_active.load(Ordering::SeqCst), 1);

    let succeeded = drain(&mut rx)
        .iter()
        .filter(|n| matches!(n, PipelineNotice::Succeeded { .. }))
        .count();
    assert_eq!(succeeded, 4);
}

#[tokio::test]
async fn test_items_run_in_enqueue_order() {
    let fx = Fixture::new().await;
    let (queue, mut rx) = fx.queue(Arc::new(SelectiveTranscriber));

    let first = fx.recording("first.m4a", 0).await;
    let second = fx.recording("second.m4a", 1).await;
    let first_path = first.path.clone();
    let second_path = second.path.clone();

    queue.enqueue(first);
    queue.enqueue(second);
    queue.shutdown().await;

    let started: Vec<_> = drain(&mut rx)
        .into_iter()
        .filter_map(|n| match n {
            PipelineNotice::Started { path } => Some(path),
            _ => None,
        })
        .collect();
    assert_eq!(started, vec![first_path, second_path]);
}

#[tokio::test]
async fn test_failure_does_not_poison_the_queue() {
    let fx = Fixture::new().await;
    let (queue, mut rx) = fx.queue(Arc::new(SelectiveTranscriber));

    let bad = fx.recording("bad.m4a", 0).await;
    let good = fx.recording("good.m4a", 1).await;
    let bad_path = bad.path.clone();
    let good_path = good.path.clone();

    queue.enqueue(bad);
    queue.enqueue(good);
    queue.shutdown().await;

    let notices = drain(&mut rx);
    let failed: Vec<_> = notices
        .iter()
        .filter_map(|n| match n {
            PipelineNotice::Failed { path, .. } => Some(path.clone()),
            _ => None,
        })
        .collect();
    let succeeded: Vec<_> = notices
        .iter()
        .filter_map(|n| match n {
            PipelineNotice::Succeeded { path, .. } => Some(path.clone()),
            _ => None,
        })
        .collect();

    assert_eq!(failed, vec![bad_path.clone()]);
    assert_eq!(succeeded, vec![good_path.clone()]);

    // Failed source stays put for rediscovery; the good one was archived
    assert!(tokio::fs::try_exists(&bad_path).await.unwrap());
    assert!(!tokio::fs::try_exists(&good_path).await.unwrap());
    assert!(
        tokio::fs::try_exists(fx.config.output_dir.join("2024-05-01 at 09.01.md"))
            .await
            .unwrap()
    );
}
