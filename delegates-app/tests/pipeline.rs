mod common;

use async_trait::async_trait;
use delegates_app::{Pipeline, PipelineError};
use delegates_common::{DelegateList, DelegateRecord, RawPage};
use delegates_config::{DEFAULT_COMMIT_MESSAGE, DelegatesConfig};
use delegates_drivers::{FetchError, InMemoryFetcher, PageFetcher};
use delegates_publish::{PublishError, PublishOutcome, Publisher};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;
use url::Url;

fn row(nation: &str, name: &str) -> String {
    format!(
        r#"<tr><td>1</td><td>Region</td><td><div class="nscodealigncenter"><a href="nation={nation}" class="nlink"><span class="nnameblock">{name}</span></a></div></td></tr>"#
    )
}

fn ranking_page() -> String {
    format!(
        "<html><body><table><tr><th>Rank</th></tr>{}{}</table><p>&lt;31&gt;</p><31>tail {}</body></html>",
        row("testlandia", "Testlandia"),
        row("the_mei", "The Mei"),
        row("after_cut", "After Cut"),
    )
}

fn config_in(dir: &Path) -> DelegatesConfig {
    let mut cfg = DelegatesConfig::default();
    cfg.output.dir = dir.to_path_buf();
    cfg
}

#[derive(Default)]
struct RecordingPublisher {
    calls: Mutex<Vec<(Vec<PathBuf>, String)>>,
}

impl Publisher for RecordingPublisher {
    fn publish(&self, files: &[&Path], message: &str) -> Result<PublishOutcome, PublishError> {
        self.calls.lock().unwrap().push((
            files.iter().map(|f| f.to_path_buf()).collect(),
            message.to_string(),
        ));
        Ok(PublishOutcome::Pushed {
            commit: "abc123".into(),
            remote: "origin".into(),
        })
    }
}

struct RejectingPublisher;

impl Publisher for RejectingPublisher {
    fn publish(&self, _files: &[&Path], _message: &str) -> Result<PublishOutcome, PublishError> {
        Err(PublishError::Command {
            command: "push origin HEAD".into(),
            diagnostic: "rejected (fetch first)".into(),
        })
    }
}

struct UnreachableFetcher;

#[async_trait]
impl PageFetcher for UnreachableFetcher {
    async fn fetch(&self, _url: &Url) -> Result<RawPage, FetchError> {
        Err(FetchError::Session {
            endpoint: "http://localhost:9515".into(),
            reason: "connection refused".into(),
        })
    }
}

#[tokio::test]
async fn full_run_writes_both_artifacts_and_publishes_them() {
    common::init_test_tracing();
    let tmp = TempDir::new().unwrap();
    let cfg = config_in(tmp.path());
    let fetcher = InMemoryFetcher::new(ranking_page());
    let publisher = RecordingPublisher::default();

    let summary = Pipeline::new(&cfg, &fetcher, Some(&publisher))
        .run()
        .await
        .unwrap();

    assert!(summary.truncated);
    assert_eq!(summary.delegates, 2);
    assert!(matches!(summary.publish, Some(PublishOutcome::Pushed { .. })));

    let markup = std::fs::read_to_string(tmp.path().join("output.html")).unwrap();
    assert!(!markup.contains("<31>"));
    assert!(!markup.contains("after_cut"));

    let list = DelegateList::read_from(tmp.path().join("delegates.json")).unwrap();
    assert_eq!(
        list.delegates,
        vec![
            DelegateRecord::new("Testlandia", "testlandia"),
            DelegateRecord::new("The Mei", "the_mei"),
        ]
    );

    let calls = publisher.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].0,
        vec![tmp.path().join("output.html"), tmp.path().join("delegates.json")]
    );
    assert_eq!(calls[0].1, DEFAULT_COMMIT_MESSAGE);
}

#[tokio::test]
async fn missing_sentinel_keeps_the_whole_page() {
    common::init_test_tracing();
    let tmp = TempDir::new().unwrap();
    let cfg = config_in(tmp.path());
    let page = format!("<table><tr><th>h</th></tr>{}</table>", row("solo", "Solo"));
    let fetcher = InMemoryFetcher::new(page.clone());

    let summary = Pipeline::new(&cfg, &fetcher, None).run().await.unwrap();

    assert!(!summary.truncated);
    assert_eq!(summary.publish, None);
    assert_eq!(summary.delegates, 1);
    assert_eq!(
        std::fs::read_to_string(&summary.markup_path).unwrap(),
        page
    );
}

#[tokio::test]
async fn fetch_failure_writes_nothing_and_never_publishes() {
    common::init_test_tracing();
    let tmp = TempDir::new().unwrap();
    let cfg = config_in(tmp.path());
    let publisher = RecordingPublisher::default();

    let err = Pipeline::new(&cfg, &UnreachableFetcher, Some(&publisher))
        .run()
        .await
        .unwrap_err();

    assert_eq!(err.stage(), "fetch");
    assert!(matches!(err, PipelineError::Fetch(FetchError::Session { .. })));
    assert!(!tmp.path().join("output.html").exists());
    assert!(!tmp.path().join("delegates.json").exists());
    assert!(publisher.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn publish_failure_leaves_artifacts_on_disk() {
    common::init_test_tracing();
    let tmp = TempDir::new().unwrap();
    let cfg = config_in(tmp.path());
    let fetcher = InMemoryFetcher::new(ranking_page());

    let err = Pipeline::new(&cfg, &fetcher, Some(&RejectingPublisher))
        .run()
        .await
        .unwrap_err();

    assert_eq!(err.stage(), "publish");
    assert!(err.to_string().contains("rejected"));
    assert!(tmp.path().join("output.html").exists());
    let list = DelegateList::read_from(tmp.path().join("delegates.json")).unwrap();
    assert_eq!(list.len(), 2);
}

#[tokio::test]
async fn unwritable_output_dir_fails_the_fetch_stage() {
    common::init_test_tracing();
    let tmp = TempDir::new().unwrap();
    let cfg = config_in(&tmp.path().join("missing").join("dir"));
    let fetcher = InMemoryFetcher::new(ranking_page());

    let err = Pipeline::new(&cfg, &fetcher, None).run().await.unwrap_err();

    assert_eq!(err.stage(), "fetch");
    assert!(matches!(err, PipelineError::Artifact { stage: "fetch", .. }));
}

#[tokio::test]
async fn empty_page_yields_an_empty_list() {
    common::init_test_tracing();
    let tmp = TempDir::new().unwrap();
    let cfg = config_in(tmp.path());
    let fetcher = InMemoryFetcher::new("<html><body>challenge</body></html>");

    let summary = Pipeline::new(&cfg, &fetcher, None).run().await.unwrap();

    assert_eq!(summary.delegates, 0);
    let written = std::fs::read_to_string(&summary.delegates_path).unwrap();
    assert_eq!(DelegateList::from_json(&written).unwrap().len(), 0);
}
