use std::collections::HashSet;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use webfuzz::compose::{BaseTarget, Composer};
use webfuzz::config::Mode;
use webfuzz::error::{FuzzError, ProbeError};
use webfuzz::filter::{Classifier, ExtensionFilter, Finding, StatusPolicy};
use webfuzz::http_client::{create_probe_client, ClientSettings};
use webfuzz::output::FindingSink;
use webfuzz::probe::{HttpProber, ProbeResult, Prober};
use webfuzz::scheduler::Scheduler;
use webfuzz::wordlist::Wordlist;
use wiremock::matchers::path;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Answers 200 for URLs containing "hit", 404 otherwise, after a short
/// pause, while recording how many calls overlap.
#[derive(Default)]
struct FakeProber {
    current: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    calls: Arc<AtomicUsize>,
    pause: Duration,
}

impl FakeProber {
    fn with_pause(pause: Duration) -> Self {
        Self { pause, ..Self::default() }
    }
}

#[async_trait]
impl Prober for FakeProber {
    async fn probe(&self, url: &str) -> Result<ProbeResult, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.pause).await;
        self.current.fetch_sub(1, Ordering::SeqCst);
        let status = if url.contains("hit") { 200 } else { 404 };
        Ok(ProbeResult { status, body_length: Some(10) })
    }
}

struct FailingProber;

#[async_trait]
impl Prober for FailingProber {
    async fn probe(&self, _url: &str) -> Result<ProbeResult, ProbeError> {
        Err(ProbeError::Connect("refused".into()))
    }
}

#[derive(Default)]
struct CollectSink {
    findings: Mutex<Vec<Finding>>,
}

impl FindingSink for CollectSink {
    fn report(&self, finding: &Finding) -> Result<(), FuzzError> {
        self.findings.lock().unwrap().push(finding.clone());
        Ok(())
    }
}

struct BrokenSink;

impl FindingSink for BrokenSink {
    fn report(&self, _finding: &Finding) -> Result<(), FuzzError> {
        Err(FuzzError::Sink {
            path: "/readonly/report.txt".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        })
    }
}

fn composer(base: &str, extensions: Option<ExtensionFilter>) -> Composer {
    Composer::new(BaseTarget::parse(base).unwrap(), Mode::AppendPath, extensions)
}

fn classifier() -> Classifier {
    Classifier::new(Arc::new(StatusPolicy::default()), None)
}

fn wordlist(words: &[String]) -> Wordlist<Cursor<Vec<u8>>> {
    Wordlist::new(Cursor::new(words.join("\n").into_bytes()))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn in_flight_probes_never_exceed_limit() {
    let prober = FakeProber::with_pause(Duration::from_millis(10));
    let peak = prober.peak.clone();
    let calls = prober.calls.clone();
    let sink = Arc::new(CollectSink::default());
    let words: Vec<String> = (0..200).map(|i| format!("w{}", i)).collect();

    let scheduler = Scheduler::new(composer("http://x", None), prober, classifier(), sink, 5);
    let summary = scheduler.run(wordlist(&words)).await.unwrap();

    assert_eq!(summary.dispatched, 200);
    assert_eq!(calls.load(Ordering::SeqCst), 200);
    let peak = peak.load(Ordering::SeqCst);
    assert!(peak <= 5, "peak in flight was {}", peak);
    assert!(peak >= 1);
    assert_eq!(scheduler.gate().in_flight(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn found_counter_matches_findings_exactly() {
    let prober = FakeProber::with_pause(Duration::from_millis(1));
    let sink = Arc::new(CollectSink::default());
    let words: Vec<String> = (0..300)
        .map(|i| if i % 3 == 0 { format!("hit-{}", i) } else { format!("miss-{}", i) })
        .collect();

    let scheduler = Scheduler::new(composer("http://x/", None), prober, classifier(), sink.clone(), 16);
    let summary = scheduler.run(wordlist(&words)).await.unwrap();

    let findings = sink.findings.lock().unwrap();
    assert_eq!(summary.total_found, 100);
    assert_eq!(findings.len(), 100);
    let labels: HashSet<&str> = findings.iter().map(|f| f.label.as_str()).collect();
    assert_eq!(labels.len(), 100);
    assert!(labels.iter().all(|l| l.starts_with("hit-")));
    assert!(!summary.interrupted);
}

#[tokio::test]
async fn transport_failures_are_dropped_silently() {
    let sink = Arc::new(CollectSink::default());
    let words: Vec<String> = (0..20).map(|i| format!("hit-{}", i)).collect();

    let scheduler = Scheduler::new(composer("http://x", None), FailingProber, classifier(), sink.clone(), 4);
    let summary = scheduler.run(wordlist(&words)).await.unwrap();

    assert_eq!(summary.total_found, 0);
    assert_eq!(summary.failed, 20);
    assert_eq!(summary.dispatched, 20);
    assert!(sink.findings.lock().unwrap().is_empty());
}

#[tokio::test]
async fn extension_filter_prevents_requests() {
    let server = MockServer::start().await;
    Mock::given(path("/secret.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<?php ?>"))
        .mount(&server)
        .await;

    let client = create_probe_client(&ClientSettings::default()).unwrap();
    let policy = Arc::new(StatusPolicy::default());
    let prober = HttpProber::new(client, reqwest::Method::GET, policy.clone());
    let sink = Arc::new(CollectSink::default());
    let words = vec!["admin".to_string(), "/login".to_string(), "secret.php".to_string()];

    let scheduler = Scheduler::new(
        composer(&server.uri(), Some(ExtensionFilter::new(["php"]))),
        prober,
        Classifier::new(policy, None),
        sink.clone(),
        10,
    );
    let summary = scheduler.run(wordlist(&words)).await.unwrap();

    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.dispatched, 1);
    assert_eq!(summary.total_found, 1);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/secret.php");

    let findings = sink.findings.lock().unwrap();
    assert_eq!(findings[0].label, "secret.php");
    assert_eq!(findings[0].size, 8);
}

#[tokio::test]
async fn delay_is_applied_before_each_probe() {
    let sink = Arc::new(CollectSink::default());
    let words = vec!["hit".to_string()];
    let scheduler = Scheduler::new(composer("http://x", None), FakeProber::default(), classifier(), sink, 1)
        .with_delay(Duration::from_millis(80));

    let start = Instant::now();
    let summary = scheduler.run(wordlist(&words)).await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(80));
    assert_eq!(summary.total_found, 1);
}

#[tokio::test]
async fn cancellation_stops_a_blocked_reader() {
    // The writer half is kept alive and never written to, so reads block.
    let (_writer, reader) = tokio::io::duplex(64);
    let cancel = CancellationToken::new();
    let sink = Arc::new(CollectSink::default());
    let scheduler = Scheduler::new(composer("http://x", None), FakeProber::default(), classifier(), sink, 2)
        .with_cancellation(cancel.clone());

    let c = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        c.cancel();
    });

    let summary = tokio::time::timeout(
        Duration::from_secs(2),
        scheduler.run(Wordlist::new(BufReader::new(reader))),
    )
    .await
    .expect("run should stop after cancellation")
    .unwrap();
    assert!(summary.interrupted);
    assert_eq!(summary.dispatched, 0);
}

#[tokio::test]
async fn sink_failure_halts_the_run() {
    let words: Vec<String> = (0..50).map(|i| format!("hit-{}", i)).collect();
    let scheduler = Scheduler::new(
        composer("http://x", None),
        FakeProber::with_pause(Duration::from_millis(5)),
        classifier(),
        Arc::new(BrokenSink),
        1,
    );

    let err = scheduler.run(wordlist(&words)).await.unwrap_err();
    assert!(matches!(err, FuzzError::Sink { .. }));
}
