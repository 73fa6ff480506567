//! Bounded dispatch loop.
//!
//! Lines are read one at a time, composed, and handed to a spawned probe
//! task once a gate slot is free. A saturated gate stalls the reader, which
//! is the only flow control. The loop returns after every dispatched task
//! has finished.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::io::AsyncBufRead;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::compose::{Candidate, Composer};
use crate::error::FuzzError;
use crate::filter::Classifier;
use crate::output::FindingSink;
use crate::probe::{ConcurrencyGate, GatePermit, Prober};
use crate::wordlist::Wordlist;

/// Final tally of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub total_found: usize,
    pub dispatched: usize,
    /// Lines dropped by the composer before any request.
    pub skipped: usize,
    /// Probes that ended in a transport error.
    pub failed: usize,
    /// Dispatch stopped early because the run was cancelled.
    pub interrupted: bool,
}

#[derive(Default)]
struct Counters {
    found: AtomicUsize,
    failed: AtomicUsize,
}

pub struct Scheduler<P> {
    composer: Composer,
    prober: Arc<P>,
    classifier: Arc<Classifier>,
    sink: Arc<dyn FindingSink>,
    gate: ConcurrencyGate,
    delay: Duration,
    cancel: CancellationToken,
}

impl<P: Prober> Scheduler<P> {
    pub fn new(
        composer: Composer,
        prober: P,
        classifier: Classifier,
        sink: Arc<dyn FindingSink>,
        concurrency: usize,
    ) -> Self {
        Self {
            composer,
            prober: Arc::new(prober),
            classifier: Arc::new(classifier),
            sink,
            gate: ConcurrencyGate::new(concurrency),
            delay: Duration::ZERO,
            cancel: CancellationToken::new(),
        }
    }

    /// Sleep before each probe.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Observe an external token between dispatch steps.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn gate(&self) -> &ConcurrencyGate {
        &self.gate
    }

    pub async fn run<R>(&self, mut wordlist: Wordlist<R>) -> Result<RunSummary, FuzzError>
    where
        R: AsyncBufRead + Unpin,
    {
        // A child token lets a failing task halt dispatch without touching
        // the caller's token.
        let halt = self.cancel.child_token();
        let fatal: Arc<Mutex<Option<FuzzError>>> = Arc::new(Mutex::new(None));
        let counters = Arc::new(Counters::default());
        let tracker = TaskTracker::new();
        let mut summary = RunSummary::default();

        tracing::info!(capacity = self.gate.capacity(), delay_ms = self.delay.as_millis() as u64, "dispatch started");

        loop {
            let next = tokio::select! {
                biased;
                _ = halt.cancelled() => {
                    summary.interrupted = true;
                    break;
                }
                next = wordlist.next_word() => next,
            };
            let word = match next {
                Ok(Some(word)) => word,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(error = %e, "wordlist read failed, stopping dispatch");
                    record_fatal(&fatal, e);
                    break;
                }
            };

            let Some(candidate) = self.composer.compose(&word) else {
                summary.skipped += 1;
                tracing::debug!(word = %word, "line filtered out");
                continue;
            };

            let Some(permit) = self.gate.acquire_or_cancel(&halt).await else {
                summary.interrupted = true;
                break;
            };

            summary.dispatched += 1;
            let task = ProbeTask {
                prober: self.prober.clone(),
                classifier: self.classifier.clone(),
                sink: self.sink.clone(),
                counters: counters.clone(),
                fatal: fatal.clone(),
                halt: halt.clone(),
                delay: self.delay,
            };
            tracker.spawn(task.run(candidate, permit));
        }

        tracker.close();
        tracker.wait().await;

        summary.total_found = counters.found.load(Ordering::SeqCst);
        summary.failed = counters.failed.load(Ordering::SeqCst);
        tracing::info!(
            found = summary.total_found,
            dispatched = summary.dispatched,
            skipped = summary.skipped,
            failed = summary.failed,
            interrupted = summary.interrupted,
            "dispatch finished"
        );

        if let Some(e) = fatal.lock().take() {
            return Err(e);
        }
        Ok(summary)
    }
}

/// Keeps the first fatal error; later ones are only logged.
fn record_fatal(slot: &Mutex<Option<FuzzError>>, err: FuzzError) {
    let mut slot = slot.lock();
    if slot.is_none() {
        *slot = Some(err);
    } else {
        tracing::debug!(error = %err, "additional fatal error");
    }
}

struct ProbeTask<P> {
    prober: Arc<P>,
    classifier: Arc<Classifier>,
    sink: Arc<dyn FindingSink>,
    counters: Arc<Counters>,
    fatal: Arc<Mutex<Option<FuzzError>>>,
    halt: CancellationToken,
    delay: Duration,
}

impl<P: Prober> ProbeTask<P> {
    // The permit lives until this future completes or is dropped.
    async fn run(self, candidate: Candidate, _permit: GatePermit) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let result = match self.prober.probe(&candidate.url).await {
            Ok(result) => result,
            Err(e) => {
                self.counters.failed.fetch_add(1, Ordering::SeqCst);
                tracing::debug!(url = %candidate.url, error = %e, "probe failed");
                return;
            }
        };

        let Some(finding) = self.classifier.classify(&candidate, &result) else {
            return;
        };

        self.counters.found.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = self.sink.report(&finding) {
            tracing::error!(error = %e, "cannot record finding, halting run");
            record_fatal(&self.fatal, e);
            self.halt.cancel();
        }
    }
}
