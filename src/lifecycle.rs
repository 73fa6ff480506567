//! Run-wide shutdown: an interrupt watcher and an optional deadline race
//! normal completion. Whichever fires first ends the run according to the
//! configured [`ShutdownPolicy`].

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// What happens when a signal or the deadline fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShutdownPolicy {
    /// Print a farewell and exit the process at once. In-flight probes are
    /// abandoned and no summary is printed.
    #[default]
    Abort,
    /// Cancel the run token: dispatch stops, in-flight probes finish and
    /// the summary is still printed.
    Drain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Interrupt,
    Deadline,
}

pub struct Lifecycle {
    token: CancellationToken,
    deadline: Option<Instant>,
    policy: ShutdownPolicy,
}

impl Lifecycle {
    /// Starts the clock. A zero deadline means no deadline.
    pub fn new(deadline: Option<Duration>, policy: ShutdownPolicy) -> Self {
        let start = Instant::now();
        Self {
            token: CancellationToken::new(),
            deadline: deadline.filter(|d| !d.is_zero()).map(|d| start + d),
            policy,
        }
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Spawn the watchers. The task ends with `None` if the token is
    /// cancelled by someone else first.
    pub fn spawn(&self) -> JoinHandle<Option<Trigger>> {
        let token = self.token.clone();
        let deadline = self.deadline;
        let policy = self.policy;
        tokio::spawn(async move {
            let trigger = tokio::select! {
                _ = token.cancelled() => return None,
                t = wait_for_trigger(deadline) => t,
            };
            println!("\nExiting");
            tracing::info!(?trigger, ?policy, "stopping run");
            match policy {
                ShutdownPolicy::Abort => std::process::exit(0),
                ShutdownPolicy::Drain => token.cancel(),
            }
            Some(trigger)
        })
    }
}

async fn wait_for_trigger(deadline: Option<Instant>) -> Trigger {
    let expire = async {
        match deadline {
            Some(at) => tokio::time::sleep_until(at).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::select! {
        _ = interrupt_signal() => Trigger::Interrupt,
        _ = expire => Trigger::Deadline,
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn interrupt_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = ctrl_c() => {}
                    _ = term.recv() => {}
                }
                return;
            }
            Err(e) => tracing::warn!(error = %e, "cannot watch SIGTERM"),
        }
    }
    ctrl_c().await
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot watch Ctrl-C");
        std::future::pending::<()>().await
    }
}
