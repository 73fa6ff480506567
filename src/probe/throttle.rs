use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

/// One in-flight slot. The slot is returned when the permit is dropped,
/// so a task that fails or panics still releases it.
#[derive(Debug)]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

/// Fixed-capacity gate bounding the number of probes in flight.
#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl ConcurrencyGate {
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of permits currently held.
    pub fn in_flight(&self) -> usize {
        self.capacity - self.semaphore.available_permits()
    }

    // The semaphore is never closed, so `None` only comes from cancellation.
    async fn acquire(&self) -> Option<GatePermit> {
        let permit = self.semaphore.clone().acquire_owned().await.ok()?;
        Some(GatePermit { _permit: permit })
    }

    /// Wait for a free slot. Gives up with `None` once `cancel` fires.
    pub async fn acquire_or_cancel(&self, cancel: &CancellationToken) -> Option<GatePermit> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            permit = self.acquire() => permit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn permits_are_returned_on_drop() {
        let gate = ConcurrencyGate::new(2);
        let a = gate.acquire().await.unwrap();
        let _b = gate.acquire().await.unwrap();
        assert_eq!(gate.in_flight(), 2);
        drop(a);
        assert_eq!(gate.in_flight(), 1);
    }

    #[tokio::test]
    async fn saturated_gate_blocks_until_cancelled() {
        let gate = ConcurrencyGate::new(1);
        let _held = gate.acquire().await.unwrap();
        let cancel = CancellationToken::new();
        let c = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            c.cancel();
        });
        let res = gate.acquire_or_cancel(&cancel).await;
        assert!(res.is_none());
    }
}
