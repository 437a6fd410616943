//! Simulated backend latency.
//!
//! Every guarded operation pays a delay while it holds its lock, standing in
//! for the I/O cost of a real persistence backend. The delay can be cut short
//! by an interrupt, which fails the operation.

use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::sync::watch;

use crate::config::LatencyConfig;
use crate::error::GuardResult;
use crate::op::Operation;

/// The backend wait ended early because of an interrupt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interrupted;

/// Backend cost model paid inside the critical section.
#[async_trait]
pub trait Latency: Send + Sync {
    /// Wait out the cost of `op`. Returns how long was waited.
    async fn delay(&self, op: Operation) -> Result<Duration, Interrupted>;
}

/// Uniformly distributed delay in `[min_ms, max_ms)` milliseconds.
///
/// Once [`InterruptHandle::interrupt`] has been called, every in-flight and
/// future delay fails with [`Interrupted`].
#[derive(Debug)]
pub struct SimulatedLatency {
    range_ms: Range<u64>,
    interrupt: Arc<watch::Sender<bool>>,
}

impl SimulatedLatency {
    pub fn new(config: &LatencyConfig) -> GuardResult<Self> {
        config.validate()?;
        let (tx, _rx) = watch::channel(false);
        Ok(Self {
            range_ms: config.min_ms..config.max_ms,
            interrupt: Arc::new(tx),
        })
    }

    pub fn interrupt_handle(&self) -> InterruptHandle {
        InterruptHandle {
            tx: Arc::clone(&self.interrupt),
        }
    }

    fn sample(&self) -> Duration {
        let ms = if self.range_ms.is_empty() {
            self.range_ms.start
        } else {
            rand::thread_rng().gen_range(self.range_ms.clone())
        };
        Duration::from_millis(ms)
    }
}

#[async_trait]
impl Latency for SimulatedLatency {
    async fn delay(&self, _op: Operation) -> Result<Duration, Interrupted> {
        let rx = self.interrupt.subscribe();
        if *rx.borrow() {
            return Err(Interrupted);
        }
        let wait = self.sample();
        tokio::select! {
            _ = tokio::time::sleep(wait) => Ok(wait),
            _ = interrupted(rx) => Err(Interrupted),
        }
    }
}

async fn interrupted(mut rx: watch::Receiver<bool>) {
    // A closed channel can never deliver an interrupt.
    if rx.wait_for(|set| *set).await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Cloneable handle that aborts simulated waits.
#[derive(Clone, Debug)]
pub struct InterruptHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl InterruptHandle {
    pub fn interrupt(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_interrupted(&self) -> bool {
        *self.tx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GuardError;

    fn latency(min_ms: u64, max_ms: u64) -> SimulatedLatency {
        SimulatedLatency::new(&LatencyConfig { min_ms, max_ms }).unwrap()
    }

    #[test]
    fn samples_stay_in_range() {
        let l = latency(100, 300);
        for _ in 0..500 {
            let d = l.sample();
            assert!(d >= Duration::from_millis(100) && d < Duration::from_millis(300));
        }
    }

    #[test]
    fn equal_bounds_give_fixed_delay() {
        let l = latency(50, 50);
        assert_eq!(l.sample(), Duration::from_millis(50));
    }

    #[test]
    fn inverted_bounds_rejected() {
        let err = SimulatedLatency::new(&LatencyConfig { min_ms: 300, max_ms: 100 }).unwrap_err();
        assert!(matches!(err, GuardError::InvalidConfig(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn delay_sleeps_for_sample() {
        let l = latency(100, 300);
        let start = tokio::time::Instant::now();
        let waited = l.delay(Operation::Get).await.unwrap();
        let elapsed = start.elapsed();
        assert!(elapsed >= waited && elapsed < waited + Duration::from_millis(5));
    }

    #[tokio::test(start_paused = true)]
    async fn interrupt_cuts_in_flight_delay() {
        let l = Arc::new(latency(1_000, 1_001));
        let handle = l.interrupt_handle();

        let task = {
            let l = Arc::clone(&l);
            tokio::spawn(async move { l.delay(Operation::Save).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.interrupt();

        assert_eq!(task.await.unwrap(), Err(Interrupted));
        assert!(handle.is_interrupted());
    }

    #[tokio::test(start_paused = true)]
    async fn interrupt_is_sticky() {
        let l = latency(10, 20);
        l.interrupt_handle().interrupt();
        assert_eq!(l.delay(Operation::Get).await, Err(Interrupted));
        assert_eq!(l.delay(Operation::Delete).await, Err(Interrupted));
    }
}
