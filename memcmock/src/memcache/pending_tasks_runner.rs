use crate::memcache::dispatcher::CallbackDispatcher;
use log::debug;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant as StdInstant};
use tokio::time::{interval_at, Instant};

/// Delivers queued callbacks from inside a tokio runtime, one turn per
/// wake up, yielding to other tasks between turns.
pub struct PendingTasksRunner {
    dispatcher: Arc<CallbackDispatcher>,
}

impl PendingTasksRunner {
    const INTERVAL_IN_MILIS: u64 = 100;
    pub fn new(dispatcher: Arc<CallbackDispatcher>) -> Self {
        debug!("Creating pending tasks runner");
        PendingTasksRunner { dispatcher }
    }

    pub async fn run(&self) {
        let start = Instant::now();
        let mut interval = interval_at(
            start,
            Duration::from_millis(PendingTasksRunner::INTERVAL_IN_MILIS),
        );
        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = self.dispatcher.notified() => {}
            }
            let start = StdInstant::now();
            let turn =
                panic::catch_unwind(AssertUnwindSafe(|| self.dispatcher.run_pending_tasks()));
            let delivered = match turn {
                Ok(delivered) => delivered,
                Err(_) => {
                    error!("Callback panicked, the rest of its turn was requeued");
                    0
                }
            };
            let duration = start.elapsed();
            if duration.as_millis() > (PendingTasksRunner::INTERVAL_IN_MILIS * 2) as u128 {
                warn!(
                    "Delivering {} callbacks finished in: {:?}",
                    delivered, duration
                );
            } else if delivered > 0 {
                trace!(
                    "Delivering {} callbacks finished in: {:?}",
                    delivered, duration
                );
            }
            tokio::task::yield_now().await;
        }
    }
}
