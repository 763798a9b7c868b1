//! Scheduled rate refresh.
//!
//! One poller per provider keeps the rate warm for every consumer; no
//! consumer runs its own timer.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use nakhla_types::{KeyValueStore, RateSource};

use crate::RateProvider;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to a running poller. Dropping it also stops the task.
pub struct PollerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stops the poller and waits for an in-flight poll to settle.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            error!("Rate poller task failed: {}", e);
        }
    }

    /// Returns true while the task is alive.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl<R: RateSource, S: KeyValueStore> RateProvider<R, S> {
    /// Starts polling every `every`.
    ///
    /// The first tick fires immediately and honours a fresh cache; every
    /// later tick forces a refresh. A tick's fetch settles before the next
    /// tick is awaited, and late ticks are delayed rather than bunched.
    pub fn start_polling(self: &Arc<Self>, every: Duration) -> PollerHandle {
        let provider = Arc::clone(self);
        let every = every.max(MIN_INTERVAL);
        let (shutdown, mut stop) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            info!("Starting rate poller every {:?}", every);
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut first = true;

            loop {
                tokio::select! {
                    _ = &mut stop => break,
                    _ = ticker.tick() => {
                        let snapshot = if first {
                            provider.get_rate().await
                        } else {
                            provider.refresh().await
                        };
                        first = false;
                        debug!(status = ?snapshot.status, "Scheduled poll complete");
                    }
                }
            }

            info!("Rate poller stopped");
        });

        PollerHandle {
            shutdown: Some(shutdown),
            task,
        }
    }
}
