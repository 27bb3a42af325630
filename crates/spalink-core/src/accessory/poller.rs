// ── Accessory pollers ──
//
// One task per accessory, each on its own interval, all reading through the
// same `Spa`. Rendered state is published on a watch channel and only
// replaced when it changes. A failed poll keeps the previous state.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::Accessory;
use crate::backend::SpaBackend;
use crate::spa::Spa;

/// A running accessory poller.
pub struct PollerHandle<S> {
    name: String,
    state: watch::Receiver<Option<S>>,
    task: JoinHandle<()>,
}

impl<S: Clone> PollerHandle<S> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Latest rendered state; `None` until the first successful poll.
    pub fn current(&self) -> Option<S> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<S>> {
        self.state.clone()
    }

    /// Wait for the task to exit (after its cancellation token fires).
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            warn!(accessory = %self.name, error = %e, "poller task failed");
        }
    }
}

/// Start polling `spa` for `accessory` every `interval` until `cancel` fires.
///
/// The first poll happens immediately.
pub fn spawn_poller<A, B>(
    spa: Spa<B>,
    accessory: A,
    interval: Duration,
    cancel: CancellationToken,
) -> PollerHandle<A::State>
where
    A: Accessory,
    B: SpaBackend,
{
    let name = accessory.name();
    let (tx, rx) = watch::channel(None);
    let task = tokio::spawn(poll_task(spa, accessory, interval, cancel, tx));
    PollerHandle {
        name,
        state: rx,
        task,
    }
}

async fn poll_task<A, B>(
    spa: Spa<B>,
    accessory: A,
    interval: Duration,
    cancel: CancellationToken,
    tx: watch::Sender<Option<A::State>>,
) where
    A: Accessory,
    B: SpaBackend,
{
    let name = accessory.name();
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                match spa.status().await {
                    Ok(status) => {
                        let next = accessory.render(&status);
                        let changed = tx.send_if_modified(|current| {
                            if current.as_ref() == Some(&next) {
                                false
                            } else {
                                *current = Some(next);
                                true
                            }
                        });
                        if changed {
                            debug!(accessory = %name, "state changed");
                        }
                    }
                    Err(e) => {
                        warn!(accessory = %name, error = %e, "poll failed, keeping last state");
                    }
                }
            }
        }
    }

    debug!(accessory = %name, "poller stopped");
}
