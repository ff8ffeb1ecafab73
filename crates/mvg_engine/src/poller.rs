use std::time::Duration;

use mvg_core::OutboundRequest;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Periodic departure requests running on a tokio task.
///
/// The first request goes out immediately, then one per `period`. Dropping
/// the poller cancels the task.
#[derive(Debug)]
pub(crate) struct Poller {
    handle: JoinHandle<()>,
}

impl Poller {
    /// Spawn on the current tokio runtime, `None` outside of one.
    pub(crate) fn spawn(
        request: OutboundRequest,
        period: Duration,
        outbound: mpsc::UnboundedSender<OutboundRequest>,
    ) -> Option<Self> {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::error!("Cannot start departure polling without a runtime: {}", e);
                return None;
            }
        };

        let handle = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if outbound.send(request.clone()).is_err() {
                    tracing::warn!("Outbound request queue closed, stopping departure polling");
                    break;
                }
            }
        });
        Some(Poller { handle })
    }

    pub(crate) fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
