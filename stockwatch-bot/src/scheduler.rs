use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use stockwatch_core::StockMonitor;

/// Run a monitoring pass every `interval`, starting immediately.
///
/// Passes never overlap: a pass that overruns the interval delays the next
/// tick instead of queueing a burst.
pub fn spawn_monitor_loop(monitor: StockMonitor, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_seconds = interval.as_secs(), "stock monitor started");

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if let Err(err) = monitor.run_pass().await {
                error!(%err, "monitoring pass aborted");
            }
        }
    })
}
