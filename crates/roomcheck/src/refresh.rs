//! Timer-driven overview refresh for the admin watch view.
//!
//! There is no push channel: the view simply re-reads every set on each tick
//! until it is told to stop.

use std::future::Future;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use crate::overview::Overview;
use crate::tracker::AdminSession;

/// Re-read the overview every `period` and hand it to `render`, until `stop`
/// completes. The first render happens immediately.
///
/// Returns the number of renders.
pub async fn watch_until<F, S>(
    session: AdminSession<'_>,
    period: Duration,
    stop: S,
    mut render: F,
) -> u64
where
    F: FnMut(&Overview),
    S: Future<Output = ()>,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(stop);

    let mut renders = 0;
    loop {
        tokio::select! {
            () = &mut stop => {
                debug!("Watch stopped after {} refreshes", renders);
                return renders;
            }
            _ = ticker.tick() => {
                render(&session.overview());
                renders += 1;
            }
        }
    }
}

/// Refresh until Ctrl-C.
pub async fn watch<F>(session: AdminSession<'_>, period: Duration, render: F) -> u64
where
    F: FnMut(&Overview),
{
    watch_until(
        session,
        period,
        async {
            // If the handler cannot be installed, stop rather than spin forever.
            let _ = tokio::signal::ctrl_c().await;
        },
        render,
    )
    .await
}
