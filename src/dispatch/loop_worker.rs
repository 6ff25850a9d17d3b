use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::controller::InferenceDispatcher;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Repeating dispatch loop: wait one interval, then describe whichever frame
/// is newest at wake time. Runs until cancelled.
///
/// The first tick fires a full interval after the loop starts, so starting
/// and immediately stopping dispatches nothing. A wake with no frame
/// available is skipped silently.
pub(super) async fn timed_loop(
    dispatcher: InferenceDispatcher,
    interval: Duration,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match dispatcher.newest_frame() {
                    Some(frame) => dispatcher.dispatch_once(frame),
                    None => log_info!("timed dispatch tick skipped, no frame observed yet"),
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("timed dispatch loop shutting down");
                break;
            }
        }
    }
}
