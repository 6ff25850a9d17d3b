use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::models::Frame;

use super::cell::LatestFrameCell;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Fan-out task: consumes the source's latest-wins sink and republishes each
/// frame to the display feed while overwriting the shared last-frame cell.
///
/// Exits when the cancellation token fires or when the source drops its sink.
/// The display sender is owned here, so either exit path closes the display
/// feed for its consumer.
pub(super) async fn fanout_loop(
    mut ingest: watch::Receiver<Option<Frame>>,
    display_tx: watch::Sender<Option<Frame>>,
    latest: LatestFrameCell,
    cancel_token: CancellationToken,
) {
    loop {
        tokio::select! {
            changed = ingest.changed() => {
                if changed.is_err() {
                    log_info!("frame source closed its sink, fan-out exiting");
                    break;
                }

                let frame = ingest.borrow_and_update().clone();
                if let Some(frame) = frame {
                    latest.set(frame.clone());
                    // Display consumer may be gone; frames are then discarded.
                    let _ = display_tx.send(Some(frame));
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("frame fan-out shutting down");
                break;
            }
        }
    }
}
