use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::frame_source::{FrameSink, FrameSource};
use crate::models::Frame;

use super::cell::LatestFrameCell;
use super::fanout::fanout_loop;

/// Consumer side of the display feed.
///
/// Latest-wins with capacity 1: a consumer slower than the producer skips
/// intermediate frames but always observes them in production order, without
/// duplicates. `next` returns `None` once the distributor stops or the
/// source goes away.
pub struct DisplayFeed {
    rx: watch::Receiver<Option<Frame>>,
}

impl DisplayFeed {
    fn new(rx: watch::Receiver<Option<Frame>>) -> Self {
        Self { rx }
    }

    /// Waits for the newest frame not yet seen by this feed.
    pub async fn next(&mut self) -> Option<Frame> {
        loop {
            if self.rx.changed().await.is_err() {
                return None;
            }
            // The initial slot value is empty; skip it.
            if let Some(frame) = self.rx.borrow_and_update().clone() {
                return Some(frame);
            }
        }
    }
}

/// Owns the fan-out between a frame source and its consumers: the display
/// feed plus the shared "most recent frame" cell used for on-demand capture.
pub struct FrameDistributor {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
    source: Option<Arc<dyn FrameSource>>,
    latest: LatestFrameCell,
}

impl FrameDistributor {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
            source: None,
            latest: LatestFrameCell::new(),
        }
    }

    /// Attaches to `source` and begins distributing frames.
    pub fn start(&mut self, source: Arc<dyn FrameSource>) -> Result<DisplayFeed> {
        if self.handle.is_some() {
            bail!("frame distributor already active");
        }

        let (sink, ingest) = FrameSink::new();
        let (display_tx, display_rx) = watch::channel(None);
        let cancel_token = CancellationToken::new();

        source.attach(sink);

        let handle = tokio::spawn(fanout_loop(
            ingest,
            display_tx,
            self.latest.clone(),
            cancel_token.clone(),
        ));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        self.source = Some(source);
        Ok(DisplayFeed::new(display_rx))
    }

    /// Stops distribution. Idempotent; detaches from the source exactly once
    /// and closes the display feed. A frame already forwarded but not yet
    /// consumed stays readable from the feed before it reports end-of-stream.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(source) = self.source.take() {
            source.detach();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("frame fan-out task failed to join")?;
        }

        Ok(())
    }

    /// Most recent frame observed from the source, if any yet.
    pub fn latest_frame(&self) -> Option<Frame> {
        self.latest.get()
    }

    /// Cloneable handle to the last-frame slot, for the dispatcher.
    pub fn latest_frame_cell(&self) -> LatestFrameCell {
        self.latest.clone()
    }
}

impl Default for FrameDistributor {
    fn default() -> Self {
        Self::new()
    }
}
