//! Boundary to the external frame producer (camera, capture session, replay).

use tokio::sync::watch;

use crate::models::Frame;

/// Latest-wins ingest handle given to a source on attach.
///
/// The sink holds a single slot: pushing while the distributor has not yet
/// consumed the previous frame silently replaces it. This is the capacity-1
/// buffer between the producer and everything downstream.
pub struct FrameSink {
    tx: watch::Sender<Option<Frame>>,
}

impl FrameSink {
    pub(crate) fn new() -> (Self, watch::Receiver<Option<Frame>>) {
        let (tx, rx) = watch::channel(None);
        (Self { tx }, rx)
    }

    /// Push one frame. Returns `false` once the distributor has stopped
    /// listening; the source can use that to tear itself down early.
    pub fn push(&self, frame: Frame) -> bool {
        self.tx.send(Some(frame)).is_ok()
    }
}

/// An unbounded producer of opaque frames.
///
/// `attach` is called once per distributor start and `detach` exactly once
/// per stop. Dropping the sink (instead of waiting for `detach`) ends the
/// feed from the source side; the distributor treats that as end-of-stream,
/// not as an error.
pub trait FrameSource: Send + Sync {
    fn attach(&self, sink: FrameSink);
    fn detach(&self);
}
