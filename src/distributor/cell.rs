use std::sync::{Arc, RwLock};

use crate::models::Frame;

/// Shared single-slot "most recent frame" cell.
///
/// Single writer (the fan-out task overwrites it on every inbound frame),
/// any number of readers. Readers observe whichever frame was newest at the
/// moment of the read, independent of display consumption cadence.
#[derive(Clone, Default)]
pub struct LatestFrameCell {
    slot: Arc<RwLock<Option<Frame>>>,
}

impl LatestFrameCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(&self, frame: Frame) {
        *self.slot.write().unwrap() = Some(frame);
    }

    pub fn get(&self) -> Option<Frame> {
        self.slot.read().unwrap().clone()
    }
}
