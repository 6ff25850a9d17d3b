mod annotate;
mod dispatch;
mod distributor;
mod frame_source;
mod models;
mod settings;
mod store;
mod utils;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

pub use annotate::extract_first_emoji;
pub use dispatch::{InferenceDispatcher, InferenceEngine};
pub use distributor::{DisplayFeed, FrameDistributor, LatestFrameCell};
pub use frame_source::{FrameSink, FrameSource};
pub use models::{CaptureRequest, EmojiEntry, EngineStatus, Frame, InferenceResult};
pub use settings::{PipelineSettings, SettingsStore};
pub use store::EmojiLogStore;

/// Fully wired pipeline: distributor, dispatcher, emoji log and settings,
/// sharing one injected engine and one data directory.
///
/// The engine and frame source are constructed by the host and passed in;
/// nothing here is a process-wide singleton.
pub struct Pipeline {
    distributor: FrameDistributor,
    dispatcher: InferenceDispatcher,
    store: EmojiLogStore,
    settings: Arc<SettingsStore>,
}

impl Pipeline {
    pub fn new(engine: Arc<dyn InferenceEngine>, data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create data dir {}", data_dir.display()))?;

        let settings = Arc::new(SettingsStore::new(data_dir.join("settings.json"))?);
        let store = EmojiLogStore::new(data_dir.join("emoji_log.json"));
        let distributor = FrameDistributor::new();
        let dispatcher = InferenceDispatcher::new(
            engine,
            distributor.latest_frame_cell(),
            store.clone(),
            settings.clone(),
        );

        Ok(Self {
            distributor,
            dispatcher,
            store,
            settings,
        })
    }

    /// Attaches the frame source and returns the display feed.
    pub fn start(&mut self, source: Arc<dyn FrameSource>) -> Result<DisplayFeed> {
        self.distributor.start(source)
    }

    /// Stops timed dispatch and frame distribution. Idempotent.
    pub async fn stop(&mut self) -> Result<()> {
        self.dispatcher.stop_timed().await?;
        self.distributor.stop().await
    }

    /// One-shot description of the most recent frame. Returns `false` when
    /// no frame has been observed yet.
    pub fn describe_latest(&self) -> bool {
        match self.distributor.latest_frame() {
            Some(frame) => {
                self.dispatcher.dispatch_once(frame);
                true
            }
            None => false,
        }
    }

    /// Starts the repeating dispatch loop at the configured interval.
    pub async fn start_timed(&self) -> Result<()> {
        let interval = Duration::from_secs(self.settings.get().timed_interval_secs);
        self.dispatcher.start_timed(interval).await
    }

    pub async fn stop_timed(&self) -> Result<()> {
        self.dispatcher.stop_timed().await
    }

    pub fn distributor(&self) -> &FrameDistributor {
        &self.distributor
    }

    pub fn dispatcher(&self) -> &InferenceDispatcher {
        &self.dispatcher
    }

    pub fn store(&self) -> &EmojiLogStore {
        &self.store
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }
}
