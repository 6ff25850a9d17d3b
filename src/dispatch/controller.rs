use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::annotate::extract_first_emoji;
use crate::distributor::LatestFrameCell;
use crate::models::{CaptureRequest, EmojiEntry, EngineStatus, Frame};
use crate::settings::SettingsStore;
use crate::store::EmojiLogStore;

use super::engine::InferenceEngine;
use super::loop_worker::timed_loop;

const ENABLE_LOGS: bool = true;

use crate::log_warn;

struct TimedHandle {
    cancel_token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Triggers inference on demand or on a repeating timer, publishes the
/// resulting text, and feeds extracted emojis into the log store.
///
/// Cloning shares the same dispatcher.
#[derive(Clone)]
pub struct InferenceDispatcher {
    engine: Arc<dyn InferenceEngine>,
    latest: LatestFrameCell,
    store: EmojiLogStore,
    settings: Arc<SettingsStore>,
    output_tx: Arc<watch::Sender<String>>,
    ttft_tx: Arc<watch::Sender<Option<Duration>>>,
    in_flight: Arc<AtomicBool>,
    timed: Arc<Mutex<Option<TimedHandle>>>,
}

impl InferenceDispatcher {
    pub fn new(
        engine: Arc<dyn InferenceEngine>,
        latest: LatestFrameCell,
        store: EmojiLogStore,
        settings: Arc<SettingsStore>,
    ) -> Self {
        let (output_tx, _) = watch::channel(String::new());
        let (ttft_tx, _) = watch::channel(None);

        Self {
            engine,
            latest,
            store,
            settings,
            output_tx: Arc::new(output_tx),
            ttft_tx: Arc::new(ttft_tx),
            in_flight: Arc::new(AtomicBool::new(false)),
            timed: Arc::new(Mutex::new(None)),
        }
    }

    /// Fires one inference for `frame` and returns immediately.
    ///
    /// Concurrent dispatches are not mutually excluded: a manual trigger can
    /// overlap a timed tick, and whichever result lands last wins the
    /// published output. Setting `singleFlight` in the pipeline settings
    /// opts into skipping a dispatch while another is still in flight.
    /// Engine failures and empty results produce no annotation and are
    /// swallowed after a log line.
    pub fn dispatch_once(&self, frame: Frame) {
        let settings = self.settings.get();

        if settings.single_flight && self.in_flight.swap(true, Ordering::SeqCst) {
            log_warn!("dispatch skipped, another inference is in flight");
            return;
        }

        // Clear the published output so observers see the request start.
        self.output_tx.send_replace(String::new());

        let request = CaptureRequest::new(frame, settings.prompt, settings.prompt_suffix);
        let this = self.clone();
        let single_flight = settings.single_flight;

        tokio::spawn(async move {
            match this.engine.generate(request).await {
                Ok(result) => {
                    this.ttft_tx.send_replace(Some(result.time_to_first_token));

                    if result.text.is_empty() {
                        log_warn!("inference returned empty output, no annotation");
                    } else {
                        this.output_tx.send_replace(result.text.clone());

                        if let Some(emoji) = extract_first_emoji(&result.text) {
                            this.store.append(EmojiEntry::new(emoji)).await;
                        }
                    }
                }
                Err(err) => {
                    log_warn!("inference failed, skipping annotation: {err:?}");
                }
            }

            if single_flight {
                this.in_flight.store(false, Ordering::SeqCst);
            }
        });
    }

    /// Starts the repeating dispatch loop. Errors if one is already running.
    pub async fn start_timed(&self, interval: Duration) -> Result<()> {
        if interval.is_zero() {
            bail!("timed dispatch interval must be non-zero");
        }

        let mut guard = self.timed.lock().await;
        if guard.is_some() {
            bail!("timed dispatch already running");
        }

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(timed_loop(
            self.clone(),
            interval,
            cancel_token.clone(),
        ));

        *guard = Some(TimedHandle {
            cancel_token,
            handle,
        });
        Ok(())
    }

    /// Cancels the repeating loop. Idempotent. Inference calls already
    /// dispatched by earlier ticks keep running; only future ticks are
    /// suppressed.
    pub async fn stop_timed(&self) -> Result<()> {
        let taken = self.timed.lock().await.take();
        if let Some(TimedHandle {
            cancel_token,
            handle,
        }) = taken
        {
            cancel_token.cancel();
            handle
                .await
                .context("timed dispatch task failed to join")?;
        }
        Ok(())
    }

    /// Latest published result text (empty while a request is pending).
    pub fn output(&self) -> String {
        self.output_tx.borrow().clone()
    }

    /// Watch-style subscription to the published result text.
    pub fn subscribe_output(&self) -> watch::Receiver<String> {
        self.output_tx.subscribe()
    }

    /// Time-to-first-token of the most recent completed inference.
    pub fn time_to_first_token(&self) -> Option<Duration> {
        *self.ttft_tx.borrow()
    }

    pub fn engine_status(&self) -> EngineStatus {
        self.engine.status()
    }

    pub(super) fn newest_frame(&self) -> Option<Frame> {
        self.latest.get()
    }
}
