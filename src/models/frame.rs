//! Frame and inference data types shared across the pipeline.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// One opaque snapshot of the live image feed.
///
/// Cloning a `Frame` shares the underlying buffer; frames are transient and
/// never persisted. Identity is handle identity, see [`Frame::same_frame`].
#[derive(Clone, Debug)]
pub struct Frame {
    buffer: Arc<DynamicImage>,
    captured_at: DateTime<Utc>,
}

impl Frame {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            buffer: Arc::new(image),
            captured_at: Utc::now(),
        }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.buffer
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Whether two handles refer to the same capture.
    pub fn same_frame(lhs: &Frame, rhs: &Frame) -> bool {
        Arc::ptr_eq(&lhs.buffer, &rhs.buffer)
    }
}

/// Immutable request handed to the inference engine, one per dispatch.
#[derive(Clone, Debug)]
pub struct CaptureRequest {
    pub frame: Frame,
    pub prompt: String,
    pub prompt_suffix: String,
}

impl CaptureRequest {
    pub fn new(frame: Frame, prompt: impl Into<String>, prompt_suffix: impl Into<String>) -> Self {
        Self {
            frame,
            prompt: prompt.into(),
            prompt_suffix: prompt_suffix.into(),
        }
    }

    /// Prompt and suffix joined the way they are sent to the engine.
    pub fn full_prompt(&self) -> String {
        format!("{} {}", self.prompt, self.prompt_suffix)
    }
}

/// What the engine produced for a single request.
#[derive(Clone, Debug)]
pub struct InferenceResult {
    pub text: String,
    pub time_to_first_token: Duration,
}

/// Coarse engine state, pollable by the presentation layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum EngineStatus {
    Idle,
    ProcessingPrompt,
    GeneratingResponse,
}

impl Default for EngineStatus {
    fn default() -> Self {
        EngineStatus::Idle
    }
}
