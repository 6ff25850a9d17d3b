use anyhow::Result;
use async_trait::async_trait;

use crate::models::{CaptureRequest, EngineStatus, InferenceResult};

/// Boundary to the on-device vision-language engine.
///
/// The engine is an opaque asynchronous capability: one request in, one
/// result out. No cancellation API is assumed; a request that has been
/// submitted runs to completion on the engine's side.
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    async fn generate(&self, request: CaptureRequest) -> Result<InferenceResult>;

    /// Coarse engine state for the presentation layer to poll.
    fn status(&self) -> EngineStatus {
        EngineStatus::Idle
    }
}
