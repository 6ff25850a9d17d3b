pub mod entry;
pub mod frame;

pub use entry::EmojiEntry;
pub use frame::{CaptureRequest, EngineStatus, Frame, InferenceResult};
