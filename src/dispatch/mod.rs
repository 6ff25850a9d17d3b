pub mod controller;
pub mod engine;
mod loop_worker;

pub use controller::InferenceDispatcher;
pub use engine::InferenceEngine;
