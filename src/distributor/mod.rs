pub mod cell;
pub mod controller;
mod fanout;

pub use cell::LatestFrameCell;
pub use controller::{DisplayFeed, FrameDistributor};
