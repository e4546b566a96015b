//! Noisegen synthesizes white and pink noise and feeds it to the audio output through a double-buffered queue.
//!

pub mod audio;
pub mod cli;
pub mod data;
pub mod parameter;
pub mod utils;
