//! Sample generation and the double-buffered queue feeding the output device.

pub const NUMBER_OF_BUFFERS: usize = 2;
pub const BYTES_PER_BUFFER: usize = 2 * 8 * 1024;
pub const SAMPLES_PER_BUFFER: usize = BYTES_PER_BUFFER / std::mem::size_of::<f32>();
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

#[derive(Clone, Debug)]
pub struct PlaybackInfo {
    pub sample_rate: u32,
    /// position in frames
    pub current_time: usize,
    pub frame_per_buffer: u64,
    pub channels: u64,
}

impl PlaybackInfo {
    pub fn new(sample_rate: u32, channels: u64) -> Self {
        let channels = channels.max(1);
        Self {
            sample_rate,
            current_time: 0,
            frame_per_buffer: (SAMPLES_PER_BUFFER as u64 / channels).max(1),
            channels,
        }
    }
    /// Interleaved samples in one queue buffer.
    pub fn samples_per_buffer(&self) -> usize {
        (self.frame_per_buffer * self.channels) as usize
    }
    pub fn rewind(&mut self) {
        self.current_time = 0;
    }
}

pub mod component;
pub use component::Component;
pub mod generator;
pub mod queue;
pub mod renderer;
