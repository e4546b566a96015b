use super::PlaybackInfo;

/// Anything that can render interleaved audio into a buffer.
pub trait Component: std::fmt::Debug {
    fn prepare_play(&mut self, info: &PlaybackInfo);
    fn render(&mut self, output: &mut [f32], info: &PlaybackInfo);
}
