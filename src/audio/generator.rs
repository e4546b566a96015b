use super::*;

/// A source producing one sample per call.
pub trait GeneratorComponent {
    fn reset(&mut self);
    fn render_sample(&mut self, out: &mut f32, info: &PlaybackInfo);
    /// Read once per rendered buffer.
    fn gain(&self) -> f32 {
        1.0
    }
}
impl<T> Component for T
where
    T: GeneratorComponent + Clone + std::fmt::Debug,
{
    fn prepare_play(&mut self, _info: &PlaybackInfo) {
        self.reset();
    }
    /// Every slot gets its own sample, so `output.len()` samples advance the generator by as many steps.
    fn render(&mut self, output: &mut [f32], info: &PlaybackInfo) {
        let gain = self.gain();
        for s in output.iter_mut() {
            let mut res = 0.0;
            self.render_sample(&mut res, info);
            *s = res * gain;
        }
    }
}

pub mod noise;
pub mod pink;
pub mod white;
