use std::sync::Arc;

use super::pink::PinkNoise;
use super::white::WhiteNoise;
use super::GeneratorComponent;
use crate::audio::PlaybackInfo;
use crate::data::{NoiseParam, NoiseType};

/// Noise source switching between silence, white and pink noise.
/// The type and the volume are read from the shared parameters, so they may be changed from another thread.
#[derive(Clone, Debug)]
pub struct NoiseGenerator {
    pub params: Arc<NoiseParam>,
    white: WhiteNoise,
    pink: PinkNoise,
}

impl NoiseGenerator {
    pub fn new(params: Arc<NoiseParam>, num_rows: usize, seed: u64) -> Self {
        Self {
            params,
            white: WhiteNoise::new(seed),
            pink: PinkNoise::new(num_rows, seed.wrapping_add(1)),
        }
    }
    pub fn pink(&self) -> &PinkNoise {
        &self.pink
    }
    /// Unscaled sample of the current noise type.
    pub fn next_sample(&mut self) -> f32 {
        match self.params.noise_type() {
            NoiseType::None => 0.0,
            NoiseType::White => self.white.next_sample(),
            NoiseType::Pink => self.pink.next_sample(),
        }
    }
}

impl GeneratorComponent for NoiseGenerator {
    fn reset(&mut self) {
        self.pink.reset();
    }

    fn render_sample(&mut self, out: &mut f32, _info: &PlaybackInfo) {
        *out = self.next_sample();
    }

    fn gain(&self) -> f32 {
        self.params.volume()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::audio::generator::pink::DEFAULT_PINK_ROWS;
    use crate::audio::Component;

    fn make(t: NoiseType, volume: f32) -> NoiseGenerator {
        NoiseGenerator::new(Arc::new(NoiseParam::new(t, volume)), DEFAULT_PINK_ROWS, 123)
    }

    #[test]
    fn none_renders_silence() {
        let mut g = make(NoiseType::Pink, 1.0);
        let info = PlaybackInfo::new(44100, 2);
        let mut buf = vec![0.0f32; 512];
        g.render(&mut buf, &info);
        assert!(buf.iter().any(|s| *s != 0.0));
        g.params.set_noise_type(NoiseType::None);
        g.render(&mut buf, &info);
        assert!(buf.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn volume_scales_linearly() {
        let mut a = make(NoiseType::Pink, 0.25);
        let mut b = a.clone();
        let info = PlaybackInfo::new(44100, 1);
        let mut quiet = vec![0.0f32; 1024];
        let mut loud = vec![0.0f32; 1024];
        a.render(&mut quiet, &info);
        // the clone shares the parameters but has its own generator state
        b.params.set_volume(0.5);
        b.render(&mut loud, &info);
        for (q, l) in quiet.iter().zip(loud.iter()) {
            assert_eq!(*l, *q * 2.0);
        }
    }

    #[test]
    fn one_sample_per_slot() {
        let mut g = make(NoiseType::White, 1.0);
        let mut reference = g.clone();
        let info = PlaybackInfo::new(44100, 2);
        let mut buf = vec![0.0f32; 256];
        g.render(&mut buf, &info);
        for s in buf.iter() {
            assert_eq!(*s, reference.next_sample());
        }
    }

    #[test]
    fn switching_type_mid_stream() {
        let mut g = make(NoiseType::White, 1.0);
        let order = [
            NoiseType::Pink,
            NoiseType::None,
            NoiseType::White,
            NoiseType::Pink,
        ];
        for t in order.iter().cycle().take(1000) {
            g.params.set_noise_type(*t);
            let s = g.next_sample();
            assert!((-1.0..=1.0).contains(&s));
            if *t == NoiseType::None {
                assert_eq!(s, 0.0);
            }
        }
        let rows: i64 = g.pink().rows().iter().sum();
        assert_eq!(rows, g.pink().running_sum());
    }

    #[test]
    fn prepare_play_resets_pink_state() {
        let mut g = make(NoiseType::Pink, 1.0);
        let info = PlaybackInfo::new(44100, 2);
        let mut buf = vec![0.0f32; 128];
        g.render(&mut buf, &info);
        assert_ne!(g.pink().index(), 0);
        g.prepare_play(&info);
        assert_eq!(g.pink().index(), 0);
        assert_eq!(g.pink().running_sum(), 0);
    }
}
