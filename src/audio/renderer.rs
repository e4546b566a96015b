use crate::audio::queue::QueuePlayer;
use crate::audio::{Component, PlaybackInfo};
use crate::data::{PlayOp, Transport};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("no audio output device available")]
    NoDevice,
    #[error("failed to get the default output config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to build the output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to start the output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
    #[error("unsupported sample format {0:?}")]
    UnsupportedFormat(cpal::SampleFormat),
}

/// Owns the output stream. The stream callback owns the queue player; the two sides only talk through `Transport`.
pub struct Renderer {
    stream: cpal::Stream,
    transport: Arc<Transport>,
    info: PlaybackInfo,
}

fn build_stream<T, E>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut player: QueuePlayer<E>,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample + FromSample<f32>,
    E: Component + Send + 'static,
{
    let mut scratch = vec![0.0f32; crate::audio::SAMPLES_PER_BUFFER];
    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            // only grows when the device asks for a larger block than before
            if scratch.len() < data.len() {
                scratch.resize(data.len(), 0.0);
            }
            let buf = &mut scratch[..data.len()];
            player.process(buf);
            for (d, s) in data.iter_mut().zip(buf.iter()) {
                *d = T::from_sample(*s);
            }
        },
        |err| log::error!("audio stream error: {}", err),
        None,
    )
}

impl Renderer {
    pub fn new<E>(
        source: E,
        sample_rate: Option<u32>,
        buffer_size: Option<u32>,
        transport: Arc<Transport>,
    ) -> Result<Self, RendererError>
    where
        E: Component + Send + 'static,
    {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(RendererError::NoDevice)?;
        let supported = device.default_output_config()?;
        let format = supported.sample_format();
        let mut config: cpal::StreamConfig = supported.config();
        if let Some(sr) = sample_rate {
            config.sample_rate = cpal::SampleRate(sr);
        }
        config.buffer_size = match buffer_size {
            Some(frames) => cpal::BufferSize::Fixed(frames),
            None => cpal::BufferSize::Default,
        };
        log::info!(
            "output: {} @ {}Hz, {} channels, {:?}",
            device.name().unwrap_or_else(|_| "unknown".to_string()),
            config.sample_rate.0,
            config.channels,
            format
        );

        let info = PlaybackInfo::new(config.sample_rate.0, config.channels as u64);
        let player = QueuePlayer::new(source, info.clone(), Arc::clone(&transport));
        let stream = match format {
            cpal::SampleFormat::F32 => build_stream::<f32, E>(&device, &config, player)?,
            cpal::SampleFormat::I16 => build_stream::<i16, E>(&device, &config, player)?,
            cpal::SampleFormat::U16 => build_stream::<u16, E>(&device, &config, player)?,
            other => return Err(RendererError::UnsupportedFormat(other)),
        };
        // keep the callback running; silence comes from the stopped queue
        stream.play()?;
        Ok(Self {
            stream,
            transport,
            info,
        })
    }

    pub fn info(&self) -> &PlaybackInfo {
        &self.info
    }
    // requests are logged here, the callback thread itself never logs
    fn request(&mut self, op: PlayOp) {
        log::debug!("{:?} requested at {:.2}s", op, self.get_current_realtime());
        self.transport.request_play(op);
    }
    pub fn play(&mut self) {
        self.request(PlayOp::Play);
    }
    pub fn pause(&mut self) {
        self.request(PlayOp::Pause);
    }
    /// Stops, rewinds the clock and resets the generator state.
    pub fn halt(&mut self) {
        self.request(PlayOp::Halt);
    }
    /// The state last applied by the audio thread.
    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }
    pub fn get_current_realtime(&self) -> f32 {
        self.transport.time() as f32 / self.info.sample_rate as f32
    }
    /// Pauses the device stream itself, e.g. before dropping.
    pub fn suspend(&self) -> Result<(), cpal::PauseStreamError> {
        self.stream.pause()
    }
}

pub fn create_renderer<E>(
    source: E,
    sample_rate: Option<u32>,
    buffer_size: Option<u32>,
    transport: Arc<Transport>,
) -> Result<Renderer, RendererError>
where
    E: Component + Send + 'static,
{
    Renderer::new(source, sample_rate, buffer_size, transport)
}
