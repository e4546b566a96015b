//! Double-buffered hand-off between the sample source and the output device.
//!
//! A fixed pool of buffers circulates: the feeder fills a free buffer and submits it to the
//! queue, the device side drains the oldest submitted buffer, and every drained buffer comes
//! back to the feeder for exactly one refill. With two buffers, one is always queued while the
//! other is being played.

use ringbuf::{HeapConsumer, HeapProducer, HeapRb};
use std::sync::Arc;

use super::{Component, PlaybackInfo, NUMBER_OF_BUFFERS};
use crate::data::{PlayOp, Transport};

/// Interleaved samples with a fixed length.
#[derive(Clone, Debug)]
pub struct AudioBuffer {
    id: usize,
    data: Vec<f32>,
}

impl AudioBuffer {
    pub fn new(id: usize, len: usize) -> Self {
        Self {
            id,
            data: vec![0.0; len],
        }
    }
    pub fn id(&self) -> usize {
        self.id
    }
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }
}

#[derive(Debug)]
pub enum Read {
    /// `n` samples written, the buffer in playback still has data.
    Partial(usize),
    /// `n` samples written and the buffer was drained.
    Consumed(usize, AudioBuffer),
    /// nothing queued
    Empty,
}

/// Submitted buffers waiting for the device, oldest first.
pub struct BufferQueue {
    producer: HeapProducer<AudioBuffer>,
    consumer: HeapConsumer<AudioBuffer>,
    current: Option<AudioBuffer>,
    position: usize,
}

impl BufferQueue {
    pub fn new(capacity: usize) -> Self {
        let (producer, consumer) = HeapRb::<AudioBuffer>::new(capacity).split();
        Self {
            producer,
            consumer,
            current: None,
            position: 0,
        }
    }
    /// Hands the buffer back when the queue is full.
    pub fn enqueue(&mut self, buffer: AudioBuffer) -> Result<(), AudioBuffer> {
        self.producer.push(buffer)
    }
    /// Buffers submitted and not yet drained, including the one in playback.
    pub fn queued(&self) -> usize {
        self.consumer.len() + usize::from(self.current.is_some())
    }
    pub fn read(&mut self, out: &mut [f32]) -> Read {
        if self.current.is_none() {
            self.current = self.consumer.pop();
            self.position = 0;
        }
        let Some(buffer) = self.current.as_ref() else {
            return Read::Empty;
        };
        let src = &buffer.as_slice()[self.position..];
        let n = src.len().min(out.len());
        out[..n].copy_from_slice(&src[..n]);
        self.position += n;
        let drained = self.position >= buffer.len();
        if drained {
            match self.current.take() {
                Some(buffer) => Read::Consumed(n, buffer),
                None => Read::Empty,
            }
        } else {
            Read::Partial(n)
        }
    }
    /// Takes every queued buffer out, the one in playback first.
    pub fn flush(&mut self, mut reclaim: impl FnMut(AudioBuffer)) {
        if let Some(buffer) = self.current.take() {
            reclaim(buffer);
        }
        while let Some(buffer) = self.consumer.pop() {
            reclaim(buffer);
        }
        self.position = 0;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayState {
    Stopped,
    Playing,
}

/// Fills buffers from a component and keeps the queue armed while playing.
pub struct BufferFeeder<C: Component> {
    source: C,
    info: PlaybackInfo,
    state: PlayState,
    free: Vec<AudioBuffer>,
    transport: Arc<Transport>,
    refills: u64,
    rejected: u64,
}

impl<C: Component> BufferFeeder<C> {
    pub fn new(source: C, info: PlaybackInfo, transport: Arc<Transport>) -> Self {
        let len = info.samples_per_buffer();
        let free = (0..NUMBER_OF_BUFFERS)
            .rev()
            .map(|id| AudioBuffer::new(id, len))
            .collect();
        Self {
            source,
            info,
            state: PlayState::Stopped,
            free,
            transport,
            refills: 0,
            rejected: 0,
        }
    }
    pub fn state(&self) -> PlayState {
        self.state
    }
    pub fn info(&self) -> &PlaybackInfo {
        &self.info
    }
    pub fn source(&self) -> &C {
        &self.source
    }
    /// Buffers owned by the feeder, i.e. not submitted.
    pub fn free_buffers(&self) -> usize {
        self.free.len()
    }
    /// Total number of buffer fills so far.
    pub fn refills(&self) -> u64 {
        self.refills
    }
    /// Filled buffers the queue had no room for.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Rewinds the clock and resets the source state.
    pub fn prepare_play(&mut self) {
        self.info.rewind();
        self.source.prepare_play(&self.info);
        self.transport.set_time(0);
    }

    /// Renders a whole buffer and advances the clock by its frames.
    pub fn fill(&mut self, buffer: &mut AudioBuffer) {
        self.source.render(buffer.as_mut_slice(), &self.info);
        self.info.current_time += buffer.len() / self.info.channels as usize;
        self.transport.set_time(self.info.current_time as u64);
        self.refills += 1;
    }

    /// Primes every free buffer into the queue.
    pub fn start(&mut self, queue: &mut BufferQueue) {
        if self.state == PlayState::Playing {
            return;
        }
        self.state = PlayState::Playing;
        while let Some(mut buffer) = self.free.pop() {
            self.fill(&mut buffer);
            self.submit(buffer, queue);
        }
        self.transport.set_playing(true);
    }

    /// Takes the queued buffers back, so the device reads silence from now on.
    pub fn stop(&mut self, queue: &mut BufferQueue) {
        self.state = PlayState::Stopped;
        let free = &mut self.free;
        queue.flush(|buffer| free.push(buffer));
        self.transport.set_playing(false);
    }

    pub fn on_buffer_consumed(&mut self, mut buffer: AudioBuffer, queue: &mut BufferQueue) {
        match self.state {
            PlayState::Playing => {
                self.fill(&mut buffer);
                self.submit(buffer, queue);
            }
            PlayState::Stopped => self.free.push(buffer),
        }
    }

    fn submit(&mut self, buffer: AudioBuffer, queue: &mut BufferQueue) {
        // no logging here, this runs on the device callback
        if let Err(buffer) = queue.enqueue(buffer) {
            self.rejected += 1;
            self.free.push(buffer);
        }
    }
}

/// The audio-thread side: applies transport requests and serves device reads from the queue.
pub struct QueuePlayer<C: Component> {
    feeder: BufferFeeder<C>,
    queue: BufferQueue,
    transport: Arc<Transport>,
}

impl<C: Component> QueuePlayer<C> {
    pub fn new(source: C, info: PlaybackInfo, transport: Arc<Transport>) -> Self {
        Self {
            feeder: BufferFeeder::new(source, info, Arc::clone(&transport)),
            queue: BufferQueue::new(NUMBER_OF_BUFFERS),
            transport,
        }
    }
    pub fn feeder(&self) -> &BufferFeeder<C> {
        &self.feeder
    }
    pub fn queue(&self) -> &BufferQueue {
        &self.queue
    }

    pub fn apply_request(&mut self) {
        if let Some(op) = self.transport.ready_to_trigger() {
            match op {
                PlayOp::Play => self.feeder.start(&mut self.queue),
                PlayOp::Pause => self.feeder.stop(&mut self.queue),
                PlayOp::Halt => {
                    self.feeder.stop(&mut self.queue);
                    self.feeder.prepare_play();
                }
            }
        }
    }

    /// Fills the device slice. Each drained buffer is refilled and resubmitted right away.
    pub fn process(&mut self, out: &mut [f32]) {
        self.apply_request();
        let mut written = 0;
        while written < out.len() {
            match self.queue.read(&mut out[written..]) {
                Read::Partial(n) => written += n,
                Read::Consumed(n, buffer) => {
                    written += n;
                    self.feeder.on_buffer_consumed(buffer, &mut self.queue);
                }
                Read::Empty => {
                    out[written..].fill(0.0);
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::audio::generator::noise::NoiseGenerator;
    use crate::audio::generator::pink::{DEFAULT_PINK_ROWS, PINK_MAX_RANDOM_ROWS};
    use crate::data::{NoiseParam, NoiseType};

    fn generator(t: NoiseType, volume: f32) -> NoiseGenerator {
        NoiseGenerator::new(Arc::new(NoiseParam::new(t, volume)), DEFAULT_PINK_ROWS, 7)
    }

    fn player(t: NoiseType, channels: u64) -> (QueuePlayer<NoiseGenerator>, Arc<Transport>) {
        let transport = Arc::new(Transport::new());
        let info = PlaybackInfo::new(44100, channels);
        let p = QueuePlayer::new(generator(t, 0.5), info, Arc::clone(&transport));
        (p, transport)
    }

    #[test]
    fn queue_order_and_capacity() {
        let mut q = BufferQueue::new(2);
        assert!(q.enqueue(AudioBuffer::new(0, 4)).is_ok());
        assert!(q.enqueue(AudioBuffer::new(1, 4)).is_ok());
        let rejected = q.enqueue(AudioBuffer::new(2, 4));
        assert_eq!(rejected.map_err(|b| b.id()), Err(2));
        let mut out = [0.0; 3];
        assert!(matches!(q.read(&mut out), Read::Partial(3)));
        match q.read(&mut out) {
            Read::Consumed(1, b) => assert_eq!(b.id(), 0),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(q.queued(), 1);
        let mut ids = vec![];
        q.flush(|b| ids.push(b.id()));
        assert_eq!(ids, vec![1]);
        assert!(matches!(q.read(&mut out), Read::Empty));
    }

    #[test]
    fn fill_advances_generator_by_every_slot() {
        let transport = Arc::new(Transport::new());
        let params = Arc::new(NoiseParam::new(NoiseType::Pink, 0.5));
        let source = NoiseGenerator::new(params, PINK_MAX_RANDOM_ROWS, 3);
        let mut feeder = BufferFeeder::new(source, PlaybackInfo::new(44100, 2), transport);
        let n = feeder.info().samples_per_buffer();
        let mut buffer = AudioBuffer::new(0, n);
        feeder.fill(&mut buffer);
        assert_eq!(feeder.source().pink().index(), n as u64);
        // the clock counts frames
        assert_eq!(feeder.info().current_time, n / 2);
    }

    #[test]
    fn stopped_player_is_silent() {
        let (mut p, transport) = player(NoiseType::White, 2);
        let mut out = vec![1.0f32; 1000];
        p.process(&mut out);
        assert!(out.iter().all(|s| *s == 0.0));
        assert!(!transport.is_playing());
        assert_eq!(p.feeder().refills(), 0);
    }

    #[test]
    fn start_primes_both_buffers() {
        let (mut p, transport) = player(NoiseType::Pink, 2);
        transport.request_play(PlayOp::Play);
        p.apply_request();
        assert_eq!(p.feeder().state(), PlayState::Playing);
        assert_eq!(p.queue().queued(), NUMBER_OF_BUFFERS);
        assert_eq!(p.feeder().free_buffers(), 0);
        assert_eq!(p.feeder().refills(), NUMBER_OF_BUFFERS as u64);
        let frames = p.feeder().info().frame_per_buffer;
        assert_eq!(transport.time(), frames * NUMBER_OF_BUFFERS as u64);
        assert!(transport.is_playing());
    }

    #[test]
    fn output_is_the_continuous_stream() {
        let (mut p, transport) = player(NoiseType::Pink, 2);
        let mut reference = generator(NoiseType::Pink, 0.5);
        let info = p.feeder().info().clone();
        let len = info.samples_per_buffer() * 3;
        let mut expected = vec![0.0f32; len];
        for chunk in expected.chunks_mut(info.samples_per_buffer()) {
            reference.render(chunk, &info);
        }

        transport.request_play(PlayOp::Play);
        let mut played = vec![];
        let mut block = vec![0.0f32; 1000];
        while played.len() < len {
            p.process(&mut block);
            played.extend_from_slice(&block);
        }
        assert_eq!(&played[..len], &expected[..]);
    }

    #[test]
    fn one_refill_per_consumed_buffer() {
        let (mut p, transport) = player(NoiseType::White, 1);
        transport.request_play(PlayOp::Play);
        let n = p.feeder().info().samples_per_buffer();
        let mut out = vec![0.0f32; n];
        for consumed in 1..=5u64 {
            p.process(&mut out);
            assert_eq!(p.feeder().refills(), NUMBER_OF_BUFFERS as u64 + consumed);
            assert_eq!(p.queue().queued(), NUMBER_OF_BUFFERS);
        }
        assert_eq!(p.feeder().rejected(), 0);
    }

    #[test]
    fn stop_silences_and_reclaims() {
        let (mut p, transport) = player(NoiseType::White, 2);
        transport.request_play(PlayOp::Play);
        let mut out = vec![0.0f32; 777];
        p.process(&mut out);
        assert!(out.iter().any(|s| *s != 0.0));

        transport.request_play(PlayOp::Pause);
        p.process(&mut out);
        assert!(out.iter().all(|s| *s == 0.0));
        assert_eq!(p.feeder().state(), PlayState::Stopped);
        assert_eq!(p.feeder().free_buffers(), NUMBER_OF_BUFFERS);
        assert_eq!(p.queue().queued(), 0);
        assert!(!transport.is_playing());

        // restart keeps the clock running
        let before = transport.time();
        transport.request_play(PlayOp::Play);
        p.process(&mut out);
        assert!(out.iter().any(|s| *s != 0.0));
        assert!(transport.time() > before);
    }

    #[test]
    fn halt_rewinds() {
        let (mut p, transport) = player(NoiseType::Pink, 2);
        transport.request_play(PlayOp::Play);
        let mut out = vec![0.0f32; 5000];
        p.process(&mut out);
        transport.request_play(PlayOp::Halt);
        p.process(&mut out);
        assert_eq!(transport.time(), 0);
        assert_eq!(p.feeder().info().current_time, 0);
        assert_eq!(p.feeder().source().pink().index(), 0);
    }

    #[test]
    fn none_type_fills_zero_buffers() {
        let (mut p, transport) = player(NoiseType::White, 2);
        transport.request_play(PlayOp::Play);
        p.apply_request();
        p.feeder().source().params.set_noise_type(NoiseType::None);
        let n = p.feeder().info().samples_per_buffer();
        let mut out = vec![0.0f32; n];
        // both primed buffers still hold white noise
        for _ in 0..NUMBER_OF_BUFFERS {
            p.process(&mut out);
            assert!(out.iter().any(|s| *s != 0.0));
        }
        // refilled after the switch
        p.process(&mut out);
        assert!(out.iter().all(|s| *s == 0.0));
    }
}
