// data shared between the control thread and the audio thread.
// plain settings are loaded with serde and compiled into the atomic parameters before playback.
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::audio::generator::pink::DEFAULT_PINK_ROWS;
use crate::parameter::{FloatParameter, Parameter};
use crate::utils::atomic;

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum,
)]
pub enum NoiseType {
    /// silence
    #[default]
    None,
    White,
    Pink,
}

impl From<NoiseType> for u8 {
    fn from(t: NoiseType) -> u8 {
        match t {
            NoiseType::None => 0,
            NoiseType::White => 1,
            NoiseType::Pink => 2,
        }
    }
}

impl From<u8> for NoiseType {
    fn from(v: u8) -> Self {
        match v {
            1 => NoiseType::White,
            2 => NoiseType::Pink,
            _ => NoiseType::None,
        }
    }
}

impl std::fmt::Display for NoiseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NoiseType::None => "none",
            NoiseType::White => "white",
            NoiseType::Pink => "pink",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(into = "NoiseType")]
pub struct NoiseTypeParameter(atomic::U8);

impl NoiseTypeParameter {
    pub fn get(&self) -> NoiseType {
        NoiseType::from(self.0.load())
    }
    pub fn set(&self, t: NoiseType) {
        self.0.store(t.into())
    }
}
impl From<NoiseType> for NoiseTypeParameter {
    fn from(t: NoiseType) -> Self {
        Self(atomic::U8::new(t.into()))
    }
}
impl From<NoiseTypeParameter> for NoiseType {
    fn from(p: NoiseTypeParameter) -> Self {
        p.get()
    }
}

/// Parameters tweaked while playing. Shared via `Arc` with the audio thread.
/// Only serialized for inspection; loading goes through `NoiseSettings`.
#[derive(Serialize, Clone, Debug)]
pub struct NoiseParam {
    pub volume: FloatParameter,
    pub noise_type: NoiseTypeParameter,
}

impl NoiseParam {
    pub fn new(noise_type: NoiseType, volume: f32) -> Self {
        Self {
            volume: FloatParameter::new(volume, 0.0..=1.0, "volume"),
            noise_type: NoiseTypeParameter::from(noise_type),
        }
    }
    pub fn volume(&self) -> f32 {
        self.volume.get()
    }
    pub fn set_volume(&self, v: f32) {
        self.volume.set(v)
    }
    pub fn noise_type(&self) -> NoiseType {
        self.noise_type.get()
    }
    pub fn set_noise_type(&self, t: NoiseType) {
        self.noise_type.set(t)
    }
}

impl Default for NoiseParam {
    fn default() -> Self {
        Self::new(NoiseType::None, 0.5)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayOp {
    Play,
    Pause,
    /// pause and rewind
    Halt,
}

impl PlayOp {
    fn encode(op: Option<PlayOp>) -> u8 {
        match op {
            None => 0,
            Some(PlayOp::Play) => 1,
            Some(PlayOp::Pause) => 2,
            Some(PlayOp::Halt) => 3,
        }
    }
    fn decode(v: u8) -> Option<PlayOp> {
        match v {
            1 => Some(PlayOp::Play),
            2 => Some(PlayOp::Pause),
            3 => Some(PlayOp::Halt),
            _ => None,
        }
    }
}

/// Playback state seen from both sides.
/// The control side only posts requests; the audio thread applies them and updates `is_playing` and `time`.
#[derive(Debug)]
pub struct Transport {
    is_playing: atomic::Bool,
    /// played position in frames
    time: atomic::U64,
    request: atomic::U8,
}

impl Transport {
    pub fn new() -> Self {
        Self {
            is_playing: atomic::Bool::new(false),
            time: atomic::U64::new(0),
            request: atomic::U8::new(PlayOp::encode(None)),
        }
    }
    pub fn is_playing(&self) -> bool {
        self.is_playing.load()
    }
    pub fn set_playing(&self, v: bool) {
        self.is_playing.store(v)
    }
    pub fn time(&self) -> u64 {
        self.time.load()
    }
    pub fn set_time(&self, t: u64) {
        self.time.store(t)
    }
    /// A newer request overwrites one that has not been picked up yet.
    pub fn request_play(&self, op: PlayOp) {
        self.request.store(PlayOp::encode(Some(op)))
    }
    /// Takes the pending request, if any.
    pub fn ready_to_trigger(&self) -> Option<PlayOp> {
        PlayOp::decode(self.request.swap(PlayOp::encode(None)))
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain description of a noise source, loaded from a settings file.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct NoiseSettings {
    pub noise_type: NoiseType,
    pub volume: f32,
    pub rows: usize,
    pub seed: Option<u64>,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            noise_type: NoiseType::Pink,
            volume: 0.5,
            rows: DEFAULT_PINK_ROWS,
            seed: None,
        }
    }
}

impl NoiseSettings {
    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
    pub fn compile(&self) -> Arc<NoiseParam> {
        Arc::new(NoiseParam::new(self.noise_type, self.volume))
    }
}

/// Merged launch configuration of the binary.
#[derive(Clone, Debug)]
pub struct LaunchArg {
    pub settings_file: Option<String>,
    pub noise_type: Option<NoiseType>,
    pub volume: Option<f32>,
    pub rows: Option<usize>,
    pub seed: Option<u64>,
    pub duration: Option<f32>,
    pub sample_rate: Option<u32>,
    pub buffer_size: Option<u32>,
    pub log_level: u8,
}

impl Default for LaunchArg {
    fn default() -> Self {
        Self {
            settings_file: None,
            noise_type: None,
            volume: None,
            rows: None,
            seed: None,
            duration: None,
            sample_rate: None,
            buffer_size: None,
            log_level: 3,
        }
    }
}

impl LaunchArg {
    /// Explicit arguments win over the values in `base`.
    pub fn apply_to(&self, base: NoiseSettings) -> NoiseSettings {
        NoiseSettings {
            noise_type: self.noise_type.unwrap_or(base.noise_type),
            volume: self.volume.unwrap_or(base.volume),
            rows: self.rows.unwrap_or(base.rows),
            seed: self.seed.or(base.seed),
        }
    }
}
