use crate::data::{LaunchArg, NoiseType};
pub use clap::Parser;

/// noisegen - white and pink noise player
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path of a json settings file. Options given on the command line override it
    #[arg(short, long)]
    settings: Option<String>,
    /// Noise type to start with
    #[arg(short = 't', long = "type", value_enum)]
    noise_type: Option<NoiseType>,
    /// Output gain (0.0 - 1.0)
    #[arg(short, long)]
    volume: Option<f32>,
    /// Number of random rows of the pink noise generator (1 - 32)
    #[arg(short, long)]
    rows: Option<usize>,
    /// Seed of the random generators. Random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Play for this many seconds instead of reading commands from stdin
    #[arg(short, long)]
    duration: Option<f32>,
    /// Sample rate requested from the device
    #[arg(long)]
    sample_rate: Option<u32>,
    /// Device buffer size in frames
    #[arg(long)]
    buffer_size: Option<u32>,
    /// log infomation level (1:trace 2:debug 3:info 4:warn 5:error 6:none)
    #[arg(short, long, default_value_t = 3)]
    log_level: u8,
}

impl From<Args> for LaunchArg {
    fn from(val: Args) -> Self {
        LaunchArg {
            settings_file: val.settings,
            noise_type: val.noise_type,
            volume: val.volume,
            rows: val.rows,
            seed: val.seed,
            duration: val.duration,
            sample_rate: val.sample_rate,
            buffer_size: val.buffer_size,
            log_level: val.log_level,
        }
    }
}
