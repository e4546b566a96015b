use anyhow::Context;
use noisegen::audio::generator::noise::NoiseGenerator;
use noisegen::audio::renderer::{create_renderer, Renderer};
use noisegen::cli::{Args, Parser};
use noisegen::data::{LaunchArg, NoiseParam, NoiseSettings, NoiseType, Transport};
use noisegen::utils::logger;
use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;

const VOLUME_STEP: f32 = 0.05;

fn load_settings(arg: &LaunchArg) -> anyhow::Result<NoiseSettings> {
    let base = match &arg.settings_file {
        Some(path) => {
            let s = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read settings {}", path))?;
            NoiseSettings::from_json(&s).with_context(|| format!("invalid settings {}", path))?
        }
        None => NoiseSettings::default(),
    };
    Ok(arg.apply_to(base))
}

fn toggle(renderer: &mut Renderer) {
    if renderer.is_playing() {
        renderer.pause();
    } else {
        renderer.play();
    }
}

/// Reads one command per line until `q` or end of input.
fn command_loop(renderer: &mut Renderer, params: &NoiseParam) -> anyhow::Result<()> {
    println!("commands: w(hite) p(ink) n(one) + - s(tart/stop) q(uit)");
    for line in std::io::stdin().lock().lines() {
        let line = line?;
        match line.trim() {
            "w" => params.set_noise_type(NoiseType::White),
            "p" => params.set_noise_type(NoiseType::Pink),
            "n" => params.set_noise_type(NoiseType::None),
            "+" => params.set_volume(params.volume() + VOLUME_STEP),
            "-" => params.set_volume(params.volume() - VOLUME_STEP),
            "s" => toggle(renderer),
            "q" => break,
            "" => {}
            other => log::warn!("unknown command {}", other),
        }
        log::info!(
            "{} volume {:.2} at {:.1}s",
            params.noise_type(),
            params.volume(),
            renderer.get_current_realtime()
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let arg = LaunchArg::from(Args::parse());
    logger::init(arg.log_level)?;

    let settings = load_settings(&arg)?;
    let params = settings.compile();
    log::debug!("parameters: {}", serde_json::to_string(params.as_ref())?);

    let seed = settings.seed.unwrap_or_else(rand::random);
    let generator = NoiseGenerator::new(Arc::clone(&params), settings.rows, seed);
    let transport = Arc::new(Transport::new());
    let mut renderer = create_renderer(
        generator,
        arg.sample_rate,
        arg.buffer_size,
        Arc::clone(&transport),
    )?;
    log::info!(
        "{} noise, {} rows, seed {}, {} frames per buffer",
        settings.noise_type,
        settings.rows,
        seed,
        renderer.info().frame_per_buffer
    );
    renderer.play();

    match arg.duration {
        Some(secs) => std::thread::sleep(
            Duration::try_from_secs_f32(secs.max(0.0)).unwrap_or(Duration::MAX),
        ),
        None => command_loop(&mut renderer, &params)?,
    }

    renderer.halt();
    // let the callback pick up the request before the stream goes away
    std::thread::sleep(Duration::from_millis(100));
    if let Err(e) = renderer.suspend() {
        log::warn!("failed to pause the output stream: {}", e);
    }
    Ok(())
}
