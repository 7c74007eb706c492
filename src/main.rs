use futures::StreamExt;
use pixgen::{
    logger, BatchSize, GenerationOptions, ImageStudio, Quality, Resolution, SessionState,
    Style, StudioConfig,
};
use std::env;

fn option_from_env(name: &str, position: usize) -> Option<String> {
    env::var(name)
        .ok()
        .or_else(|| env::args().nth(position))
        .filter(|value| !value.trim().is_empty())
}

fn options_from_env() -> Result<GenerationOptions, Box<dyn std::error::Error>> {
    let prompt = option_from_env("PIXGEN_PROMPT", 1).unwrap_or_default();
    let mut options = GenerationOptions::new(prompt);

    if let Some(style) = option_from_env("PIXGEN_STYLE", 2) {
        options = options.with_style(style.parse::<Style>()?);
    }
    if let Some(resolution) = option_from_env("PIXGEN_RESOLUTION", 3) {
        options = options.with_resolution(resolution.parse::<Resolution>()?);
    }
    if let Some(quality) = option_from_env("PIXGEN_QUALITY", 4) {
        options = options.with_quality(quality.parse::<Quality>()?);
    }
    if let Some(count) = option_from_env("PIXGEN_COUNT", 5) {
        options = options.with_count(count.parse::<BatchSize>()?);
    }

    Ok(options)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(logger::LoggerConfig::development())?;
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    if env_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = StudioConfig::from_env();
    logger::log_config_info(&config);

    let options = options_from_env()?;
    let studio = ImageStudio::new(config)?;

    log::info!(
        "🖌️  Style: {} | Resolution: {} | Quality: {} | Count: {}",
        options.style.preset().label,
        options.resolution,
        options.quality.preset().label,
        options.count.count()
    );

    studio.generate(&options).await;

    let images = match studio.session().state() {
        SessionState::Succeeded(images) => images,
        SessionState::Failed(reason) => {
            log::error!("❌ Generation failed: {}", reason);
            return Err(reason.into());
        }
        other => {
            log::warn!("Unexpected session state: {:?}", other);
            return Ok(());
        }
    };

    for image in &images {
        println!("{}", image.address);
    }

    let wants_download = env::var("PIXGEN_DOWNLOAD").map_or(false, |val| val == "true");
    if !wants_download {
        return Ok(());
    }

    let mut reports = studio
        .downloads()
        .reports()
        .ok_or("download reports already taken")?;
    for image in &images {
        studio.downloads().spawn(image.clone())?;
    }

    let mut failures = 0;
    for _ in 0..images.len() {
        let Some(report) = reports.next().await else {
            break;
        };
        match &report.outcome {
            Ok(path) => log::info!("✅ {} saved to {}", report.file_name, path.display()),
            Err(e) => {
                failures += 1;
                log::error!("❌ {} failed: {}", report.file_name, e);
            }
        }
    }

    if failures > 0 {
        log::warn!("⚠️  {} of {} downloads failed", failures, images.len());
    }

    Ok(())
}
