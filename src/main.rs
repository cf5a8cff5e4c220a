mod cli;

use reelforge::{
    batch::{self, BatchReport},
    config::{self, Config},
    detector::DetectorHandle,
    jobs,
};
use reelforge_av::actions::{GifOptions, WatermarkOptions};
use reelforge_common::{Discovery, MediaKind};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, CropArgs};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "reelforge=trace,reelforge_av=debug,reelforge_crop=debug,reelforge_common=debug"
                .to_string()
        } else {
            "reelforge=info,reelforge_av=info,reelforge_crop=info,reelforge_common=info"
                .to_string()
        }
    });

    // Logs go to stderr so stdout stays clean for `--json` output.
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Circular {
            input,
            output,
            crop,
        } => {
            let config = load(config_path, cli.jobs, &crop)?;
            circular(&config, &input, output.as_deref())
        }
        Commands::CircularVideo {
            input,
            output,
            crop,
        } => {
            let config = load(config_path, cli.jobs, &crop)?;
            circular_video(&config, &input, output.as_deref())
        }
        Commands::Watermark {
            input,
            logo,
            output,
            position,
            margin,
            scale,
        } => {
            let mut config = load(config_path, cli.jobs, &CropArgs::default())?;
            if let Some(logo) = logo {
                config.watermark.logo = Some(logo);
            }
            if let Some(position) = position {
                config.watermark.position = position;
            }
            if let Some(margin) = margin {
                config.watermark.margin = margin;
            }
            if let Some(scale) = scale {
                config.watermark.scale = scale;
            }
            config::validate_config(&config)?;
            watermark(&config, &input, output.as_deref())
        }
        Commands::ExtractAudio {
            input,
            output,
            format,
            quality,
        } => {
            let mut config = load(config_path, cli.jobs, &CropArgs::default())?;
            if let Some(format) = format {
                config.audio.format = format;
            }
            if let Some(quality) = quality {
                config.audio.bitrate = quality;
            }
            config::validate_config(&config)?;
            extract_audio(&config, &input, output.as_deref())
        }
        Commands::Gif {
            input,
            output,
            fps,
            width,
            quality,
            start,
            duration,
        } => {
            let mut config = load(config_path, cli.jobs, &CropArgs::default())?;
            if let Some(fps) = fps {
                config.gif.fps = fps;
            }
            if width.is_some() {
                config.gif.width = width;
            }
            if let Some(quality) = quality {
                config.gif.quality = quality;
            }
            config::validate_config(&config)?;
            gif(&config, &input, output.as_deref(), start, duration)
        }
        Commands::CropInfo { file, json, crop } => {
            let config = load(config_path, cli.jobs, &crop)?;
            crop_info(&config, &file, json)
        }
        Commands::CheckTools => check_tools(config_path),
        Commands::Validate {
            config: validate_path,
        } => {
            let path = validate_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("reelforge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Load config and apply the global and crop-related CLI overrides.
fn load(config_path: Option<&Path>, jobs: Option<usize>, crop: &CropArgs) -> Result<Config> {
    let mut config = config::load_config_or_default(config_path)?;

    if let Some(jobs) = jobs {
        config.batch.jobs = jobs;
    }
    if let Some(size) = crop.size {
        config.circular.size = size;
    }
    if let Some(radius_scale) = crop.radius_scale {
        config.circular.radius_scale = radius_scale;
    }
    if let Some(supersample) = crop.supersample {
        config.circular.supersample = supersample;
    }
    if let Some(ref model) = crop.model {
        config.detector.model_path = Some(model.clone());
    }

    config::validate_config(&config)?;
    Ok(config)
}

fn discover(discovery: Discovery, input: &Path) -> Result<Vec<PathBuf>> {
    discovery
        .run(input)
        .with_context(|| format!("Cannot read input {:?}", input))
}

/// Print the summary and turn any failed file into a non-zero exit.
fn finish(report: BatchReport) -> Result<()> {
    println!("\n{}", report.summary());
    for (file, error) in &report.failures {
        println!("  ✗ {}: {}", file.display(), error);
    }

    if report.is_success() {
        Ok(())
    } else {
        anyhow::bail!("{} of {} file(s) failed", report.failures.len(), report.total)
    }
}

fn circular(config: &Config, input: &Path, output_dir: Option<&Path>) -> Result<()> {
    let crop = config::crop_config(&config.circular)?;
    let files = discover(
        Discovery::new(&[MediaKind::Image])
            .recursive(true)
            .skip_marker(jobs::circular_image::OUTPUT_DIR),
        input,
    )?;
    if files.is_empty() {
        println!("No images found in {}", input.display());
        return Ok(());
    }

    println!("Found {} image(s) to process", files.len());
    let detector = DetectorHandle::new(&config.detector);

    let report = batch::run_batch(
        &files,
        config.batch.jobs,
        MediaKind::Image.plural(),
        |file| jobs::circular_image::plan_output(file, output_dir),
        |file, output| jobs::circular_image::process(file, output, &crop, &detector),
    )?;
    finish(report)
}

fn circular_video(config: &Config, input: &Path, output_dir: Option<&Path>) -> Result<()> {
    let crop = config::crop_config(&config.circular)?;
    let mut files = discover(Discovery::new(&[MediaKind::Video]), input)?;
    if input.is_dir() {
        files.retain(|f| jobs::circular_video::is_candidate(f));
    }
    if files.is_empty() {
        println!("No videos found in {}", input.display());
        return Ok(());
    }

    let tools = jobs::toolchain(config)?;
    println!("Found {} video(s) to process", files.len());
    let detector = DetectorHandle::new(&config.detector);

    let report = batch::run_batch(
        &files,
        config.batch.jobs,
        MediaKind::Video.plural(),
        |file| jobs::circular_video::plan_output(input, file, output_dir),
        |file, output| jobs::circular_video::process(&tools, file, output, &crop, &detector),
    )?;
    finish(report)
}

fn watermark(config: &Config, input: &Path, output_dir: Option<&Path>) -> Result<()> {
    let logo = config
        .watermark
        .logo
        .clone()
        .context("No logo given: pass --logo or set [watermark] logo")?;
    if !logo.is_file() {
        anyhow::bail!("Logo file not found: {:?}", logo);
    }

    let mut files = discover(
        Discovery::new(&[MediaKind::Video, MediaKind::Image]),
        input,
    )?;
    let logo_canonical = logo.canonicalize().ok();
    files.retain(|f| f.canonicalize().ok() != logo_canonical);
    if files.is_empty() {
        println!("No videos or images found in {}", input.display());
        return Ok(());
    }

    let tools = jobs::toolchain(config)?;
    let opts = WatermarkOptions {
        corner: config.watermark.position,
        margin: config.watermark.margin,
        scale: config.watermark.scale,
    };
    println!(
        "Adding logo to {} file(s) ({}, margin {}px, scale {})",
        files.len(),
        opts.corner,
        opts.margin,
        opts.scale
    );

    let report = batch::run_batch(
        &files,
        config.batch.jobs,
        "files",
        |file| jobs::watermark::plan_output(file, output_dir),
        |file, output| jobs::watermark::process(&tools, file, &logo, output, &opts),
    )?;
    finish(report)
}

fn extract_audio(config: &Config, input: &Path, output: Option<&Path>) -> Result<()> {
    let files = discover(Discovery::new(&[MediaKind::Video]), input)?;
    if files.is_empty() {
        println!("No videos found in {}", input.display());
        return Ok(());
    }

    let tools = jobs::toolchain(config)?;
    let format = config.audio.format;
    let bitrate = config.audio.bitrate.as_str();
    println!(
        "Extracting {} audio from {} video(s)",
        format,
        files.len()
    );

    let single_file = input.is_file();
    let report = batch::run_batch(
        &files,
        config.batch.jobs,
        MediaKind::Video.plural(),
        |file| jobs::audio::plan_output(file, output, single_file, format),
        |file, output| jobs::audio::process(&tools, file, output, format, bitrate),
    )?;
    finish(report)
}

fn gif(
    config: &Config,
    input: &Path,
    output: Option<&Path>,
    start: Option<String>,
    duration: Option<String>,
) -> Result<()> {
    let (start, duration) = if input.is_dir() && (start.is_some() || duration.is_some()) {
        tracing::warn!("--start and --duration only apply to single files; ignoring them");
        (None, None)
    } else {
        (start, duration)
    };

    let files = discover(Discovery::new(&[MediaKind::Video]), input)?;
    if files.is_empty() {
        println!("No videos found in {}", input.display());
        return Ok(());
    }

    let tools = jobs::toolchain(config)?;
    let opts = GifOptions {
        fps: config.gif.fps,
        width: config.gif.width,
        quality: config.gif.quality,
        start,
        duration,
    };
    println!(
        "Converting {} video(s) to GIF ({} fps, {} quality)",
        files.len(),
        opts.fps,
        opts.quality
    );

    let single_file = input.is_file();
    let report = batch::run_batch(
        &files,
        config.batch.jobs,
        MediaKind::Video.plural(),
        |file| jobs::gif::plan_output(file, output, single_file),
        |file, output| jobs::gif::process(&tools, file, output, &opts),
    )?;
    finish(report)
}

fn crop_info(config: &Config, file: &Path, json: bool) -> Result<()> {
    if !file.is_file() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let crop = config::crop_config(&config.circular)?;
    let detector = DetectorHandle::new(&config.detector);
    let report = jobs::circular_image::inspect(file, &crop, &detector)?;

    if json {
        let json_str = serde_json::to_string_pretty(&report)?;
        println!("{}", json_str);
    } else {
        println!("File: {}", report.file.display());
        println!("Frame: {}x{}", report.frame.width, report.frame.height);
        println!(
            "Detector: {}",
            if report.detector_available {
                "available"
            } else {
                "unavailable (centred fallback)"
            }
        );
        println!("Faces: {}", report.faces.len());
        for (i, face) in report.faces.iter().enumerate() {
            println!(
                "  [{}] x={} y={} w={} h={}",
                i, face.x, face.y, face.width, face.height
            );
        }
        if let Some(face) = report.selected {
            println!(
                "Selected: x={} y={} w={} h={}",
                face.x, face.y, face.width, face.height
            );
        }
        println!(
            "Crop: centre ({:.1}, {:.1}), side {:.1}",
            report.crop.cx, report.crop.cy, report.crop.side
        );
        println!(
            "Pixels: {}x{} at ({}, {}) -> {}x{}",
            report.pixel_rect.side,
            report.pixel_rect.side,
            report.pixel_rect.x,
            report.pixel_rect.y,
            report.target_size,
            report.target_size
        );
    }

    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    println!("Checking external tools...\n");

    let config = config::load_config_or_default(config_path)?;
    let tools = reelforge_av::check_tools(
        config.tools.ffmpeg_path.as_deref(),
        config.tools.ffprobe_path.as_deref(),
    );
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Video commands need ffmpeg and ffprobe.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!(
        "  Circular: {}px, radius scale {}, vertical bias {}, supersample {}",
        config.circular.size,
        config.circular.radius_scale,
        config.circular.vertical_bias,
        config.circular.supersample
    );
    match config.detector.model_path {
        Some(ref model) => println!("  Face model: {}", model.display()),
        None => println!("  Face model: none (centred crops)"),
    }
    println!(
        "  Watermark: {}, margin {}px, scale {}",
        config.watermark.position, config.watermark.margin, config.watermark.scale
    );
    println!(
        "  Audio: {} @ {}",
        config.audio.format, config.audio.bitrate
    );
    println!(
        "  GIF: {} fps, {} quality",
        config.gif.fps, config.gif.quality
    );
    println!(
        "  Jobs: {}",
        batch::thread_count(config.batch.jobs)
    );

    Ok(())
}
