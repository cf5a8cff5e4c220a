use clap::{Parser, Subcommand};
use reelforge_av::actions::{AudioFormat, Corner, GifQuality};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reelforge")]
#[command(
    author,
    version,
    about = "Batch image and video tooling: circular face crops, watermarks, audio and GIFs"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Files processed in parallel (0 = all cores)
    #[arg(short, long, global = true)]
    pub jobs: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the `[circular]` and `[detector]` config sections.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct CropArgs {
    /// Output edge length in pixels
    #[arg(short, long)]
    pub size: Option<u32>,

    /// Crop side as a multiple of the detected face size
    #[arg(long)]
    pub radius_scale: Option<f64>,

    /// Mask samples per pixel edge (1 = hard edge)
    #[arg(long)]
    pub supersample: Option<u32>,

    /// SeetaFace model file for face detection
    #[arg(long)]
    pub model: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Crop images into face-centred circular PNGs
    Circular {
        /// Image file or directory (searched recursively)
        #[arg(required = true)]
        input: PathBuf,

        /// Output directory (default: `circular/` next to each image)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        crop: CropArgs,
    },

    /// Crop videos into face-centred circular MOVs with transparency
    CircularVideo {
        /// Video file or directory
        #[arg(required = true)]
        input: PathBuf,

        /// Output directory (default: `output/` in the input directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        crop: CropArgs,
    },

    /// Overlay a logo onto videos and images
    Watermark {
        /// Video/image file or directory
        #[arg(required = true)]
        input: PathBuf,

        /// Logo image (PNG with transparency recommended)
        #[arg(short, long)]
        logo: Option<PathBuf>,

        /// Output directory (default: `with_logo/` next to each input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Corner to place the logo in
        #[arg(short, long)]
        position: Option<Corner>,

        /// Distance from the edges in pixels
        #[arg(short, long)]
        margin: Option<u32>,

        /// Logo width as a fraction of the input width
        #[arg(long)]
        scale: Option<f64>,
    },

    /// Extract the audio track of videos
    ExtractAudio {
        /// Video file or directory
        #[arg(required = true)]
        input: PathBuf,

        /// Output directory, or the output file for a single video
        /// (default: alongside each video)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Audio format
        #[arg(short, long)]
        format: Option<AudioFormat>,

        /// Bitrate for lossy formats, e.g. 192k
        #[arg(short, long)]
        quality: Option<String>,
    },

    /// Convert videos to looping GIFs
    Gif {
        /// Video file or directory
        #[arg(required = true)]
        input: PathBuf,

        /// Output directory, or the output file for a single video
        /// (default: alongside each video)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Frames per second
        #[arg(long)]
        fps: Option<u32>,

        /// Output width in pixels (default: source width)
        #[arg(short, long)]
        width: Option<u32>,

        /// Palette quality
        #[arg(short, long)]
        quality: Option<GifQuality>,

        /// Start time, e.g. 5 or 00:00:05 (single files only)
        #[arg(short, long)]
        start: Option<String>,

        /// Clip duration in seconds (single files only)
        #[arg(short, long)]
        duration: Option<String>,
    },

    /// Show the crop that would be taken from an image
    CropInfo {
        /// Image file
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        crop: CropArgs,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
