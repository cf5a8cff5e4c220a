//! ffmpeg-driven media actions.
//!
//! Each action writes exactly one output file. Actions that need scratch
//! files take a [`Workspace`](crate::Workspace) so intermediates are cleaned
//! up with it.

pub mod audio;
pub mod frames;
pub mod gif;
pub mod watermark;

pub use audio::{extract_audio, AudioFormat};
pub use frames::{encode_png_sequence, extract_cropped_frames, extract_first_frame, list_frames};
pub use gif::{video_to_gif, GifOptions, GifQuality};
pub use watermark::{apply_watermark, overlay_filter, Corner, WatermarkOptions};
