//! # reelforge-crop
//!
//! Face-centred square crop geometry and circular masking.
//!
//! This crate provides:
//! - [`resolve`]: pick the square to cut from a frame, centred on the largest
//!   detected face or, without faces, on the frame itself
//! - [`circle_mask`] / [`apply_circle_mask`]: binary (or supersampled)
//!   circular alpha masks
//! - [`render_circular`]: crop, Lanczos resample and mask in one step
//! - [`FaceDetector`]: the seam detection backends implement
//!
//! ## Features
//!
//! - `rustface` - SeetaFace-based [`RustfaceDetector`]
//!
//! ## Example
//!
//! ```
//! use reelforge_crop::{resolve, CropConfig, FrameSize};
//!
//! let frame = FrameSize::new(200, 100)?;
//! let crop = resolve(frame, &[], &CropConfig::default());
//! assert_eq!((crop.cx, crop.cy, crop.side), (100.0, 50.0, 100.0));
//! # Ok::<(), reelforge_crop::Error>(())
//! ```

mod error;
pub mod detector;
pub mod geometry;
pub mod mask;
pub mod render;

#[cfg(feature = "rustface")]
mod rustface_backend;

// Re-exports
pub use detector::{to_gray, DetectorSettings, FaceDetector};
pub use error::{Error, Result};
pub use geometry::{resolve, select_face, CropConfig, CropSpec, FaceRect, FrameSize, PixelRect};
pub use mask::{apply_circle_mask, circle_mask};
pub use render::render_circular;

#[cfg(feature = "rustface")]
pub use rustface_backend::RustfaceDetector;
