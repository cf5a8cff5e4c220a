//! Face detection seam.
//!
//! The resolver only needs rectangles; any backend that can turn a grayscale
//! frame into [`FaceRect`]s plugs in through [`FaceDetector`].

use crate::geometry::FaceRect;
use crate::{Error, Result};
use image::{DynamicImage, GrayImage};

/// Pluggable face detection backend.
pub trait FaceDetector: Send + Sync {
    /// Detect faces in a grayscale frame. An empty result means "no face".
    fn detect(&self, gray: &GrayImage) -> Vec<FaceRect>;
}

/// Tuning knobs shared by the sliding-window detectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorSettings {
    /// Smallest face edge, in pixels, worth reporting.
    pub min_face_size: u32,
    /// Minimum classifier score.
    pub score_thresh: f64,
    /// Scale step between pyramid levels (0 < f < 1).
    pub pyramid_scale_factor: f32,
    /// Sliding window stride in pixels.
    pub slide_window_step: u32,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            min_face_size: 30,
            score_thresh: 2.0,
            pyramid_scale_factor: 0.8,
            slide_window_step: 4,
        }
    }
}

impl DetectorSettings {
    /// Smallest `min_face_size` the sliding-window classifier supports.
    pub const MIN_FACE_SIZE_FLOOR: u32 = 20;

    /// Reject settings the detection backends cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.min_face_size < Self::MIN_FACE_SIZE_FLOOR {
            return Err(Error::invalid_config(format!(
                "min_face_size must be at least {}, got {}",
                Self::MIN_FACE_SIZE_FLOOR,
                self.min_face_size
            )));
        }
        if !(self.score_thresh.is_finite() && self.score_thresh >= 0.0) {
            return Err(Error::invalid_config(format!(
                "score_thresh must be non-negative, got {}",
                self.score_thresh
            )));
        }
        if !(0.01..=0.99).contains(&self.pyramid_scale_factor) {
            return Err(Error::invalid_config(format!(
                "pyramid_scale_factor must be within 0.01..=0.99, got {}",
                self.pyramid_scale_factor
            )));
        }
        if self.slide_window_step == 0 {
            return Err(Error::invalid_config("slide_window_step must be positive"));
        }
        Ok(())
    }
}

/// Grayscale copy of a frame for detection.
pub fn to_gray(image: &DynamicImage) -> GrayImage {
    image.to_luma8()
}
