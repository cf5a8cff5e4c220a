use crate::detector::{DetectorSettings, FaceDetector};
use crate::geometry::FaceRect;
use crate::{Error, Result};
use image::GrayImage;
use std::path::Path;

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// The model file is read once; every [`FaceDetector::detect`] call builds a
/// fresh detector from a clone of it, so one instance can serve many threads.
pub struct RustfaceDetector {
    model: rustface::Model,
    settings: DetectorSettings,
}

impl RustfaceDetector {
    /// Load a SeetaFace frontal model (`seeta_fd_frontal_v1.0.bin`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for unusable settings and
    /// [`Error::ModelLoad`] if the file cannot be read or parsed.
    pub fn from_model_file(path: &Path, settings: DetectorSettings) -> Result<Self> {
        settings.validate()?;
        let data = std::fs::read(path).map_err(|e| Error::model_load(path, e.to_string()))?;
        let model = rustface::read_model(std::io::Cursor::new(data))
            .map_err(|e| Error::model_load(path, e.to_string()))?;
        Ok(Self { model, settings })
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(&self, gray: &GrayImage) -> Vec<FaceRect> {
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(self.settings.min_face_size);
        detector.set_score_thresh(self.settings.score_thresh);
        detector.set_pyramid_scale_factor(self.settings.pyramid_scale_factor);
        detector.set_slide_window_step(
            self.settings.slide_window_step,
            self.settings.slide_window_step,
        );

        let (width, height) = gray.dimensions();
        let faces = detector.detect(&rustface::ImageData::new(gray.as_raw(), width, height));

        tracing::trace!("rustface found {} face(s) in {}x{}", faces.len(), width, height);

        faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceRect::new(
                    bbox.x() as f64,
                    bbox.y() as f64,
                    bbox.width() as f64,
                    bbox.height() as f64,
                )
            })
            .collect()
    }
}
