//! Batch-scoped face detector ownership.

use crate::config::DetectorConfig;
use image::DynamicImage;
use reelforge_crop::{to_gray, DetectorSettings, FaceDetector, FaceRect, RustfaceDetector};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Owns the face detector for one batch run.
///
/// The model is loaded on first use and shared by reference across workers.
/// When no model is configured, or loading fails, the handle stays
/// unavailable: a single warning is logged and every lookup returns no faces,
/// which makes the resolver fall back to a centred crop.
pub struct DetectorHandle {
    model_path: Option<PathBuf>,
    settings: DetectorSettings,
    detector: OnceLock<Option<Box<dyn FaceDetector>>>,
}

impl DetectorHandle {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            model_path: config.model_path.clone(),
            settings: config.settings(),
            detector: OnceLock::new(),
        }
    }

    /// A handle around an already constructed backend.
    pub fn with_detector(detector: Box<dyn FaceDetector>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(Some(detector));
        Self {
            model_path: None,
            settings: DetectorSettings::default(),
            detector: cell,
        }
    }

    /// A handle that never finds faces.
    pub fn unavailable() -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(None);
        Self {
            model_path: None,
            settings: DetectorSettings::default(),
            detector: cell,
        }
    }

    fn get(&self) -> Option<&dyn FaceDetector> {
        self.detector.get_or_init(|| self.load()).as_deref()
    }

    fn load(&self) -> Option<Box<dyn FaceDetector>> {
        let Some(ref path) = self.model_path else {
            tracing::warn!(
                "No face model configured ([detector] model_path); using centred crops"
            );
            return None;
        };

        match RustfaceDetector::from_model_file(path, self.settings) {
            Ok(detector) => {
                tracing::info!("Loaded face model {:?}", path);
                Some(Box::new(detector))
            }
            Err(e) => {
                tracing::warn!("Face detector unavailable, using centred crops: {}", e);
                None
            }
        }
    }

    /// Whether a detector backend is loaded (initialising it if needed).
    pub fn is_available(&self) -> bool {
        self.get().is_some()
    }

    /// Faces in `image`; empty when none are found or no detector is loaded.
    pub fn detect(&self, image: &DynamicImage) -> Vec<FaceRect> {
        match self.get() {
            Some(detector) => {
                let faces = detector.detect(&to_gray(image));
                tracing::debug!("Detected {} face(s)", faces.len());
                faces
            }
            None => Vec::new(),
        }
    }
}
