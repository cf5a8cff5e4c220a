//! Crop geometry resolution.
//!
//! Given the size of a frame and the faces detected in it, [`resolve`] picks
//! the square region to cut out before the square is scaled and masked into a
//! circle. The computation is pure: the same inputs always give the same
//! [`CropSpec`], and nothing here can fail once a [`FrameSize`] exists.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Default output edge length in pixels.
pub const DEFAULT_TARGET_SIZE: u32 = 500;

/// Default multiplier applied to the larger face dimension.
pub const DEFAULT_RADIUS_SCALE: f64 = 2.5;

/// Default upward shift of the crop centre, as a fraction of face height.
///
/// Detector boxes stop at the eyebrows; shifting up keeps hair and forehead.
pub const DEFAULT_VERTICAL_BIAS: f64 = 0.1;

/// Width and height of a decoded frame. Both are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    width: u32,
    height: u32,
}

impl FrameSize {
    /// Create a frame size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroDimensions`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::ZeroDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Edge of the largest square that fits in the frame.
    pub fn min_side(&self) -> u32 {
        self.width.min(self.height)
    }
}

/// Axis-aligned face bounding box in frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FaceRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Intersect with the frame. Returns `None` when nothing of the
    /// rectangle lies inside the frame or its coordinates are not finite.
    pub fn clipped_to(&self, frame: FrameSize) -> Option<FaceRect> {
        let finite = [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }

        let left = self.x.max(0.0);
        let top = self.y.max(0.0);
        let right = (self.x + self.width).min(frame.width() as f64);
        let bottom = (self.y + self.height).min(frame.height() as f64);

        if right <= left || bottom <= top {
            return None;
        }

        Some(FaceRect::new(left, top, right - left, bottom - top))
    }
}

/// Square crop region: centre `(cx, cy)` and edge `side`, all in frame
/// coordinates. Always lies entirely inside the frame it was resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropSpec {
    pub cx: f64,
    pub cy: f64,
    pub side: f64,
}

/// Integer crop rectangle ready for pixel extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub side: u32,
}

impl CropSpec {
    pub fn left(&self) -> f64 {
        self.cx - self.side / 2.0
    }

    pub fn top(&self) -> f64 {
        self.cy - self.side / 2.0
    }

    /// Whether the point lies inside the square (edges included).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let half = self.side / 2.0;
        (self.cx - half..=self.cx + half).contains(&x)
            && (self.cy - half..=self.cy + half).contains(&y)
    }

    /// Round to whole pixels, keeping the square inside `frame`.
    pub fn pixel_rect(&self, frame: FrameSize) -> PixelRect {
        let side = (self.side.floor() as u32).clamp(1, frame.min_side());
        let x = (self.left().round().max(0.0) as u32).min(frame.width() - side);
        let y = (self.top().round().max(0.0) as u32).min(frame.height() - side);
        PixelRect { x, y, side }
    }
}

/// Parameters of one crop run. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropConfig {
    target_size: u32,
    radius_scale: f64,
    vertical_bias: f64,
    supersample: u32,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            radius_scale: DEFAULT_RADIUS_SCALE,
            vertical_bias: DEFAULT_VERTICAL_BIAS,
            supersample: 1,
        }
    }
}

impl CropConfig {
    /// Create a config with the default vertical bias and a binary mask.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `target_size` is zero or
    /// `radius_scale` is not a positive finite number.
    pub fn new(target_size: u32, radius_scale: f64) -> Result<Self> {
        if target_size == 0 {
            return Err(Error::invalid_config("target size must be > 0"));
        }
        if !(radius_scale.is_finite() && radius_scale > 0.0) {
            return Err(Error::invalid_config(format!(
                "radius scale must be > 0, got {radius_scale}"
            )));
        }
        Ok(Self {
            target_size,
            radius_scale,
            ..Self::default()
        })
    }

    /// Set the upward centre shift as a fraction of face height.
    pub fn with_vertical_bias(mut self, bias: f64) -> Result<Self> {
        if !(bias.is_finite() && bias >= 0.0) {
            return Err(Error::invalid_config(format!(
                "vertical bias must be >= 0, got {bias}"
            )));
        }
        self.vertical_bias = bias;
        Ok(self)
    }

    /// Set the mask supersampling factor (1 = binary edge).
    pub fn with_supersample(mut self, factor: u32) -> Result<Self> {
        if factor == 0 || factor > 8 {
            return Err(Error::invalid_config(format!(
                "supersample must be between 1 and 8, got {factor}"
            )));
        }
        self.supersample = factor;
        Ok(self)
    }

    pub fn target_size(&self) -> u32 {
        self.target_size
    }

    pub fn radius_scale(&self) -> f64 {
        self.radius_scale
    }

    pub fn vertical_bias(&self) -> f64 {
        self.vertical_bias
    }

    pub fn supersample(&self) -> u32 {
        self.supersample
    }
}

/// `true` if `a` should win over `b`: larger area, then topmost, then leftmost.
fn prefer(a: &FaceRect, b: &FaceRect) -> bool {
    match a.area().total_cmp(&b.area()) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => match a.y.total_cmp(&b.y) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => a.x < b.x,
        },
    }
}

/// Pick the face the crop centres on, after clipping every candidate to the
/// frame. Order of `faces` does not matter.
pub fn select_face(frame: FrameSize, faces: &[FaceRect]) -> Option<FaceRect> {
    faces
        .iter()
        .filter_map(|face| face.clipped_to(frame))
        .reduce(|best, face| if prefer(&face, &best) { face } else { best })
}

/// Resolve the square crop for a frame.
///
/// With faces, the crop is sized `max(w, h) * radius_scale` (capped to the
/// frame) and centred on the selected face, shifted up by `vertical_bias * h`.
/// The shift never exceeds half the side, so the face centre stays inside the
/// square. Without faces it is the largest centred square. The result is then
/// clamped into the frame.
///
/// # Example
///
/// ```
/// use reelforge_crop::{resolve, CropConfig, FaceRect, FrameSize};
///
/// let frame = FrameSize::new(1000, 1000)?;
/// let face = FaceRect::new(400.0, 300.0, 100.0, 120.0);
/// let crop = resolve(frame, &[face], &CropConfig::default());
/// assert_eq!((crop.cx, crop.cy, crop.side), (450.0, 348.0, 300.0));
/// # Ok::<(), reelforge_crop::Error>(())
/// ```
pub fn resolve(frame: FrameSize, faces: &[FaceRect], config: &CropConfig) -> CropSpec {
    let width = frame.width() as f64;
    let height = frame.height() as f64;

    let (cx, cy, side) = match select_face(frame, faces) {
        Some(face) => {
            let (fcx, fcy) = face.center();
            let side = (face.width.max(face.height) * config.radius_scale())
                .min(frame.min_side() as f64);
            let shift = (config.vertical_bias() * face.height).min(side / 2.0);
            (fcx, fcy - shift, side)
        }
        None => {
            tracing::trace!("no usable face among {}, centring crop", faces.len());
            (width / 2.0, height / 2.0, width.min(height))
        }
    };

    clamp_square(frame, cx, cy, side)
}

fn clamp_square(frame: FrameSize, cx: f64, cy: f64, side: f64) -> CropSpec {
    let width = frame.width() as f64;
    let height = frame.height() as f64;

    let side = side.min(width).min(height);
    let half = side / 2.0;

    CropSpec {
        cx: cx.clamp(half, width - half),
        cy: cy.clamp(half, height - half),
        side,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(w: u32, h: u32) -> FrameSize {
        FrameSize::new(w, h).unwrap()
    }

    fn assert_in_bounds(crop: &CropSpec, frame: FrameSize) {
        let w = frame.width() as f64;
        let h = frame.height() as f64;
        let half = crop.side / 2.0;
        assert!(crop.side <= w.min(h), "side {} exceeds frame", crop.side);
        assert!(crop.cx - half >= 0.0, "{crop:?}");
        assert!(crop.cx + half <= w, "{crop:?}");
        assert!(crop.cy - half >= 0.0, "{crop:?}");
        assert!(crop.cy + half <= h, "{crop:?}");
    }

    /// Small deterministic generator so the property loops are reproducible.
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self) -> u32 {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (self.0 >> 33) as u32
        }

        fn below(&mut self, n: u32) -> u32 {
            self.next() % n
        }
    }

    #[test]
    fn test_zero_dimension_frame_rejected() {
        assert!(matches!(
            FrameSize::new(0, 10),
            Err(Error::ZeroDimensions { width: 0, height: 10 })
        ));
        assert!(FrameSize::new(10, 0).is_err());
    }

    #[test]
    fn test_config_validation() {
        assert!(CropConfig::new(0, 2.5).is_err());
        assert!(CropConfig::new(500, 0.0).is_err());
        assert!(CropConfig::new(500, -1.0).is_err());
        assert!(CropConfig::new(500, f64::NAN).is_err());
        assert!(CropConfig::default().with_vertical_bias(-0.1).is_err());
        assert!(CropConfig::default().with_supersample(0).is_err());

        let config = CropConfig::new(256, 3.0).unwrap();
        assert_eq!(config.target_size(), 256);
        assert_eq!(config.radius_scale(), 3.0);
        assert_eq!(config.vertical_bias(), DEFAULT_VERTICAL_BIAS);
        assert_eq!(config.supersample(), 1);
    }

    #[test]
    fn test_face_scenario() {
        let crop = resolve(
            frame(1000, 1000),
            &[FaceRect::new(400.0, 300.0, 100.0, 120.0)],
            &CropConfig::default(),
        );
        assert_eq!(crop.side, 300.0);
        assert_eq!(crop.cx, 450.0);
        assert_eq!(crop.cy, 348.0);
    }

    #[test]
    fn test_no_faces_wide_frame() {
        let crop = resolve(frame(200, 100), &[], &CropConfig::default());
        assert_eq!(crop.side, 100.0);
        assert_eq!(crop.cx, 100.0);
        assert_eq!(crop.cy, 50.0);
    }

    #[test]
    fn test_no_faces_is_centred_for_any_frame() {
        let mut rng = Lcg(7);
        for _ in 0..500 {
            let f = frame(rng.below(4000) + 1, rng.below(4000) + 1);
            let crop = resolve(f, &[], &CropConfig::default());
            assert_eq!(crop.side, f.min_side() as f64);
            assert_eq!(crop.cx, f.width() as f64 / 2.0);
            assert_eq!(crop.cy, f.height() as f64 / 2.0);
        }
    }

    #[test]
    fn test_larger_face_wins() {
        let small = FaceRect::new(10.0, 10.0, 20.0, 20.0);
        let large = FaceRect::new(50.0, 50.0, 50.0, 50.0);
        let f = frame(1000, 1000);

        assert_eq!(select_face(f, &[small, large]), Some(large));
        assert_eq!(select_face(f, &[large, small]), Some(large));
    }

    #[test]
    fn test_equal_area_prefers_topmost() {
        let lower = FaceRect::new(100.0, 400.0, 60.0, 60.0);
        let upper = FaceRect::new(600.0, 100.0, 60.0, 60.0);
        let f = frame(1000, 1000);

        assert_eq!(select_face(f, &[lower, upper]), Some(upper));
        assert_eq!(select_face(f, &[upper, lower]), Some(upper));
    }

    #[test]
    fn test_full_tie_prefers_leftmost() {
        let right = FaceRect::new(500.0, 100.0, 60.0, 60.0);
        let left = FaceRect::new(100.0, 100.0, 60.0, 60.0);
        assert_eq!(select_face(frame(1000, 1000), &[right, left]), Some(left));
    }

    #[test]
    fn test_face_outside_frame_is_ignored() {
        let outside = FaceRect::new(2000.0, 2000.0, 100.0, 100.0);
        let crop = resolve(frame(640, 480), &[outside], &CropConfig::default());
        assert_eq!(crop, resolve(frame(640, 480), &[], &CropConfig::default()));
    }

    #[test]
    fn test_face_partially_outside_is_clipped() {
        let f = frame(640, 480);
        let edge = FaceRect::new(-20.0, -10.0, 100.0, 100.0);
        let clipped = edge.clipped_to(f).unwrap();
        assert_eq!(clipped, FaceRect::new(0.0, 0.0, 80.0, 90.0));
        assert!(FaceRect::new(10.0, 10.0, f64::NAN, 5.0).clipped_to(f).is_none());
    }

    #[test]
    fn test_oversized_crop_degrades_to_inscribed_square() {
        let f = frame(300, 200);
        let face = FaceRect::new(100.0, 50.0, 100.0, 100.0);
        let crop = resolve(f, &[face], &CropConfig::default());
        assert_eq!(crop.side, 200.0);
        assert_eq!(crop.cy, 100.0);
        assert_in_bounds(&crop, f);
    }

    #[test]
    fn test_tall_face_in_narrow_frame_keeps_centre() {
        let f = frame(74, 1000);
        let face = FaceRect::new(28.0, 441.0, 43.0, 426.0);
        let crop = resolve(f, &[face], &CropConfig::default());

        assert_eq!(crop.side, 74.0);
        assert_eq!(crop.cx, 37.0);
        assert_eq!(crop.cy, 617.0);
        let (fcx, fcy) = face.center();
        assert!(crop.contains(fcx, fcy), "{face:?} not in {crop:?}");
        assert_in_bounds(&crop, f);
    }

    #[test]
    fn test_large_bias_is_capped_at_half_side() {
        let f = frame(1000, 1000);
        let face = FaceRect::new(450.0, 450.0, 100.0, 100.0);
        let config = CropConfig::default().with_vertical_bias(5.0).unwrap();
        let crop = resolve(f, &[face], &config);

        assert_eq!(crop.side, 250.0);
        assert_eq!(crop.cy, 375.0);
        assert!(crop.contains(500.0, 500.0));
    }

    #[test]
    fn test_face_at_corner_is_clamped() {
        let f = frame(800, 600);
        let face = FaceRect::new(0.0, 0.0, 60.0, 80.0);
        let crop = resolve(f, &[face], &CropConfig::default());
        assert_eq!(crop.side, 200.0);
        assert_eq!(crop.cx, 100.0);
        assert_eq!(crop.cy, 100.0);
        assert!(crop.contains(30.0, 40.0));
    }

    #[test]
    fn test_single_face_properties() {
        let mut rng = Lcg(42);
        let config = CropConfig::default();
        for _ in 0..2000 {
            let f = frame(rng.below(3000) + 40, rng.below(3000) + 40);
            let w = (rng.below(f.width() - 1) + 1) as f64;
            let h = (rng.below(f.height() - 1) + 1) as f64;
            let x = rng.below(f.width() - w as u32 + 1) as f64;
            let y = rng.below(f.height() - h as u32 + 1) as f64;
            let face = FaceRect::new(x, y, w, h);

            let crop = resolve(f, &[face], &config);
            assert_in_bounds(&crop, f);

            let (fcx, fcy) = face.center();
            assert!(crop.contains(fcx, fcy), "{face:?} not in {crop:?}");

            let wanted = w.max(h) * config.radius_scale();
            if wanted <= f.min_side() as f64 {
                assert!(crop.side >= wanted * 0.9);
            } else {
                assert_eq!(crop.side, f.min_side() as f64);
            }
        }
    }

    #[test]
    fn test_many_faces_stay_in_bounds() {
        let mut rng = Lcg(1234);
        let config = CropConfig::new(500, 4.0).unwrap();
        for _ in 0..500 {
            let f = frame(rng.below(2000) + 1, rng.below(2000) + 1);
            let faces: Vec<_> = (0..rng.below(6))
                .map(|_| {
                    FaceRect::new(
                        rng.below(2400) as f64 - 200.0,
                        rng.below(2400) as f64 - 200.0,
                        rng.below(400) as f64 + 1.0,
                        rng.below(400) as f64 + 1.0,
                    )
                })
                .collect();

            let crop = resolve(f, &faces, &config);
            assert_in_bounds(&crop, f);
            assert_eq!(crop, resolve(f, &faces, &config));
        }
    }

    #[test]
    fn test_pixel_rect() {
        let f = frame(1000, 1000);
        let crop = resolve(
            f,
            &[FaceRect::new(400.0, 300.0, 100.0, 120.0)],
            &CropConfig::default(),
        );
        assert_eq!(
            crop.pixel_rect(f),
            PixelRect {
                x: 300,
                y: 198,
                side: 300
            }
        );

        let wide = frame(200, 100);
        let centred = resolve(wide, &[], &CropConfig::default());
        assert_eq!(
            centred.pixel_rect(wide),
            PixelRect {
                x: 50,
                y: 0,
                side: 100
            }
        );
    }

    #[test]
    fn test_pixel_rect_stays_inside_tiny_frame() {
        let f = frame(1, 1);
        let crop = resolve(f, &[FaceRect::new(0.0, 0.0, 1.0, 1.0)], &CropConfig::default());
        assert_eq!(crop.pixel_rect(f), PixelRect { x: 0, y: 0, side: 1 });
    }
}
