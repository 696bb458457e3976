//! Perception parameters.
//!
//! Every constant the pipeline depends on lives here: the perspective
//! calibration, the three colour classifiers and the world-map projection.
//! [`PerceptionParams::validate`] checks the cross-field invariants once, when
//! a [`PerceptionPipeline`](crate::PerceptionPipeline) is built.

use crate::ConfigError;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Half side of the destination square, in rectified pixels.
const DST_HALF_SIZE: f32 = 5.0;
/// Gap between the destination square and the bottom edge of the frame.
const DST_BOTTOM_OFFSET: f32 = 4.0;
/// Ground-grid corners as seen by the stock rover camera (320x160 frame).
const STOCK_SOURCE: [[f32; 2]; 4] = [[14.0, 140.0], [301.0, 140.0], [200.0, 96.0], [118.0, 96.0]];

/// Source and destination quads of the perspective rectification.
///
/// Corner `k` of `source` (camera pixels) is mapped to corner `k` of
/// `destination` (rectified pixels).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationParams {
    pub source: [[f32; 2]; 4],
    pub destination: [[f32; 2]; 4],
}

impl CalibrationParams {
    /// Stock rover calibration for a `width x height` camera frame.
    ///
    /// One 1 m grid square seen at [`STOCK_SOURCE`] becomes a 10x10 px square
    /// centred horizontally just above the bottom edge of the rectified view.
    pub fn for_camera(width: usize, height: usize) -> Self {
        let cx = width as f32 / 2.0;
        let bottom = height as f32 - DST_BOTTOM_OFFSET;
        let top = bottom - 2.0 * DST_HALF_SIZE;
        Self {
            source: STOCK_SOURCE,
            destination: [
                [cx - DST_HALF_SIZE, bottom],
                [cx + DST_HALF_SIZE, bottom],
                [cx + DST_HALF_SIZE, top],
                [cx - DST_HALF_SIZE, top],
            ],
        }
    }

    /// Calibration that leaves a `width x height` frame untouched.
    pub fn identity(width: usize, height: usize) -> Self {
        let (w, h) = ((width.max(1) - 1) as f32, (height.max(1) - 1) as f32);
        let quad = [[0.0, 0.0], [w, 0.0], [w, h], [0.0, h]];
        Self {
            source: quad,
            destination: quad,
        }
    }

    pub fn source_points(&self) -> [Point2<f32>; 4] {
        self.source.map(|[x, y]| Point2::new(x, y))
    }

    pub fn destination_points(&self) -> [Point2<f32>; 4] {
        self.destination.map(|[x, y]| Point2::new(x, y))
    }
}

impl Default for CalibrationParams {
    fn default() -> Self {
        Self::for_camera(320, 160)
    }
}

/// Per-channel open interval `low < v < high`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorBand {
    pub low: [u8; 3],
    pub high: [u8; 3],
}

impl ColorBand {
    #[inline]
    pub fn contains(&self, rgb: [u8; 3]) -> bool {
        (0..3).all(|c| rgb[c] > self.low[c] && rgb[c] < self.high[c])
    }
}

/// Thresholds of the three colour classifiers.
///
/// Navigable and obstacle use strict comparisons against their own
/// thresholds, so a pixel with some channels above and some below is neither.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    /// A pixel is navigable iff every channel is above this.
    pub navigable: [u8; 3],
    /// A pixel is an obstacle iff every channel is below this.
    pub obstacle: [u8; 3],
    /// Colour band of rock samples (gold against grey/brown terrain).
    pub sample: ColorBand,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            navigable: [160, 160, 160],
            obstacle: [160, 160, 160],
            sample: ColorBand {
                low: [110, 100, 0],
                high: [210, 190, 50],
            },
        }
    }
}

/// Which image column is the rover's lateral zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LateralOrigin {
    /// Column equal to the image height. Matches the historical rover maps,
    /// and coincides with the centre for 2:1 frames such as 320x160.
    #[default]
    ImageHeight,
    /// Column at half the image width.
    HalfWidth,
}

impl LateralOrigin {
    /// Reference column for a `width x height` mask.
    #[inline]
    pub fn column(self, width: usize, height: usize) -> f32 {
        match self {
            LateralOrigin::ImageHeight => height as f32,
            LateralOrigin::HalfWidth => width as f32 / 2.0,
        }
    }
}

/// Projection of rover-frame pixels onto the world map.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldParams {
    /// Rover-frame pixels per world cell.
    pub scale: f32,
    /// Amount added to a world cell for each pixel landing on it.
    pub increment: u8,
    pub lateral_origin: LateralOrigin,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            scale: 10.0,
            increment: 255,
            lateral_origin: LateralOrigin::default(),
        }
    }
}

/// Complete configuration of a perception step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionParams {
    pub calibration: CalibrationParams,
    pub classifier: ClassifierParams,
    pub world: WorldParams,
}

impl PerceptionParams {
    /// Check ordering and range invariants between fields.
    ///
    /// The calibration quads are checked separately when the homography is
    /// solved, since degeneracy is a property of the geometry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cls = &self.classifier;
        let band = &cls.sample;
        for c in 0..3 {
            if band.low[c] >= band.high[c] {
                return Err(ConfigError::InvertedSampleBand {
                    channel: c,
                    low: band.low[c],
                    high: band.high[c],
                });
            }
        }

        // Integer colours v with lo < v < hi exist iff lo + 2 <= hi.
        let admits = |lo: u8, hi: u8| lo as u16 + 2 <= hi as u16;

        if (0..3).all(|c| admits(band.low[c].max(cls.navigable[c]), band.high[c])) {
            return Err(ConfigError::SampleOverlapsNavigable);
        }
        if (0..3).all(|c| admits(cls.navigable[c], cls.obstacle[c])) {
            return Err(ConfigError::ObstacleOverlapsNavigable);
        }

        let scale = self.world.scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ConfigError::InvalidScale(scale));
        }
        if self.world.increment == 0 {
            return Err(ConfigError::ZeroIncrement);
        }
        Ok(())
    }
}
