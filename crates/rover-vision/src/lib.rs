//! Terrain perception for a camera-equipped rover.
//!
//! One camera frame per control tick is turned into:
//! - a top-down classification of every pixel as navigable ground, obstacle
//!   or rock sample,
//! - evidence deposited into a persistent [`WorldMap`] at the rover's pose,
//! - distance/bearing pairs of the navigable pixels for a steering layer.
//!
//! ## Quickstart
//!
//! ```
//! use rover_vision::{PerceptionParams, PerceptionPipeline, RoverPose, WorldMap};
//! use rover_vision_core::RgbImage;
//!
//! # fn main() -> Result<(), rover_vision::PerceptionError> {
//! let pipeline = PerceptionPipeline::new(PerceptionParams::default())?;
//! let mut map = WorldMap::new(200);
//!
//! let frame = RgbImage::filled(320, 160, [190, 180, 170]);
//! let out = pipeline.step(&frame.view(), &RoverPose::new(100.0, 100.0, 45.0), &mut map)?;
//! println!("{} navigable pixels", out.nav.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! 1. rectify with the fixed calibration ([`CalibrationParams`]),
//! 2. classify ([`classify_terrain`]),
//! 3. move set pixels into the rover frame ([`rover_coords`]),
//! 4. rotate, scale, translate and clip into the world grid
//!    ([`pixels_to_world`]) and accumulate ([`WorldMap::accumulate`]),
//! 5. navigable pixels only: polar form ([`to_polar`]).
//!
//! The world map is the only state that survives a step. `step` takes it by
//! `&mut`, so two steps can never write it at the same time.

mod classify;
mod coords;
mod error;
mod io;
mod mask;
mod params;
mod pipeline;
mod world;
mod worldmap;

#[cfg(feature = "image")]
pub mod convert;

pub use classify::{classify_terrain, navigable_mask, obstacle_mask, sample_mask, TerrainMasks};
pub use coords::{rover_coords, to_polar, PixelSet, PolarSet};
pub use error::{ConfigError, IoError, PerceptionError, ShapeError};
pub use io::PerceptionConfig;
pub use mask::BinaryMask;
pub use params::{
    CalibrationParams, ClassifierParams, ColorBand, LateralOrigin, PerceptionParams, WorldParams,
};
pub use pipeline::{perceive, PerceptionOutput, PerceptionPipeline};
pub use world::{pixels_to_world, rotate_pixels, translate_pixels, RoverPose};
pub use worldmap::{MapChannel, WorldMap};

pub use rover_vision_core as core;
