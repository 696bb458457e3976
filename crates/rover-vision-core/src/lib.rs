//! Image and geometry primitives for rover terrain perception.
//!
//! This crate knows nothing about terrain classes or world maps. It provides
//! RGB frame buffers, bilinear sampling, four-point homographies and the
//! perspective warp used to turn a forward-looking camera frame into a
//! top-down view of the ground plane.

mod homography;
mod image;
mod logger;

pub use homography::{homography_from_4pt, quad_is_degenerate, warp_perspective_rgb, Homography};
pub use image::{sample_bilinear_rgb, sample_bilinear_rgb_u8, RgbImage, RgbImageView};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_from_env, init_with_level, LOG_ENV};
