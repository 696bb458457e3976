//! Rover frame to world grid.

use crate::PixelSet;
use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};

/// Rover position in world cells and heading in degrees (counter-clockwise
/// from the world x axis).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoverPose {
    pub x: f64,
    pub y: f64,
    pub yaw_deg: f64,
}

impl RoverPose {
    pub fn new(x: f64, y: f64, yaw_deg: f64) -> Self {
        Self { x, y, yaw_deg }
    }

    /// Heading in radians, after reducing the angle into `[0, 360)` degrees.
    #[inline]
    pub fn yaw_rad(&self) -> f64 {
        self.yaw_deg.rem_euclid(360.0).to_radians()
    }
}

/// Rotate rover-frame pixels by `yaw_deg` (counter-clockwise).
pub fn rotate_pixels(pixels: &PixelSet<f32>, yaw_deg: f64) -> PixelSet<f64> {
    let rot = Rotation2::new(RoverPose::new(0.0, 0.0, yaw_deg).yaw_rad());
    let mut out = PixelSet::with_capacity(pixels.len());
    for (x, y) in pixels.iter() {
        let v = rot * Vector2::new(x as f64, y as f64);
        out.push(v.x, v.y);
    }
    out
}

/// Scale rotated pixels down to world cells and shift them to the rover.
pub fn translate_pixels(rotated: &PixelSet<f64>, pose: &RoverPose, scale: f32) -> PixelSet<f64> {
    let s = scale as f64;
    let mut out = PixelSet::with_capacity(rotated.len());
    for (x, y) in rotated.iter() {
        out.push(pose.x + x / s, pose.y + y / s);
    }
    out
}

/// Round to the nearest cell and saturate into `[0, extent - 1]`.
#[inline]
fn clip_cell(v: f64, extent: usize) -> usize {
    // NaN survives clamp and then casts to 0
    v.round().clamp(0.0, extent.saturating_sub(1) as f64) as usize
}

/// Map rover-frame pixels onto a square world grid of side `extent`.
///
/// Points outside the grid are pulled onto its border rather than dropped,
/// so the output always has as many entries as the input.
pub fn pixels_to_world(
    pixels: &PixelSet<f32>,
    pose: &RoverPose,
    scale: f32,
    extent: usize,
) -> PixelSet<usize> {
    let world = translate_pixels(&rotate_pixels(pixels, pose.yaw_deg), pose, scale);
    let mut out = PixelSet::with_capacity(world.len());
    for (x, y) in world.iter() {
        out.push(clip_cell(x, extent), clip_cell(y, extent));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn set(pairs: &[(f32, f32)]) -> PixelSet<f32> {
        let mut s = PixelSet::new();
        for &(x, y) in pairs {
            s.push(x, y);
        }
        s
    }

    #[test]
    fn zero_yaw_rotation_is_identity() {
        let pts = set(&[(10.0, 0.0), (3.5, -7.0), (0.0, 120.0)]);
        let rot = rotate_pixels(&pts, 0.0);
        for ((x, y), (rx, ry)) in pts.iter().zip(rot.iter()) {
            assert_eq!(rx, x as f64);
            assert_eq!(ry, y as f64);
        }
    }

    #[test]
    fn quarter_turn_points_forward_along_world_y() {
        let rot = rotate_pixels(&set(&[(10.0, 0.0)]), 90.0);
        assert_abs_diff_eq!(rot.x()[0], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(rot.y()[0], 10.0, epsilon = 1e-9);
    }

    #[test]
    fn yaw_wraps_modulo_full_turn() {
        let pts = set(&[(10.0, 4.0), (25.0, -3.0)]);
        let pose_a = RoverPose::new(100.0, 100.0, 450.0);
        let pose_b = RoverPose::new(100.0, 100.0, 90.0);
        assert_eq!(
            pixels_to_world(&pts, &pose_a, 10.0, 200),
            pixels_to_world(&pts, &pose_b, 10.0, 200)
        );
        assert_abs_diff_eq!(
            RoverPose::new(0.0, 0.0, -90.0).yaw_rad(),
            1.5 * std::f64::consts::PI,
            epsilon = 1e-12
        );
    }

    #[test]
    fn forward_pixel_lands_one_cell_ahead() {
        let pose = RoverPose::new(50.0, 50.0, 0.0);
        let world = pixels_to_world(&set(&[(10.0, 0.0)]), &pose, 10.0, 200);
        assert_eq!(world.x(), &[51]);
        assert_eq!(world.y(), &[50]);
    }

    #[test]
    fn rounding_is_to_nearest() {
        let pose = RoverPose::new(0.0, 0.0, 0.0);
        let world = pixels_to_world(&set(&[(14.0, 16.0), (15.0, 4.9)]), &pose, 10.0, 200);
        assert_eq!(world.x(), &[1, 2]);
        assert_eq!(world.y(), &[2, 0]);
    }

    #[test]
    fn out_of_range_points_saturate_to_border() {
        let pts = set(&[(10.0, 0.0), (1e6, -1e6), (-50.0, 50.0)]);
        for pose in [
            RoverPose::new(-1e9, 1e9, 0.0),
            RoverPose::new(5000.0, -5000.0, 450.0),
            RoverPose::new(199.9, 0.1, -720.0),
            RoverPose::new(f64::NAN, 10.0, 30.0),
        ] {
            let world = pixels_to_world(&pts, &pose, 10.0, 200);
            assert_eq!(world.len(), pts.len());
            assert!(world.iter().all(|(x, y)| x <= 199 && y <= 199));
        }

        let far = pixels_to_world(&set(&[(0.0, 0.0)]), &RoverPose::new(-30.0, 900.0, 0.0), 10.0, 200);
        assert_eq!(far.iter().collect::<Vec<_>>(), vec![(0, 199)]);
    }
}
