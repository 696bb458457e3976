//! Per-tick perception: camera frame in, classified debug view and
//! navigable-terrain bearings out, world map updated in place.

use crate::{
    classify_terrain, pixels_to_world, rover_coords, to_polar, BinaryMask, MapChannel,
    PerceptionError, PerceptionParams, PixelSet, PolarSet, RoverPose, WorldMap,
};
use log::{debug, trace};
use nalgebra::Point2;
use rover_vision_core::{
    homography_from_4pt, warp_perspective_rgb, Homography, RgbImage, RgbImageView,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Result of one perception step.
#[derive(Clone, Debug)]
pub struct PerceptionOutput {
    /// Rectified masks for display: R = obstacle, G = sample, B = navigable,
    /// 255 where set.
    pub vision: RgbImage,
    /// Navigable pixels as seen from the rover.
    pub nav: PolarSet,
}

/// Validated parameters plus the cached rectification.
#[derive(Clone, Debug)]
pub struct PerceptionPipeline {
    params: PerceptionParams,
    h_src_from_dst: Homography,
}

fn quad_inside(quad: &[Point2<f32>; 4], width: usize, height: usize) -> bool {
    let (w, h) = (width as f32, height as f32);
    quad.iter()
        .all(|p| p.x >= 0.0 && p.y >= 0.0 && p.x <= w && p.y <= h)
}

impl PerceptionPipeline {
    /// Validate `params` and solve the rectifying homography.
    pub fn new(params: PerceptionParams) -> Result<Self, PerceptionError> {
        params.validate()?;

        let cal = &params.calibration;
        // the warp pulls from the camera frame, so solve destination -> source
        let h_src_from_dst = homography_from_4pt(&cal.destination_points(), &cal.source_points())
            .ok_or_else(|| {
                PerceptionError::InvalidCalibration(format!(
                    "degenerate quad (source={:?}, destination={:?})",
                    cal.source, cal.destination
                ))
            })?;

        Ok(Self {
            params,
            h_src_from_dst,
        })
    }

    #[inline]
    pub fn params(&self) -> &PerceptionParams {
        &self.params
    }

    /// Homography taking rectified pixels back to camera pixels.
    #[inline]
    pub fn rectifier(&self) -> &Homography {
        &self.h_src_from_dst
    }

    fn check_input(&self, image: &RgbImageView<'_>, map: &WorldMap) -> Result<(), PerceptionError> {
        if image.width == 0 || image.height == 0 {
            return Err(PerceptionError::InvalidInput(format!(
                "empty frame ({}x{})",
                image.width, image.height
            )));
        }
        if image.data.len() != image.expected_len() {
            return Err(PerceptionError::InvalidInput(format!(
                "frame buffer holds {} bytes, {}x{} RGB needs {}",
                image.data.len(),
                image.width,
                image.height,
                image.expected_len()
            )));
        }
        let cal = &self.params.calibration;
        if !quad_inside(&cal.source_points(), image.width, image.height)
            || !quad_inside(&cal.destination_points(), image.width, image.height)
        {
            return Err(PerceptionError::InvalidInput(format!(
                "calibration quads do not fit a {}x{} frame",
                image.width, image.height
            )));
        }
        if map.size() == 0 {
            return Err(PerceptionError::InvalidInput("world map has zero extent".into()));
        }
        Ok(())
    }

    /// Rectify the frame into a top-down view of the same size.
    pub fn rectify(&self, image: &RgbImageView<'_>) -> RgbImage {
        warp_perspective_rgb(image, &self.h_src_from_dst, image.width, image.height)
    }

    /// Project one class into the world map; returns its rover-frame pixels.
    fn deposit(
        &self,
        mask: &BinaryMask,
        pose: &RoverPose,
        map: &mut WorldMap,
        channel: MapChannel,
    ) -> PixelSet<f32> {
        let world = &self.params.world;
        let rover = rover_coords(mask, world.lateral_origin);
        let cells = pixels_to_world(&rover, pose, world.scale, map.size());
        let saturated = map.accumulate(&cells, channel, world.increment);
        if saturated > 0 {
            trace!("{channel:?}: {saturated} of {} additions saturated", cells.len());
        }
        rover
    }

    /// Run one perception step.
    ///
    /// On error nothing has been written to `map`.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            name = "perceive",
            level = "debug",
            skip_all,
            fields(width = image.width, height = image.height, yaw = pose.yaw_deg)
        )
    )]
    pub fn step(
        &self,
        image: &RgbImageView<'_>,
        pose: &RoverPose,
        map: &mut WorldMap,
    ) -> Result<PerceptionOutput, PerceptionError> {
        self.check_input(image, map)?;

        let warped = self.rectify(image);
        let masks = classify_terrain(&warped.view(), &self.params.classifier);

        let mut vision = RgbImage::new(warped.width, warped.height);
        for (ch, mask) in [&masks.obstacle, &masks.sample, &masks.navigable]
            .into_iter()
            .enumerate()
        {
            for (v, &on) in vision.data[ch..].iter_mut().step_by(3).zip(mask.as_raw()) {
                *v = on * u8::MAX;
            }
        }

        self.deposit(&masks.obstacle, pose, map, MapChannel::Obstacle);
        self.deposit(&masks.sample, pose, map, MapChannel::Sample);
        let nav_rover = self.deposit(&masks.navigable, pose, map, MapChannel::Navigable);

        debug!(
            "pose=({:.1},{:.1},{:.1}deg) navigable={} obstacle={} sample={}",
            pose.x,
            pose.y,
            pose.yaw_deg,
            masks.navigable.count(),
            masks.obstacle.count(),
            masks.sample.count()
        );

        Ok(PerceptionOutput {
            vision,
            nav: to_polar(&nav_rover),
        })
    }
}

/// One-shot step for callers that do not keep a [`PerceptionPipeline`].
pub fn perceive(
    image: &RgbImageView<'_>,
    pose: &RoverPose,
    params: &PerceptionParams,
    map: &mut WorldMap,
) -> Result<PerceptionOutput, PerceptionError> {
    PerceptionPipeline::new(*params)?.step(image, pose, map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CalibrationParams, ConfigError};

    #[test]
    fn degenerate_calibration_is_rejected() {
        let mut params = PerceptionParams::default();
        params.calibration.source = [[10.0, 10.0], [20.0, 20.0], [30.0, 30.0], [10.0, 40.0]];
        assert!(matches!(
            PerceptionPipeline::new(params),
            Err(PerceptionError::InvalidCalibration(_))
        ));
    }

    #[test]
    fn configuration_errors_surface_before_calibration() {
        let mut params = PerceptionParams::default();
        params.classifier.sample.low = [255, 0, 0];
        assert!(matches!(
            PerceptionPipeline::new(params),
            Err(PerceptionError::Configuration(ConfigError::InvertedSampleBand { channel: 0, .. }))
        ));
    }

    #[test]
    fn bad_frames_leave_map_untouched() {
        let pipeline = PerceptionPipeline::new(PerceptionParams::default()).expect("pipeline");
        let mut map = WorldMap::new(200);
        let pose = RoverPose::new(100.0, 100.0, 0.0);

        let empty = RgbImageView { width: 0, height: 0, data: &[] };
        assert!(matches!(
            pipeline.step(&empty, &pose, &mut map),
            Err(PerceptionError::InvalidInput(_))
        ));

        let short = vec![200u8; 320 * 160 * 3 - 1];
        let view = RgbImageView { width: 320, height: 160, data: &short };
        assert!(matches!(
            pipeline.step(&view, &pose, &mut map),
            Err(PerceptionError::InvalidInput(_))
        ));

        // stock calibration reaches x = 301, which a 200 px frame lacks
        let small = RgbImage::filled(200, 150, [200, 200, 200]);
        assert!(matches!(
            pipeline.step(&small.view(), &pose, &mut map),
            Err(PerceptionError::InvalidInput(_))
        ));

        assert_eq!(map, WorldMap::new(200));
    }

    #[test]
    fn zero_sized_map_is_invalid() {
        let params = PerceptionParams {
            calibration: CalibrationParams::identity(4, 4),
            ..PerceptionParams::default()
        };
        let img = RgbImage::filled(4, 4, [200, 200, 200]);
        let mut map = WorldMap::new(0);
        let err = perceive(&img.view(), &RoverPose::default(), &params, &mut map);
        assert!(matches!(err, Err(PerceptionError::InvalidInput(_))));
    }

    #[test]
    fn vision_channels_follow_mask_order() {
        let params = PerceptionParams {
            calibration: CalibrationParams::identity(3, 3),
            ..PerceptionParams::default()
        };
        let mut img = RgbImage::filled(3, 3, [200, 200, 200]);
        img.put_pixel(0, 0, [10, 10, 10]);
        img.put_pixel(1, 0, [180, 160, 20]);

        let pose = RoverPose::new(10.0, 10.0, 0.0);
        let out = perceive(&img.view(), &pose, &params, &mut WorldMap::new(20)).expect("step");
        assert_eq!(out.vision.pixel(0, 0), [255, 0, 0]);
        assert_eq!(out.vision.pixel(1, 0), [0, 255, 0]);
        assert_eq!(out.vision.pixel(2, 2), [0, 0, 255]);
    }
}
