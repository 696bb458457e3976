//! Colour classification of the rectified frame.
//!
//! The three classifiers are independent per-pixel tests; none of them is
//! derived from another. In particular the obstacle mask is not the
//! complement of the navigable mask: with the default thresholds a pixel such
//! as `(200, 100, 100)` belongs to neither.

use crate::{BinaryMask, ClassifierParams, ColorBand};
use rover_vision_core::RgbImageView;

fn mask_where(img: &RgbImageView<'_>, pred: impl Fn([u8; 3]) -> bool) -> BinaryMask {
    BinaryMask::from_fn(img.width, img.height, |x, y| pred(img.pixel(x, y)))
}

/// Pixels whose three channels are all strictly above `thresh`.
pub fn navigable_mask(img: &RgbImageView<'_>, thresh: [u8; 3]) -> BinaryMask {
    mask_where(img, |p| (0..3).all(|c| p[c] > thresh[c]))
}

/// Pixels whose three channels are all strictly below `thresh`.
pub fn obstacle_mask(img: &RgbImageView<'_>, thresh: [u8; 3]) -> BinaryMask {
    mask_where(img, |p| (0..3).all(|c| p[c] < thresh[c]))
}

/// Pixels whose three channels all lie strictly inside `band`.
pub fn sample_mask(img: &RgbImageView<'_>, band: &ColorBand) -> BinaryMask {
    mask_where(img, |p| band.contains(p))
}

/// Output of all three classifiers over one rectified frame.
#[derive(Clone, Debug)]
pub struct TerrainMasks {
    pub navigable: BinaryMask,
    pub obstacle: BinaryMask,
    pub sample: BinaryMask,
}

/// Run every classifier on `img`.
pub fn classify_terrain(img: &RgbImageView<'_>, params: &ClassifierParams) -> TerrainMasks {
    TerrainMasks {
        navigable: navigable_mask(img, params.navigable),
        obstacle: obstacle_mask(img, params.obstacle),
        sample: sample_mask(img, &params.sample),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rover_vision_core::RgbImage;

    fn strip(colors: &[[u8; 3]]) -> RgbImage {
        let mut img = RgbImage::new(colors.len(), 1);
        for (x, &c) in colors.iter().enumerate() {
            img.put_pixel(x, 0, c);
        }
        img
    }

    #[test]
    fn bright_frame_is_all_navigable() {
        let img = RgbImage::filled(8, 5, [161, 200, 255]);
        let masks = classify_terrain(&img.view(), &ClassifierParams::default());
        assert_eq!(masks.navigable.count(), 40);
        assert_eq!(masks.obstacle.count(), 0);
        assert_eq!(masks.sample.count(), 0);
    }

    #[test]
    fn dark_frame_is_all_obstacle() {
        let img = RgbImage::filled(8, 5, [0, 90, 159]);
        let masks = classify_terrain(&img.view(), &ClassifierParams::default());
        assert_eq!(masks.obstacle.count(), 40);
        assert_eq!(masks.navigable.count(), 0);
    }

    #[test]
    fn thresholds_are_strict() {
        let img = strip(&[[160, 200, 200], [160, 160, 160], [159, 159, 159]]);
        let masks = classify_terrain(&img.view(), &ClassifierParams::default());
        assert_eq!(masks.navigable.as_raw(), &[0, 0, 0]);
        assert_eq!(masks.obstacle.as_raw(), &[0, 0, 1]);
    }

    #[test]
    fn mixed_channels_fall_in_the_gap() {
        let img = strip(&[[200, 100, 100], [100, 200, 100], [100, 100, 200], [170, 170, 160]]);
        let masks = classify_terrain(&img.view(), &ClassifierParams::default());
        assert_eq!(masks.navigable.count(), 0);
        assert_eq!(masks.obstacle.count(), 0);
        assert!(masks.navigable.is_disjoint(&masks.obstacle));
    }

    #[test]
    fn gold_rock_is_a_sample() {
        let img = strip(&[[180, 160, 20], [180, 160, 50], [110, 160, 20], [220, 210, 170]]);
        let masks = classify_terrain(&img.view(), &ClassifierParams::default());
        assert_eq!(masks.sample.as_raw(), &[1, 0, 0, 0]);
        assert_eq!(masks.navigable.as_raw(), &[0, 0, 0, 1]);
    }
}
