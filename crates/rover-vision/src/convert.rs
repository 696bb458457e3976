//! Conversions to and from the `image` crate.

use crate::{MapChannel, WorldMap};
use rover_vision_core::{RgbImage, RgbImageView};

/// Borrow an `image::RgbImage` as a core view.
pub fn rgb_view(img: &::image::RgbImage) -> RgbImageView<'_> {
    RgbImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Copy a core image into an `image::RgbImage`.
///
/// `None` only if the buffer length does not match its dimensions.
pub fn to_image_rgb(img: &RgbImage) -> Option<::image::RgbImage> {
    ::image::RgbImage::from_raw(img.width as u32, img.height as u32, img.data.clone())
}

/// Render the world map as RGB (obstacle, sample, navigable), with world y
/// pointing up the picture.
pub fn worldmap_to_image(map: &WorldMap) -> ::image::RgbImage {
    let n = map.size() as u32;
    ::image::RgbImage::from_fn(n, n, |col, row| {
        let (x, y) = (col as usize, map.size() - 1 - row as usize);
        ::image::Rgb(MapChannel::ALL.map(|ch| map.get(ch, x, y)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PixelSet;

    #[test]
    fn view_borrows_without_copy() {
        let img = ::image::RgbImage::from_pixel(6, 2, ::image::Rgb([1, 2, 3]));
        let view = rgb_view(&img);
        assert_eq!((view.width, view.height), (6, 2));
        assert_eq!(view.pixel(5, 1), [1, 2, 3]);
        assert_eq!(view.data.as_ptr(), img.as_raw().as_ptr());
    }

    #[test]
    fn core_image_converts() {
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(2, 1, [7, 8, 9]);
        let out = to_image_rgb(&img).expect("consistent buffer");
        assert_eq!(out.get_pixel(2, 1).0, [7, 8, 9]);
    }

    #[test]
    fn map_is_drawn_with_y_up() {
        let mut map = WorldMap::new(4);
        let cells = PixelSet::from_parts(vec![1], vec![0]).expect("pairs");
        map.accumulate(&cells, MapChannel::Navigable, 255);
        let img = worldmap_to_image(&map);
        assert_eq!(img.get_pixel(1, 3).0, [0, 0, 255]);
        assert_eq!(img.get_pixel(1, 0).0, [0, 0, 0]);
    }
}
