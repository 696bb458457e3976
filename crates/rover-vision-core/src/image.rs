/// Borrowed RGB frame, row-major with interleaved channels.
#[derive(Clone, Copy, Debug)]
pub struct RgbImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // len = w*h*3
}

/// Owned RGB frame with the same layout as [`RgbImageView`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl RgbImage {
    /// All-black image of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width * height * 3],
        }
    }

    /// Image where every pixel has the same colour.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(width * height * 3);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn view(&self) -> RgbImageView<'_> {
        RgbImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        self.view().pixel(x, y)
    }

    #[inline]
    pub fn put_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let i = (y * self.width + x) * 3;
        self.data[i..i + 3].copy_from_slice(&rgb);
    }
}

impl RgbImageView<'_> {
    /// Number of bytes a buffer of this size must hold.
    #[inline]
    pub fn expected_len(&self) -> usize {
        self.width * self.height * 3
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

#[inline]
fn get_rgb(src: &RgbImageView<'_>, x: i32, y: i32) -> [f32; 3] {
    if x < 0 || y < 0 || x >= src.width as i32 || y >= src.height as i32 {
        return [0.0; 3];
    }
    let [r, g, b] = src.pixel(x as usize, y as usize);
    [r as f32, g as f32, b as f32]
}

/// Bilinear sample of all three channels; reads outside the frame are black.
#[inline]
pub fn sample_bilinear_rgb(src: &RgbImageView<'_>, x: f32, y: f32) -> [f32; 3] {
    let x0 = x.floor() as i32;
    let y0 = y.floor() as i32;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let p00 = get_rgb(src, x0, y0);
    let p10 = get_rgb(src, x0 + 1, y0);
    let p01 = get_rgb(src, x0, y0 + 1);
    let p11 = get_rgb(src, x0 + 1, y0 + 1);

    let mut out = [0.0f32; 3];
    for c in 0..3 {
        let a = p00[c] + fx * (p10[c] - p00[c]);
        let b = p01[c] + fx * (p11[c] - p01[c]);
        out[c] = a + fy * (b - a);
    }
    out
}

/// Like [`sample_bilinear_rgb`] but rounded to the nearest byte.
#[inline]
pub fn sample_bilinear_rgb_u8(src: &RgbImageView<'_>, x: f32, y: f32) -> [u8; 3] {
    sample_bilinear_rgb(src, x, y).map(|v| v.round().clamp(0.0, 255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> RgbImage {
        let mut img = RgbImage::new(4, 3);
        for y in 0..3 {
            for x in 0..4 {
                img.put_pixel(x, y, [(x * 10) as u8, (y * 20) as u8, 7]);
            }
        }
        img
    }

    #[test]
    fn integer_coordinates_read_exact_pixels() {
        let img = gradient();
        let view = img.view();
        assert_eq!(sample_bilinear_rgb_u8(&view, 2.0, 1.0), [20, 20, 7]);
        assert_eq!(sample_bilinear_rgb_u8(&view, 3.0, 2.0), [30, 40, 7]);
    }

    #[test]
    fn half_pixel_blends_neighbours() {
        let img = gradient();
        let v = sample_bilinear_rgb(&img.view(), 0.5, 0.5);
        approx::assert_abs_diff_eq!(v[0], 5.0, epsilon = 1e-5);
        approx::assert_abs_diff_eq!(v[1], 10.0, epsilon = 1e-5);
        approx::assert_abs_diff_eq!(v[2], 7.0, epsilon = 1e-5);
    }

    #[test]
    fn outside_reads_black() {
        let img = RgbImage::filled(2, 2, [200, 200, 200]);
        assert_eq!(sample_bilinear_rgb_u8(&img.view(), -5.0, 0.0), [0, 0, 0]);
        assert_eq!(sample_bilinear_rgb_u8(&img.view(), 0.0, 9.0), [0, 0, 0]);
    }
}
