//! Rover-centred and polar views of classified pixels.
//!
//! Rover frame: origin at the bottom of the rectified view, `x` forward (up
//! the image), `y` to the rover's left. Units are rectified pixels.

use crate::{BinaryMask, LateralOrigin, ShapeError};
use serde::{Deserialize, Serialize};

/// Parallel x/y coordinate sequences of equal length.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "PixelSetParts<T>",
    bound(deserialize = "T: Deserialize<'de> + Copy")
)]
pub struct PixelSet<T> {
    x: Vec<T>,
    y: Vec<T>,
}

#[derive(Deserialize)]
struct PixelSetParts<T> {
    x: Vec<T>,
    y: Vec<T>,
}

impl<T: Copy> TryFrom<PixelSetParts<T>> for PixelSet<T> {
    type Error = ShapeError;

    fn try_from(parts: PixelSetParts<T>) -> Result<Self, ShapeError> {
        let (x, y) = (parts.x.len(), parts.y.len());
        Self::from_parts(parts.x, parts.y).ok_or(ShapeError::UnequalLengths { x, y })
    }
}

impl<T: Copy> PixelSet<T> {
    pub fn new() -> Self {
        Self {
            x: Vec::new(),
            y: Vec::new(),
        }
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
        }
    }

    /// Pair up two sequences; `None` if their lengths differ.
    pub fn from_parts(x: Vec<T>, y: Vec<T>) -> Option<Self> {
        (x.len() == y.len()).then_some(Self { x, y })
    }

    #[inline]
    pub fn push(&mut self, x: T, y: T) {
        self.x.push(x);
        self.y.push(y);
    }

    #[inline]
    pub fn x(&self) -> &[T] {
        &self.x
    }

    #[inline]
    pub fn y(&self) -> &[T] {
        &self.y
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (T, T)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// Rover-frame coordinates of every set pixel of `mask`, in scan order.
///
/// `forward = height - row`, `lateral = origin_column - col`.
pub fn rover_coords(mask: &BinaryMask, origin: LateralOrigin) -> PixelSet<f32> {
    let h = mask.height() as f32;
    let col0 = origin.column(mask.width(), mask.height());

    let mut out = PixelSet::with_capacity(mask.count());
    for (col, row) in mask.iter_set() {
        out.push(h - row as f32, col0 - col as f32);
    }
    out
}

/// Distance/bearing pairs; bearing in radians from the forward axis,
/// positive to the left.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PolarSet {
    pub distances: Vec<f32>,
    pub bearings: Vec<f32>,
}

impl PolarSet {
    #[inline]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

pub fn to_polar(pixels: &PixelSet<f32>) -> PolarSet {
    let (distances, bearings) = pixels
        .iter()
        .map(|(fwd, lat)| (fwd.hypot(lat), lat.atan2(fwd)))
        .unzip();
    PolarSet {
        distances,
        bearings,
    }
}
