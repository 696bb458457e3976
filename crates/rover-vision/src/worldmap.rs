//! Persistent three-channel occupancy map.
//!
//! Cells are `u8` per channel and accumulate with saturating addition: a
//! cell that reaches 255 stays there. Nothing in this crate decays or resets
//! a cell, so values only ever increase.

use crate::{PixelSet, ShapeError};
use serde::{Deserialize, Serialize};

/// Evidence channel of the world map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapChannel {
    Obstacle = 0,
    Sample = 1,
    Navigable = 2,
}

impl MapChannel {
    pub const ALL: [MapChannel; 3] = [MapChannel::Obstacle, MapChannel::Sample, MapChannel::Navigable];
}

/// Square world grid; row = world y, column = world x.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WorldMapParts")]
pub struct WorldMap {
    size: usize,
    channels: [Vec<u8>; 3],
}

#[derive(Deserialize)]
struct WorldMapParts {
    size: usize,
    channels: [Vec<u8>; 3],
}

impl TryFrom<WorldMapParts> for WorldMap {
    type Error = ShapeError;

    fn try_from(parts: WorldMapParts) -> Result<Self, ShapeError> {
        let cells = parts.size.checked_mul(parts.size);
        for channel in MapChannel::ALL {
            let len = parts.channels[channel as usize].len();
            if cells != Some(len) {
                return Err(ShapeError::ChannelLength {
                    channel,
                    len,
                    size: parts.size,
                });
            }
        }
        Ok(Self {
            size: parts.size,
            channels: parts.channels,
        })
    }
}

impl WorldMap {
    /// All-zero map of `size x size` cells.
    pub fn new(size: usize) -> Self {
        let cells = size * size;
        Self {
            size,
            channels: [vec![0; cells], vec![0; cells], vec![0; cells]],
        }
    }

    /// Side length in cells.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, channel: MapChannel, x: usize, y: usize) -> u8 {
        self.channels[channel as usize][y * self.size + x]
    }

    /// Row-major cells of one channel.
    #[inline]
    pub fn channel(&self, channel: MapChannel) -> &[u8] {
        &self.channels[channel as usize]
    }

    /// Add `increment` to every listed cell of `channel`.
    ///
    /// Repeated coordinates accumulate once per occurrence. Coordinates past
    /// the last row or column land on the border cell, the same clipping
    /// [`pixels_to_world`](crate::pixels_to_world) applies. Returns how many
    /// additions hit the 255 ceiling.
    pub fn accumulate(&mut self, cells: &PixelSet<usize>, channel: MapChannel, increment: u8) -> usize {
        let size = self.size;
        let Some(last) = size.checked_sub(1) else {
            return 0;
        };
        let data = &mut self.channels[channel as usize];
        let mut saturated = 0;
        for (x, y) in cells.iter() {
            let cell = &mut data[y.min(last) * size + x.min(last)];
            let (sum, overflow) = cell.overflowing_add(increment);
            if overflow {
                saturated += 1;
                *cell = u8::MAX;
            } else {
                *cell = sum;
            }
        }
        saturated
    }

    /// Number of non-zero cells in `channel`.
    pub fn coverage(&self, channel: MapChannel) -> usize {
        self.channel(channel).iter().filter(|&&v| v != 0).count()
    }
}
