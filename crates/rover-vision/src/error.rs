use crate::MapChannel;

/// Parameter combinations rejected by [`PerceptionParams::validate`](crate::PerceptionParams::validate).
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("sample band channel {channel} is inverted (low={low}, high={high})")]
    InvertedSampleBand { channel: usize, low: u8, high: u8 },
    #[error("sample band overlaps the navigable threshold on every channel")]
    SampleOverlapsNavigable,
    #[error("obstacle threshold overlaps the navigable threshold on every channel")]
    ObstacleOverlapsNavigable,
    #[error("world scale must be finite and positive (got {0})")]
    InvalidScale(f32),
    #[error("world map increment must be non-zero")]
    ZeroIncrement,
}

/// Errors returned by a perception step.
///
/// All of them are detected before any work is done and before the world
/// map is touched.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PerceptionError {
    #[error("invalid calibration: {0}")]
    InvalidCalibration(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

/// Errors from reading or writing JSON configuration files.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Deserialized containers whose parallel buffers disagree in length.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("pixel set has {x} x values but {y} y values")]
    UnequalLengths { x: usize, y: usize },
    #[error("world map channel {channel:?} holds {len} cells, which does not fit a {size}x{size} map")]
    ChannelLength {
        channel: MapChannel,
        len: usize,
        size: usize,
    },
}
