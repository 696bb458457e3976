//! JSON configuration files.

use crate::{IoError, PerceptionError, PerceptionParams, PerceptionPipeline, WorldMap};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

fn default_world_size() -> usize {
    200
}

/// Everything a caller needs to set up perception at process start.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerceptionConfig {
    #[serde(default)]
    pub params: PerceptionParams,
    /// Side of the square world map, in cells.
    #[serde(default = "default_world_size")]
    pub world_size: usize,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            params: PerceptionParams::default(),
            world_size: default_world_size(),
        }
    }
}

impl PerceptionConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn build_pipeline(&self) -> Result<PerceptionPipeline, PerceptionError> {
        PerceptionPipeline::new(self.params)
    }

    /// Fresh all-zero world map of the configured size.
    pub fn new_world_map(&self) -> WorldMap {
        WorldMap::new(self.world_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LateralOrigin;

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("perception.json");

        let mut cfg = PerceptionConfig::default();
        cfg.world_size = 64;
        cfg.params.world.lateral_origin = LateralOrigin::HalfWidth;
        cfg.write_json(&path).expect("write");

        let loaded = PerceptionConfig::load_json(&path).expect("load");
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.new_world_map().size(), 64);
        assert!(loaded.build_pipeline().is_ok());
    }

    #[test]
    fn empty_object_uses_defaults() {
        let cfg: PerceptionConfig = serde_json::from_str("{}").expect("parse");
        assert_eq!(cfg, PerceptionConfig::default());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = PerceptionConfig::load_json(dir.path().join("nope.json"));
        assert!(matches!(err, Err(IoError::Io(_))));
    }
}
