//! Game configuration
//!
//! Play-area geometry and timing knobs. Gravity, damping and masses are not
//! configurable; they live in `consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunable session parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Play area width (world units)
    pub play_width: f64,
    /// Play area height (world units)
    pub play_height: f64,
    /// Grid columns across the width
    pub columns: u32,
    /// Running round length (seconds)
    pub round_duration: f64,
    /// Fixed integration step (seconds)
    pub sim_dt: f64,
    /// Integration steps allowed per frame
    pub max_substeps: u32,
    /// Longest frame accepted by the accumulator (seconds)
    pub max_frame_dt: f64,
    /// Attract-mode slow motion factor
    pub idle_time_scale: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            play_width: PLAY_WIDTH,
            play_height: PLAY_HEIGHT,
            columns: GRID_COLUMNS,
            round_duration: ROUND_DURATION,
            sim_dt: SIM_DT,
            max_substeps: MAX_SUBSTEPS,
            max_frame_dt: MAX_FRAME_DT,
            idle_time_scale: IDLE_TIME_SCALE,
        }
    }
}

impl GameConfig {
    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &str, value: f64) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")))
            }
        }

        positive("play_width", self.play_width)?;
        positive("play_height", self.play_height)?;
        positive("round_duration", self.round_duration)?;
        positive("sim_dt", self.sim_dt)?;
        positive("max_frame_dt", self.max_frame_dt)?;
        positive("idle_time_scale", self.idle_time_scale)?;

        if self.columns == 0 {
            return Err(ConfigError::Invalid("columns must be at least 1".into()));
        }
        if self.max_substeps == 0 {
            return Err(ConfigError::Invalid("max_substeps must be at least 1".into()));
        }

        let cell_size = self.play_width / self.columns as f64;
        let rows = ((self.play_height / cell_size).floor() as u64).max(1);
        match rows.checked_mul(u64::from(self.columns)) {
            Some(cells) if cells <= u64::from(MAX_GRID_CELLS) => Ok(()),
            _ => Err(ConfigError::Invalid(format!(
                "grid of {rows}x{} exceeds {MAX_GRID_CELLS} cells",
                self.columns
            ))),
        }
    }
}
