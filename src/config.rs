use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::placement::PlacementCounts;
use crate::world::WORLD_SIZE;

/// Largest accepted world edge; generation allocates `size * size` columns.
pub const MAX_WORLD_SIZE: usize = 512;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// World and camera settings, loadable from TOML. Missing keys fall back
/// to the defaults below.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub size: usize,
    pub random_hills: usize,
    pub pigs: usize,
    pub cows: usize,
    pub flowers: usize,
    pub seed: Option<u64>,
    pub camera: CameraConfig,
    pub light: LightConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// World units per movement key press.
    pub speed: f32,
    /// Degrees per turn key press.
    pub rotation_speed: f32,
    /// Degrees per pixel of mouse motion.
    pub mouse_sensitivity: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size: WORLD_SIZE,
            random_hills: 10,
            pigs: 8,
            cows: 6,
            flowers: 24,
            seed: None,
            camera: CameraConfig::default(),
            light: LightConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    /// Linear RGB, each channel in [0, 1].
    pub color: [f32; 3],
    /// Degrees added to the orbit phase.
    pub angle: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self { color: [1.0, 1.0, 1.0], angle: 0.0 }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 60.0,
            speed: 0.2,
            rotation_speed: 3.0,
            mouse_sensitivity: 0.2,
        }
    }
}

impl WorldConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::from_toml(&fs::read_to_string(path)?)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from file, or defaults if it is missing or broken.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 || self.size > MAX_WORLD_SIZE {
            return Err(ConfigError::Invalid(format!(
                "world size {} is outside 1..={}",
                self.size, MAX_WORLD_SIZE
            )));
        }
        let camera = &self.camera;
        if !(camera.fov > 0.0 && camera.fov < 180.0) {
            return Err(ConfigError::Invalid(format!("fov {} is outside (0, 180)", camera.fov)));
        }
        let rates = [
            ("speed", camera.speed),
            ("rotation_speed", camera.rotation_speed),
            ("mouse_sensitivity", camera.mouse_sensitivity),
        ];
        for (name, value) in rates {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("camera {} must be positive, got {}", name, value)));
            }
        }
        if !self.light.color.iter().all(|c| (0.0..=1.0).contains(c)) {
            return Err(ConfigError::Invalid(format!("light color {:?} is outside [0, 1]", self.light.color)));
        }
        if !self.light.angle.is_finite() {
            return Err(ConfigError::Invalid("light angle must be finite".to_string()));
        }
        Ok(())
    }

    pub fn counts(&self) -> PlacementCounts {
        PlacementCounts {
            pigs: self.pigs,
            cows: self.cows,
            flowers: self.flowers,
        }
    }
}
