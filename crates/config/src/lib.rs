//! Shared configuration for Vitrine
//!
//! This crate provides the single source of truth for surface dimensions,
//! frame pacing, and other settings shared between the bridge, the headless
//! collaborator, and the demo shell.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default surface width in pixels
pub const DEFAULT_SURFACE_WIDTH: u32 = 1024;

/// Default surface height in pixels
pub const DEFAULT_SURFACE_HEIGHT: u32 = 768;

/// Default render loop target, in frames per second
pub const DEFAULT_TARGET_FPS: f32 = 60.0;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Pixel dimensions for newly created UI surfaces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SURFACE_WIDTH,
            height: DEFAULT_SURFACE_HEIGHT,
        }
    }
}

impl SurfaceConfig {
    /// Create a new surface config with the given dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height, for quad sizing in scene units
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Frame pacing for the render loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Target frame rate in frames per second
    pub target_fps: f32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
        }
    }
}

impl FrameConfig {
    /// Duration of one frame at the target rate
    pub fn frame_delta(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.target_fps)
    }

    /// Frame delta in seconds, as passed to process callbacks
    pub fn delta_seconds(&self) -> f32 {
        1.0 / self.target_fps
    }
}

/// Top-level bridge configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Default dimensions for new UI surfaces
    #[serde(default)]
    pub surface: SurfaceConfig,
    /// Render loop pacing
    #[serde(default)]
    pub frame: FrameConfig,
}

impl BridgeConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
