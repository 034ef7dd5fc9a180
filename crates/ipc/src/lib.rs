//! Input message protocol for Vitrine
//!
//! Defines the pointer events the rendering collaborator reports against
//! bound surfaces. Coordinates are percentages in `[0, 1]` relative to the
//! surface, with the origin at the top-left corner.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while constructing input events
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("input coordinate {axis} out of range: {value} (expected 0.0..=1.0)")]
    CoordinateOutOfRange { axis: char, value: f32 },
}

/// Pointer events forwarded from the render side to surface listeners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum InputEvent {
    /// Pointer moved over a bound surface without pressing
    Hover {
        node_path: String,
        x_pct: f32,
        y_pct: f32,
    },

    /// Pointer pressed down on a bound surface
    Press {
        node_path: String,
        x_pct: f32,
        y_pct: f32,
    },

    /// Pointer released over a bound surface
    Release {
        node_path: String,
        x_pct: f32,
        y_pct: f32,
    },
}

impl InputEvent {
    /// Validated hover event
    pub fn hover(node_path: impl Into<String>, x_pct: f32, y_pct: f32) -> Result<Self, InputError> {
        validate(x_pct, y_pct)?;
        Ok(Self::Hover {
            node_path: node_path.into(),
            x_pct,
            y_pct,
        })
    }

    /// Validated press event
    pub fn press(node_path: impl Into<String>, x_pct: f32, y_pct: f32) -> Result<Self, InputError> {
        validate(x_pct, y_pct)?;
        Ok(Self::Press {
            node_path: node_path.into(),
            x_pct,
            y_pct,
        })
    }

    /// Validated release event
    pub fn release(
        node_path: impl Into<String>,
        x_pct: f32,
        y_pct: f32,
    ) -> Result<Self, InputError> {
        validate(x_pct, y_pct)?;
        Ok(Self::Release {
            node_path: node_path.into(),
            x_pct,
            y_pct,
        })
    }

    /// Path of the surface node the event targets
    pub fn node_path(&self) -> &str {
        match self {
            Self::Hover { node_path, .. }
            | Self::Press { node_path, .. }
            | Self::Release { node_path, .. } => node_path,
        }
    }

    /// Normalized surface coordinates of the event
    pub fn coords(&self) -> (f32, f32) {
        match *self {
            Self::Hover { x_pct, y_pct, .. }
            | Self::Press { x_pct, y_pct, .. }
            | Self::Release { x_pct, y_pct, .. } => (x_pct, y_pct),
        }
    }
}

fn validate(x_pct: f32, y_pct: f32) -> Result<(), InputError> {
    for (axis, value) in [('x', x_pct), ('y', y_pct)] {
        if !(0.0..=1.0).contains(&value) {
            return Err(InputError::CoordinateOutOfRange { axis, value });
        }
    }
    Ok(())
}
