//! Configuration options for a capture run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::capture::RenderModeMap;
use crate::orbit::OrbitParameters;
use crate::{OrbitcapError, Result};

/// Options for a capture run.
///
/// Every field has a default, so a JSON file only needs to name the values
/// it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureOptions {
    /// Rendered image width in pixels.
    pub width: u32,

    /// Rendered image height in pixels.
    pub height: u32,

    /// Near clipping plane.
    pub near: f32,

    /// Far clipping plane.
    pub far: f32,

    /// Directory the images are written to, relative to the working directory.
    pub output_dir: PathBuf,

    /// Orbit shape and step.
    pub orbit: OrbitParameters,

    /// Native renderer indices for each pass.
    pub render_modes: RenderModeMap,

    /// Multiplier applied to every splat's extent.
    pub scale_modifier: f32,

    /// Value written to every pixel of a depth frame with no depth range.
    pub depth_uniform_fill: u8,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            width: 2048,
            height: 1024,
            near: 0.01,
            far: 1000.0,
            output_dir: PathBuf::from("rendered_images"),
            orbit: OrbitParameters::default(),
            render_modes: RenderModeMap::default(),
            scale_modifier: 1.0,
            depth_uniform_fill: 0,
        }
    }
}

impl CaptureOptions {
    /// Reads options from a JSON file and validates them.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let options: Self = serde_json::from_str(&text)?;
        options.validate()?;
        log::debug!("loaded capture options from {}", path.as_ref().display());
        Ok(options)
    }

    /// Checks that the options describe a capture that can run.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(OrbitcapError::InvalidOptions(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.orbit.step_degrees == 0 || self.orbit.step_degrees >= 360 {
            return Err(OrbitcapError::InvalidOptions(format!(
                "angular step must be in 1..360 degrees, got {}",
                self.orbit.step_degrees
            )));
        }
        if !(self.orbit.radius.is_finite() && self.orbit.radius > 0.0) {
            return Err(OrbitcapError::InvalidOptions(format!(
                "orbit radius must be positive, got {}",
                self.orbit.radius
            )));
        }
        if !(self.orbit.fov_y.is_finite()
            && self.orbit.fov_y > 0.0
            && self.orbit.fov_y < std::f32::consts::PI)
        {
            return Err(OrbitcapError::InvalidOptions(format!(
                "field of view must be in (0, pi) radians, got {}",
                self.orbit.fov_y
            )));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(OrbitcapError::InvalidOptions(format!(
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                self.near, self.far
            )));
        }
        if !(self.scale_modifier.is_finite() && self.scale_modifier > 0.0) {
            return Err(OrbitcapError::InvalidOptions(format!(
                "scale modifier must be positive, got {}",
                self.scale_modifier
            )));
        }
        Ok(())
    }
}
