//! Capture requests and render modes.

use std::path::{Path, PathBuf};

use glam::Vec4;
use serde::{Deserialize, Serialize};

/// What a capture pass renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderMode {
    /// Final shaded color.
    Color,
    /// Depth visualization.
    Depth,
}

impl RenderMode {
    /// Both passes, in capture order.
    pub const ALL: [RenderMode; 2] = [RenderMode::Color, RenderMode::Depth];

    /// Filename prefix for this pass.
    #[must_use]
    pub fn file_prefix(self) -> &'static str {
        match self {
            RenderMode::Color => "color",
            RenderMode::Depth => "depth",
        }
    }

    /// Background the frame is cleared to before drawing.
    #[must_use]
    pub fn clear_color(self) -> Vec4 {
        match self {
            RenderMode::Color => Vec4::ONE,
            RenderMode::Depth => Vec4::new(0.0, 0.0, 0.0, 1.0),
        }
    }

    /// Output filename for this pass at `angle_degrees`, e.g. `depth_010.png`.
    #[must_use]
    pub fn file_name(self, angle_degrees: u32) -> String {
        format!("{}_{angle_degrees:03}.png", self.file_prefix())
    }
}

/// Maps [`RenderMode`] onto the renderer's own mode indices.
///
/// The splat renderer numbers its modes `-4..=3`: Gaussian ball (-4),
/// flat ball (-3), billboard (-2), depth (-1), and spherical harmonics of
/// degree 0 through 3 (0..=3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderModeMap {
    /// Native index used for color passes.
    pub color: i32,
    /// Native index used for depth passes.
    pub depth: i32,
}

impl Default for RenderModeMap {
    fn default() -> Self {
        Self {
            color: 3,
            depth: -1,
        }
    }
}

impl RenderModeMap {
    /// Native index for `mode`.
    #[must_use]
    pub fn native_index(&self, mode: RenderMode) -> i32 {
        match mode {
            RenderMode::Color => self.color,
            RenderMode::Depth => self.depth,
        }
    }
}

/// One frame to capture. Created per iteration and consumed immediately.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRequest {
    /// Orbit angle in degrees.
    pub angle_degrees: u32,
    /// Pass to render.
    pub mode: RenderMode,
    /// Where the image is written.
    pub output: PathBuf,
    /// Whether the written image gets depth level normalization.
    pub post_process_depth: bool,
}

impl CaptureRequest {
    /// Builds the request for `mode` at `angle_degrees` inside `output_dir`.
    ///
    /// Depth passes are always post-processed.
    #[must_use]
    pub fn new(output_dir: &Path, angle_degrees: u32, mode: RenderMode) -> Self {
        Self {
            angle_degrees,
            mode,
            output: output_dir.join(mode.file_name(angle_degrees)),
            post_process_depth: mode == RenderMode::Depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names_are_zero_padded() {
        assert_eq!(RenderMode::Color.file_name(0), "color_000.png");
        assert_eq!(RenderMode::Depth.file_name(10), "depth_010.png");
        assert_eq!(RenderMode::Depth.file_name(350), "depth_350.png");
    }

    #[test]
    fn test_clear_colors() {
        assert_eq!(RenderMode::Color.clear_color(), Vec4::ONE);
        assert_eq!(
            RenderMode::Depth.clear_color(),
            Vec4::new(0.0, 0.0, 0.0, 1.0)
        );
    }

    #[test]
    fn test_default_mode_map() {
        let map = RenderModeMap::default();
        assert_eq!(map.native_index(RenderMode::Color), 3);
        assert_eq!(map.native_index(RenderMode::Depth), -1);
    }

    #[test]
    fn test_request_paths() {
        let dir = Path::new("rendered_images");
        let color = CaptureRequest::new(dir, 20, RenderMode::Color);
        let depth = CaptureRequest::new(dir, 20, RenderMode::Depth);
        assert_eq!(color.output, dir.join("color_020.png"));
        assert_eq!(depth.output, dir.join("depth_020.png"));
        assert!(!color.post_process_depth);
        assert!(depth.post_process_depth);
    }
}
