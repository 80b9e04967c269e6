//! The capability interface a capture run drives.

use glam::Vec4;
use orbitcap_core::CameraState;

use crate::error::{RenderError, RenderResult};
use crate::framebuffer::Framebuffer;
use crate::gaussian::GaussianScene;

/// Native render modes of the splat renderer, keyed by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeRenderMode {
    /// Opaque shaded ellipsoids (-4).
    GaussianBall,
    /// Opaque flat discs (-3).
    FlatBall,
    /// Unblended quads (-2).
    Billboard,
    /// View-space depth visualization (-1).
    Depth,
    /// Spherical harmonics color up to the given degree (0..=3).
    SphericalHarmonics(u32),
}

impl NativeRenderMode {
    /// Decodes a native index.
    pub fn from_index(index: i32) -> RenderResult<Self> {
        match index {
            -4 => Ok(Self::GaussianBall),
            -3 => Ok(Self::FlatBall),
            -2 => Ok(Self::Billboard),
            -1 => Ok(Self::Depth),
            0..=3 => Ok(Self::SphericalHarmonics(index.unsigned_abs())),
            _ => Err(RenderError::UnsupportedRenderMode(index)),
        }
    }

    /// The native index.
    #[must_use]
    pub fn index(self) -> i32 {
        match self {
            Self::GaussianBall => -4,
            Self::FlatBall => -3,
            Self::Billboard => -2,
            Self::Depth => -1,
            Self::SphericalHarmonics(degree) => degree.min(3) as i32,
        }
    }
}

/// A stateful splat renderer.
///
/// Calls are made in a fixed order per frame: push intrinsics, push pose,
/// resort, clear, set mode, draw, read pixels. `draw` must not return until
/// the frame's pixels are complete; no two frames overlap.
pub trait SplatRenderer {
    /// Uploads scene data.
    fn update_scene(&mut self, scene: &GaussianScene) -> RenderResult<()>;

    /// Scales every splat's extent.
    fn set_scale_modifier(&mut self, modifier: f32) -> RenderResult<()>;

    /// Pushes field of view and clip planes. When `rebuild` is false the
    /// renderer may keep its cached projection.
    fn push_intrinsics(&mut self, camera: &CameraState, rebuild: bool) -> RenderResult<()>;

    /// Pushes position, target and up. When `rebuild` is false the renderer
    /// may keep its cached view matrix.
    fn push_pose(&mut self, camera: &CameraState, rebuild: bool) -> RenderResult<()>;

    /// Re-sorts splats back to front for `camera`. Required before every
    /// draw from a new viewpoint.
    fn resort(&mut self, camera: &CameraState) -> RenderResult<()>;

    /// Selects a native render mode by index.
    fn set_mode(&mut self, index: i32) -> RenderResult<()>;

    /// Clears the frame to `color` (RGBA in 0..1) before the next draw.
    fn clear(&mut self, color: Vec4) -> RenderResult<()>;

    /// Draws the scene and waits for the GPU to finish.
    fn draw(&mut self) -> RenderResult<()>;

    /// Reads back `width × height` RGB8 pixels.
    fn read_pixels(&mut self, width: u32, height: u32) -> RenderResult<Framebuffer>;
}
