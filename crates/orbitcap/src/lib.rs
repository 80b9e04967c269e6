//! orbitcap: orbital multi-view capture of Gaussian splat scenes.
//!
//! A capture run moves one camera around a fixed orbit and, at every angular
//! step, renders a color image and a depth image of the scene. Depth images
//! are contrast-stretched after they are written.
//!
//! # Quick Start
//!
//! ```no_run
//! use orbitcap::*;
//!
//! fn main() -> Result<()> {
//!     let summary = capture_orbit("scene.ply", CaptureOptions::default())?;
//!     println!("wrote {} images", summary.len());
//!     Ok(())
//! }
//! ```
//!
//! # Pieces
//!
//! - [`CaptureDriver`] walks the orbit and owns the [`CameraState`]
//! - [`capture_frame`] renders and writes one [`CaptureRequest`]
//! - [`SplatRenderer`] is what the driver talks to; [`GaussianRenderEngine`]
//!   implements it with wgpu

// Angles and image sizes are converted to f32 for pose math
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_errors_doc)]

mod driver;
mod frame_capture;

use std::path::Path;

pub use driver::{CaptureDriver, CaptureSummary};
pub use frame_capture::capture_frame;

// Re-export core types
pub use orbitcap_core::{
    CameraPose, CameraState, CaptureOptions, CaptureRequest, OrbitParameters, OrbitcapError,
    RenderMode, RenderModeMap, Result, Mat4, Vec3, Vec4,
};

// Re-export render types
pub use orbitcap_render::{
    ContextOptions, Framebuffer, GaussianRenderEngine, GaussianScene, GpuContext, RenderError,
    RowOrigin, SplatRenderer,
};

/// Wraps a renderer failure with what was being attempted.
pub(crate) fn render_error(action: &str, err: RenderError) -> OrbitcapError {
    OrbitcapError::RenderError(format!("failed to {action}: {err}"))
}

/// Loads a splat PLY and captures the full orbit on a headless GPU.
///
/// Options are checked and the scene is loaded before any GPU work.
pub fn capture_orbit(ply: impl AsRef<Path>, options: CaptureOptions) -> Result<CaptureSummary> {
    let ply = ply.as_ref();
    let driver = CaptureDriver::new(options)?;
    let scene = GaussianScene::load_ply(ply).map_err(|e| OrbitcapError::SceneLoadError {
        path: ply.to_path_buf(),
        reason: e.to_string(),
    })?;
    run_headless(&scene, driver)
}

/// Captures the full orbit of an in-memory scene on a headless GPU.
pub fn capture_scene(scene: &GaussianScene, options: CaptureOptions) -> Result<CaptureSummary> {
    run_headless(scene, CaptureDriver::new(options)?)
}

/// The GPU context lives for the duration of this call and is released on
/// every return path.
fn run_headless(scene: &GaussianScene, mut driver: CaptureDriver) -> Result<CaptureSummary> {
    let context = GpuContext::new_headless_blocking(&ContextOptions::default())
        .map_err(|e| OrbitcapError::ContextError(e.to_string()))?;
    let (width, height) = (driver.camera().width(), driver.camera().height());
    let mut engine = GaussianRenderEngine::new(&context, width, height)
        .map_err(|e| render_error("create render engine", e))?;

    driver.prepare(&mut engine, scene)?;
    driver.run(&mut engine)
}
