//! Captures a single frame.

use orbitcap_core::{CameraState, CaptureOptions, CaptureRequest, OrbitcapError, Result};
use orbitcap_render::{auto_level_file, save_image, SplatRenderer};

use crate::render_error;

/// Renders `request` and writes it to `request.output`.
///
/// The camera is moved to the request's orbit pose, pushed to the renderer
/// together with the dirty flags it raised, and the renderer re-sorts for the
/// new viewpoint before drawing. The readback is flipped to top-down rows if
/// needed and encoded as PNG. Depth requests then get their intensity range
/// stretched in place.
///
/// Any failure aborts the frame; nothing is retried.
pub fn capture_frame<R: SplatRenderer + ?Sized>(
    renderer: &mut R,
    camera: &mut CameraState,
    options: &CaptureOptions,
    request: &CaptureRequest,
) -> Result<()> {
    let (width, height) = (camera.width(), camera.height());
    log::info!(
        "Rendering {width} x {height} image at angle {} degrees",
        request.angle_degrees
    );

    let pose = options.orbit.pose_at(request.angle_degrees as f32);
    camera.apply_pose(&pose);

    let rebuild_intrinsics = camera.take_intrinsics_dirty();
    renderer
        .push_intrinsics(camera, rebuild_intrinsics)
        .map_err(|e| render_error("push intrinsics", e))?;
    let rebuild_pose = camera.take_pose_dirty();
    renderer
        .push_pose(camera, rebuild_pose)
        .map_err(|e| render_error("push pose", e))?;
    log::debug!(
        "camera at {:?} looking at {:?}, up {:?}",
        camera.position,
        camera.target,
        camera.up
    );

    renderer
        .resort(camera)
        .map_err(|e| render_error("sort splats", e))?;
    renderer
        .clear(request.mode.clear_color())
        .map_err(|e| render_error("clear frame", e))?;
    renderer
        .set_mode(options.render_modes.native_index(request.mode))
        .map_err(|e| render_error("set render mode", e))?;
    renderer.draw().map_err(|e| render_error("draw", e))?;

    let frame = renderer
        .read_pixels(width, height)
        .map_err(|e| render_error("read pixels", e))?;
    if (frame.width(), frame.height()) != (width, height) {
        return Err(OrbitcapError::RenderError(format!(
            "renderer returned a {}x{} frame for a {width}x{height} camera",
            frame.width(),
            frame.height()
        )));
    }
    let frame = frame.into_top_down();

    save_image(&request.output, &frame).map_err(|e| OrbitcapError::ImageError {
        path: request.output.clone(),
        reason: e.to_string(),
    })?;

    if request.post_process_depth {
        let stats = auto_level_file(&request.output, options.depth_uniform_fill).map_err(|e| {
            OrbitcapError::ImageError {
                path: request.output.clone(),
                reason: e.to_string(),
            }
        })?;
        log::debug!(
            "depth levels for {}: {:.3}..{:.3}",
            request.output.display(),
            stats.min,
            stats.max
        );
    }

    Ok(())
}
