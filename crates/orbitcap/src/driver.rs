//! Runs a full orbit of captures.

use std::path::PathBuf;

use orbitcap_core::{CameraState, CaptureOptions, CaptureRequest, RenderMode, Result};
use orbitcap_render::{GaussianScene, SplatRenderer};

use crate::frame_capture::capture_frame;
use crate::render_error;

/// Files written by a capture run, in write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureSummary {
    /// Every image written, color and depth interleaved per angle.
    pub files: Vec<PathBuf>,
}

impl CaptureSummary {
    /// Number of images written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True when nothing was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Drives the orbit: one color and one depth capture per angle.
///
/// Owns the run's [`CameraState`]; nothing else mutates it.
#[derive(Debug)]
pub struct CaptureDriver {
    options: CaptureOptions,
    camera: CameraState,
}

impl CaptureDriver {
    /// Validates `options` and sets up the camera.
    pub fn new(options: CaptureOptions) -> Result<Self> {
        options.validate()?;
        let mut camera = CameraState::new(options.width, options.height);
        camera.set_clip_planes(options.near, options.far);
        Ok(Self { options, camera })
    }

    /// Options for this run.
    #[must_use]
    pub fn options(&self) -> &CaptureOptions {
        &self.options
    }

    /// The run's camera.
    #[must_use]
    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    /// Uploads `scene` and primes the renderer with the orbit's first pose.
    pub fn prepare<R: SplatRenderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        scene: &GaussianScene,
    ) -> Result<()> {
        renderer
            .update_scene(scene)
            .map_err(|e| render_error("upload scene", e))?;
        renderer
            .set_scale_modifier(self.options.scale_modifier)
            .map_err(|e| render_error("set scale modifier", e))?;

        self.camera.apply_pose(&self.options.orbit.pose_at(0.0));
        let rebuild_intrinsics = self.camera.take_intrinsics_dirty();
        renderer
            .push_intrinsics(&self.camera, rebuild_intrinsics)
            .map_err(|e| render_error("push intrinsics", e))?;
        let rebuild_pose = self.camera.take_pose_dirty();
        renderer
            .push_pose(&self.camera, rebuild_pose)
            .map_err(|e| render_error("push pose", e))?;
        renderer
            .resort(&self.camera)
            .map_err(|e| render_error("sort splats", e))?;
        Ok(())
    }

    /// Captures every angle of the orbit, color first, then depth.
    ///
    /// The output directory is created if missing. The first failure ends
    /// the run.
    pub fn run<R: SplatRenderer + ?Sized>(&mut self, renderer: &mut R) -> Result<CaptureSummary> {
        std::fs::create_dir_all(&self.options.output_dir)?;
        log::info!(
            "capturing {} views into {}",
            self.options.orbit.angle_count() * RenderMode::ALL.len(),
            self.options.output_dir.display()
        );

        let mut summary = CaptureSummary::default();
        for angle in self.options.orbit.angles() {
            for mode in RenderMode::ALL {
                let request = CaptureRequest::new(&self.options.output_dir, angle, mode);
                capture_frame(renderer, &mut self.camera, &self.options, &request)?;
                summary.files.push(request.output);
            }
        }

        log::info!("wrote {} images", summary.len());
        Ok(summary)
    }
}
