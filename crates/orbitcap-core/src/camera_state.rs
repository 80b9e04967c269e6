//! Camera state shared between the capture driver and the renderer.

use glam::{Mat4, Vec3};

/// A camera pose: where the camera is, what it looks at and how it is rolled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Up vector (unit length).
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
}

/// Precomputed quantities used by splat projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FovFocal {
    /// Tangent of half the horizontal field of view.
    pub htan_x: f32,
    /// Tangent of half the vertical field of view.
    pub htan_y: f32,
    /// Focal length in pixels.
    pub focal: f32,
}

/// The camera used for a capture run.
///
/// The image size is fixed at construction. Everything else is mutated
/// through [`CameraState::apply_pose`], which raises the dirty flags that
/// tell a renderer its cached projection/view matrices are stale.
#[derive(Debug, Clone)]
pub struct CameraState {
    width: u32,
    height: u32,
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Up vector.
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    intrinsics_dirty: bool,
    pose_dirty: bool,
}

impl CameraState {
    /// Creates a camera with the given image size.
    ///
    /// Both dirty flags start raised so the first push always rebuilds.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            position: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::NEG_Y,
            fov_y: std::f32::consts::FRAC_PI_2,
            near: 0.01,
            far: 100.0,
            intrinsics_dirty: true,
            pose_dirty: true,
        }
    }

    /// Sets the clipping planes and marks the intrinsics dirty.
    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.near = near.max(0.001);
        self.far = far.max(self.near + 0.1);
        self.intrinsics_dirty = true;
    }

    /// Image width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width / height.
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Applies a pose and raises both dirty flags.
    pub fn apply_pose(&mut self, pose: &CameraPose) {
        self.position = pose.position;
        self.target = pose.target;
        self.up = pose.up;
        self.fov_y = pose.fov_y;
        self.intrinsics_dirty = true;
        self.pose_dirty = true;
    }

    /// Returns the current pose.
    #[must_use]
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position,
            target: self.target,
            up: self.up,
            fov_y: self.fov_y,
        }
    }

    /// Whether the intrinsics changed since they were last taken.
    #[must_use]
    pub fn is_intrinsics_dirty(&self) -> bool {
        self.intrinsics_dirty
    }

    /// Whether the pose changed since it was last taken.
    #[must_use]
    pub fn is_pose_dirty(&self) -> bool {
        self.pose_dirty
    }

    /// Returns the intrinsics flag and clears it.
    pub fn take_intrinsics_dirty(&mut self) -> bool {
        std::mem::take(&mut self.intrinsics_dirty)
    }

    /// Returns the pose flag and clears it.
    pub fn take_pose_dirty(&mut self) -> bool {
        std::mem::take(&mut self.pose_dirty)
    }

    /// Returns the view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Returns the projection matrix (depth range 0..1).
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio(), self.near, self.far)
    }

    /// Returns the half-angle tangents and the focal length in pixels.
    #[must_use]
    pub fn fov_focal(&self) -> FovFocal {
        let htan_y = (self.fov_y * 0.5).tan();
        let htan_x = htan_y / self.height as f32 * self.width as f32;
        let focal = self.height as f32 / (2.0 * htan_y);
        FovFocal {
            htan_x,
            htan_y,
            focal,
        }
    }
}
