//! Core types for orbitcap.
//!
//! This crate holds the renderer-independent parts of a capture run:
//! - [`CameraState`], the single mutable camera and its dirty flags
//! - [`OrbitParameters`], the fixed orbit and its pose generator
//! - [`CaptureRequest`] and [`RenderMode`], one frame to capture
//! - [`CaptureOptions`], run configuration

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Image sizes are converted to f32 for projection math
#![allow(clippy::cast_precision_loss)]

pub mod camera_state;
pub mod capture;
pub mod error;
pub mod options;
pub mod orbit;

pub use camera_state::{CameraPose, CameraState, FovFocal};
pub use capture::{CaptureRequest, RenderMode, RenderModeMap};
pub use error::{OrbitcapError, Result};
pub use options::CaptureOptions;
pub use orbit::OrbitParameters;

// Re-export glam types for convenience
pub use glam::{Mat4, Vec3, Vec4};
