//! Rendering backend for orbitcap.
//!
//! This crate provides:
//! - Gaussian splat scenes and PLY loading
//! - The [`SplatRenderer`] interface and its wgpu implementation
//! - Host-side frames, image writing and depth auto-levels

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Splat counts and image sizes move between usize, u32 and f32
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

pub mod context;
pub mod depth_levels;
pub mod engine;
pub mod error;
pub mod framebuffer;
pub mod gaussian;
pub mod renderer;
pub mod screenshot;
pub mod sort;

pub use context::{ContextOptions, GpuContext};
pub use depth_levels::{auto_level_file, luminance, stretch_levels, LevelStats, LUMA_WEIGHTS};
pub use engine::{check_target_size, GaussianRenderEngine, SplatUniforms};
pub use error::{RenderError, RenderResult};
pub use framebuffer::{Framebuffer, RowOrigin};
pub use gaussian::GaussianScene;
pub use renderer::{NativeRenderMode, SplatRenderer};
pub use screenshot::{save_image, ScreenshotError};
pub use sort::back_to_front;
