//! Rendering error types.

use thiserror::Error;

/// Errors that can occur during rendering operations.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to create wgpu adapter.
    #[error("failed to create graphics adapter")]
    AdapterCreationFailed,

    /// Failed to create wgpu device.
    #[error("failed to create graphics device: {0}")]
    DeviceCreationFailed(#[from] wgpu::RequestDeviceError),

    /// Waiting on the GPU failed.
    #[error("failed waiting for GPU: {0}")]
    PollFailed(#[from] wgpu::PollError),

    /// Mapping the readback buffer failed.
    #[error("GPU buffer mapping failed")]
    BufferMapFailed,

    /// A draw or sort was requested before any scene was uploaded.
    #[error("no scene uploaded to the renderer")]
    SceneNotLoaded,

    /// The scene has no splats.
    #[error("scene contains no splats")]
    EmptyScene,

    /// The scene does not fit in a single GPU storage binding.
    #[error("scene needs {required} bytes of storage, device allows {limit}")]
    SceneTooLarge { required: u64, limit: u64 },

    /// The requested mode index is not one the renderer knows.
    #[error("unsupported render mode index {0}")]
    UnsupportedRenderMode(i32),

    /// The render target would have no pixels.
    #[error("render target size must be non-zero, got {width}x{height}")]
    InvalidTargetSize { width: u32, height: u32 },

    /// Readback size does not match the render target.
    #[error("readback of {requested_width}x{requested_height} from a {width}x{height} target")]
    ReadbackSizeMismatch {
        requested_width: u32,
        requested_height: u32,
        width: u32,
        height: u32,
    },

    /// Pixel data length does not match the declared size.
    #[error("pixel data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// The scene file is malformed.
    #[error("invalid scene data: {0}")]
    InvalidScene(String),

    /// I/O error while reading a scene.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
