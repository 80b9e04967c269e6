//! Process-lifetime GPU context.

use pollster::FutureExt;

use crate::error::{RenderError, RenderResult};

/// How to pick the GPU.
#[derive(Debug, Clone)]
pub struct ContextOptions {
    /// Graphics APIs to consider.
    pub backends: wgpu::Backends,
    /// Adapter preference.
    pub power_preference: wgpu::PowerPreference,
    /// Use a software adapter even when hardware is available.
    pub force_fallback_adapter: bool,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
        }
    }
}

/// Owns the wgpu device and queue for a whole capture run.
///
/// Acquired once before any capture and released when dropped, on normal
/// completion and on every error path alike. Renderers borrow it, so none
/// can outlive it.
pub struct GpuContext {
    /// The wgpu logical device.
    pub device: wgpu::Device,
    /// The wgpu command queue.
    pub queue: wgpu::Queue,
    adapter_info: wgpu::AdapterInfo,
    max_storage_binding: u64,
}

impl GpuContext {
    /// Creates a headless context.
    pub async fn new_headless(options: &ContextOptions) -> RenderResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: options.backends,
            ..wgpu::InstanceDescriptor::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: options.power_preference,
                compatible_surface: None,
                force_fallback_adapter: options.force_fallback_adapter,
            })
            .await
            .map_err(|_| RenderError::AdapterCreationFailed)?;

        // Large scenes need the adapter's full storage buffer size
        let limits = adapter.limits();
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("orbitcap device (headless)"),
                required_features: wgpu::Features::empty(),
                required_limits: limits.clone(),
                ..Default::default()
            })
            .await?;

        let adapter_info = adapter.get_info();
        log::info!(
            "acquired GPU context: {} ({:?})",
            adapter_info.name,
            adapter_info.backend
        );

        Ok(Self {
            device,
            queue,
            adapter_info,
            max_storage_binding: u64::from(limits.max_storage_buffer_binding_size),
        })
    }

    /// Blocking wrapper around [`GpuContext::new_headless`].
    pub fn new_headless_blocking(options: &ContextOptions) -> RenderResult<Self> {
        Self::new_headless(options).block_on()
    }

    /// Information about the selected adapter.
    #[must_use]
    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    /// Largest storage buffer binding the device accepts, in bytes.
    #[must_use]
    pub fn max_storage_binding(&self) -> u64 {
        self.max_storage_binding
    }

    /// Blocks until all submitted GPU work has finished.
    pub fn wait_idle(&self) -> RenderResult<()> {
        let _ = self.device.poll(wgpu::PollType::wait_indefinitely())?;
        Ok(())
    }
}

impl Drop for GpuContext {
    fn drop(&mut self) {
        if let Err(e) = self.wait_idle() {
            log::warn!("GPU did not go idle before context release: {e}");
        }
        log::info!("released GPU context: {}", self.adapter_info.name);
    }
}
