//! Offscreen wgpu Gaussian splat renderer.

mod pipeline;
mod readback;

pub use pipeline::{SplatUniforms, TARGET_FORMAT};
pub use readback::aligned_bytes_per_row;

use glam::{Vec3, Vec4};
use orbitcap_core::CameraState;
use wgpu::util::DeviceExt;

use crate::context::GpuContext;
use crate::error::{RenderError, RenderResult};
use crate::framebuffer::Framebuffer;
use crate::gaussian::GaussianScene;
use crate::renderer::{NativeRenderMode, SplatRenderer};
use crate::sort::back_to_front;

/// Checks that a `width × height` target and its readback buffer fit within
/// `limits`.
pub fn check_target_size(width: u32, height: u32, limits: &wgpu::Limits) -> RenderResult<()> {
    let max_dim = limits.max_texture_dimension_2d;
    if width == 0 || height == 0 || width > max_dim || height > max_dim {
        return Err(RenderError::InvalidTargetSize { width, height });
    }
    let align = u64::from(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);
    let readback_bytes = (u64::from(width) * 4).div_ceil(align) * align * u64::from(height);
    if readback_bytes > limits.max_buffer_size {
        return Err(RenderError::InvalidTargetSize { width, height });
    }
    Ok(())
}

/// GPU buffers for an uploaded scene.
struct SceneBuffers {
    positions: Vec<Vec3>,
    order_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    count: u32,
    // Kept alive for the bind group
    _splat_buffer: wgpu::Buffer,
}

/// Renders a [`GaussianScene`] into a fixed-size offscreen target.
///
/// Borrows the process [`GpuContext`], so it cannot outlive it.
pub struct GaussianRenderEngine<'ctx> {
    context: &'ctx GpuContext,
    width: u32,
    height: u32,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    target: wgpu::Texture,
    target_view: wgpu::TextureView,
    readback_buffer: wgpu::Buffer,
    scene: Option<SceneBuffers>,
    uniforms: SplatUniforms,
    pending_clear: Option<Vec4>,
}

impl<'ctx> GaussianRenderEngine<'ctx> {
    /// Creates an engine rendering `width × height` frames.
    pub fn new(context: &'ctx GpuContext, width: u32, height: u32) -> RenderResult<Self> {
        check_target_size(width, height, &context.device.limits())?;
        let device = &context.device;

        let bind_group_layout = pipeline::create_bind_group_layout(device);
        let pipeline = pipeline::create_splat_pipeline(device, &bind_group_layout);

        let uniforms = SplatUniforms::default();
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("splat uniforms"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("splat render target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let target_view = target.create_view(&wgpu::TextureViewDescriptor::default());

        let readback_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("splat readback buffer"),
            size: u64::from(aligned_bytes_per_row(width)) * u64::from(height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        log::debug!("created splat render target {width}x{height}");

        Ok(Self {
            context,
            width,
            height,
            pipeline,
            bind_group_layout,
            uniform_buffer,
            target,
            target_view,
            readback_buffer,
            scene: None,
            uniforms,
            pending_clear: None,
        })
    }

    fn loaded_scene(&self) -> RenderResult<&SceneBuffers> {
        self.scene.as_ref().ok_or(RenderError::SceneNotLoaded)
    }
}

impl SplatRenderer for GaussianRenderEngine<'_> {
    fn update_scene(&mut self, scene: &GaussianScene) -> RenderResult<()> {
        if scene.is_empty() {
            return Err(RenderError::EmptyScene);
        }
        let data = scene.flatten();
        let required = std::mem::size_of_val(data.as_slice()) as u64;
        let limit = self.context.max_storage_binding();
        if required > limit {
            return Err(RenderError::SceneTooLarge { required, limit });
        }
        let count = u32::try_from(scene.len()).map_err(|_| RenderError::SceneTooLarge {
            required,
            limit,
        })?;

        let device = &self.context.device;
        let splat_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("splat records"),
            contents: bytemuck::cast_slice(&data),
            usage: wgpu::BufferUsages::STORAGE,
        });
        let order: Vec<u32> = (0..count).collect();
        let order_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("splat draw order"),
            contents: bytemuck::cast_slice(&order),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("splat bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: splat_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: order_buffer.as_entire_binding(),
                },
            ],
        });

        self.uniforms.sh_dim = scene.sh_dim() as u32;
        self.uniforms.stride = scene.stride() as u32;
        self.scene = Some(SceneBuffers {
            positions: scene.positions().to_vec(),
            order_buffer,
            bind_group,
            count,
            _splat_buffer: splat_buffer,
        });

        log::info!(
            "uploaded {} splats ({} bytes, SH degree {})",
            scene.len(),
            required,
            scene.sh_degree()
        );
        Ok(())
    }

    fn set_scale_modifier(&mut self, modifier: f32) -> RenderResult<()> {
        self.uniforms.scale_modifier = modifier;
        Ok(())
    }

    fn push_intrinsics(&mut self, camera: &CameraState, rebuild: bool) -> RenderResult<()> {
        if rebuild {
            self.uniforms.set_intrinsics(camera);
        }
        Ok(())
    }

    fn push_pose(&mut self, camera: &CameraState, rebuild: bool) -> RenderResult<()> {
        if rebuild {
            self.uniforms.set_pose(camera);
        }
        Ok(())
    }

    fn resort(&mut self, camera: &CameraState) -> RenderResult<()> {
        let scene = self.loaded_scene()?;
        let order = back_to_front(&scene.positions, &camera.view_matrix());
        self.context
            .queue
            .write_buffer(&scene.order_buffer, 0, bytemuck::cast_slice(&order));
        Ok(())
    }

    fn set_mode(&mut self, index: i32) -> RenderResult<()> {
        let mode = NativeRenderMode::from_index(index)?;
        self.uniforms.render_mode = mode.index();
        Ok(())
    }

    fn clear(&mut self, color: Vec4) -> RenderResult<()> {
        self.pending_clear = Some(color);
        Ok(())
    }

    fn draw(&mut self) -> RenderResult<()> {
        let scene = self.scene.as_ref().ok_or(RenderError::SceneNotLoaded)?;
        let queue = &self.context.queue;
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[self.uniforms]),
        );

        let load = match self.pending_clear.take() {
            Some(c) => wgpu::LoadOp::Clear(wgpu::Color {
                r: f64::from(c.x),
                g: f64::from(c.y),
                b: f64::from(c.z),
                a: f64::from(c.w),
            }),
            None => wgpu::LoadOp::Load,
        };

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("splat draw encoder"),
                });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("splat pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.target_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &scene.bind_group, &[]);
            render_pass.draw(0..6, 0..scene.count);
        }
        queue.submit(std::iter::once(encoder.finish()));

        // Frames must be complete before readback
        self.context.wait_idle()
    }

    fn read_pixels(&mut self, width: u32, height: u32) -> RenderResult<Framebuffer> {
        if (width, height) != (self.width, self.height) {
            return Err(RenderError::ReadbackSizeMismatch {
                requested_width: width,
                requested_height: height,
                width: self.width,
                height: self.height,
            });
        }
        readback::read_texture(
            &self.context.device,
            &self.context.queue,
            &self.target,
            &self.readback_buffer,
            width,
            height,
        )
    }
}
