//! Splat pipeline and uniform layout.

use std::num::NonZeroU64;

use glam::{Mat4, Vec3};
use orbitcap_core::CameraState;

/// Color format of the offscreen render target.
pub const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// GPU representation of the splat uniforms.
///
/// Mirrors `SplatUniforms` in `gaussian_splat.wgsl` (176 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SplatUniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    /// `htan_x`, `htan_y`, focal, unused.
    pub fov_focal: [f32; 4],
    pub camera_pos: [f32; 4],
    pub render_mode: i32,
    pub sh_dim: u32,
    pub scale_modifier: f32,
    pub stride: u32,
}

impl Default for SplatUniforms {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY.to_cols_array_2d(),
            proj: Mat4::IDENTITY.to_cols_array_2d(),
            fov_focal: [1.0, 1.0, 1.0, 0.0],
            camera_pos: [0.0, 0.0, 0.0, 1.0],
            render_mode: 3,
            sh_dim: 3,
            scale_modifier: 1.0,
            stride: 14,
        }
    }
}

impl SplatUniforms {
    /// Refreshes projection and focal terms from `camera`.
    pub fn set_intrinsics(&mut self, camera: &CameraState) {
        let fov = camera.fov_focal();
        self.proj = camera.projection_matrix().to_cols_array_2d();
        self.fov_focal = [fov.htan_x, fov.htan_y, fov.focal, 0.0];
    }

    /// Refreshes the view matrix and eye position from `camera`.
    pub fn set_pose(&mut self, camera: &CameraState) {
        let eye: Vec3 = camera.position;
        self.view = camera.view_matrix().to_cols_array_2d();
        self.camera_pos = eye.extend(1.0).to_array();
    }
}

/// Creates the bind group layout: uniforms, splat records, draw order.
pub(crate) fn create_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("splat bind group layout"),
        entries: &[
            // Uniforms
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(
                        std::mem::size_of::<SplatUniforms>() as u64,
                    ),
                },
                count: None,
            },
            // Splat records
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: true },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            // Draw order
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: true },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
    })
}

/// Creates the splat render pipeline.
///
/// No depth attachment: splats are composited in sorted order with
/// straight alpha blending.
pub(crate) fn create_splat_pipeline(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("gaussian splat shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/gaussian_splat.wgsl").into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("splat pipeline layout"),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("gaussian splat pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: TARGET_FORMAT,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None, // Quads face the camera either way
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_size_matches_shader() {
        assert_eq!(std::mem::size_of::<SplatUniforms>(), 176);
        assert_eq!(std::mem::size_of::<SplatUniforms>() % 16, 0);
    }

    #[test]
    fn test_uniforms_follow_camera() {
        let mut camera = CameraState::new(200, 100);
        camera.position = Vec3::new(0.0, 0.0, 10.0);
        camera.target = Vec3::ZERO;
        camera.up = Vec3::Y;

        let mut uniforms = SplatUniforms::default();
        uniforms.set_intrinsics(&camera);
        uniforms.set_pose(&camera);

        assert_eq!(uniforms.camera_pos, [0.0, 0.0, 10.0, 1.0]);
        assert_eq!(uniforms.view, camera.view_matrix().to_cols_array_2d());
        let fov = camera.fov_focal();
        // Focal and half-tangents reproduce the target size
        assert!((2.0 * fov.htan_x * fov.focal - 200.0).abs() < 1e-2);
        assert!((2.0 * fov.htan_y * fov.focal - 100.0).abs() < 1e-2);
        assert_eq!(uniforms.fov_focal[2], fov.focal);
    }
}
