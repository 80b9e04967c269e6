//! Gaussian splat scene data and PLY loading.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use glam::{Quat, Vec3};
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::{RenderError, RenderResult};

/// Zeroth-order spherical harmonics constant.
pub const SH_C0: f32 = 0.282_094_8;

/// Floats per splat before the SH coefficients: position (3), rotation (4),
/// scale (3), opacity (1).
pub const SPLAT_HEADER_FLOATS: usize = 11;

/// A scene of 3D Gaussians with activated parameters.
///
/// Rotations are unit quaternions, scales are positive extents, opacities lie
/// in 0..1. SH coefficients are stored per splat as `sh_dim` floats, one RGB
/// triple per coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianScene {
    positions: Vec<Vec3>,
    rotations: Vec<Quat>,
    scales: Vec<Vec3>,
    opacities: Vec<f32>,
    sh: Vec<f32>,
    sh_dim: usize,
}

impl GaussianScene {
    /// Builds a scene, checking that every attribute has one entry per splat.
    pub fn new(
        positions: Vec<Vec3>,
        rotations: Vec<Quat>,
        scales: Vec<Vec3>,
        opacities: Vec<f32>,
        sh: Vec<f32>,
        sh_dim: usize,
    ) -> RenderResult<Self> {
        if !matches!(sh_dim, 3 | 12 | 27 | 48) {
            return Err(RenderError::InvalidScene(format!(
                "SH dimension {sh_dim} is not one of 3, 12, 27, 48"
            )));
        }
        let n = positions.len();
        if rotations.len() != n || scales.len() != n || opacities.len() != n {
            return Err(RenderError::InvalidScene(format!(
                "attribute counts differ: {n} positions, {} rotations, {} scales, {} opacities",
                rotations.len(),
                scales.len(),
                opacities.len()
            )));
        }
        if sh.len() != n * sh_dim {
            return Err(RenderError::SizeMismatch {
                expected: n * sh_dim,
                actual: sh.len(),
            });
        }
        Ok(Self {
            positions,
            rotations,
            scales,
            opacities,
            sh,
            sh_dim,
        })
    }

    /// Four splats: a small magenta one at the origin and one elongated splat
    /// along each axis, colored red, green and blue.
    #[must_use]
    pub fn naive() -> Self {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z];
        let rotations = vec![Quat::IDENTITY; 4];
        let scales = vec![
            Vec3::splat(0.03),
            Vec3::new(0.2, 0.03, 0.03),
            Vec3::new(0.03, 0.2, 0.03),
            Vec3::new(0.03, 0.03, 0.2),
        ];
        let colors: [[f32; 3]; 4] = [
            [1.0, 0.0, 1.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ];
        let sh = colors
            .into_iter()
            .flat_map(|rgb| rgb.map(|c| (c - 0.5) / SH_C0))
            .collect();
        Self {
            positions,
            rotations,
            scales,
            opacities: vec![1.0; 4],
            sh,
            sh_dim: 3,
        }
    }

    /// Number of splats.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True when the scene has no splats.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Splat centers.
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Activated opacities.
    #[must_use]
    pub fn opacities(&self) -> &[f32] {
        &self.opacities
    }

    /// Floats of SH data per splat (3, 12, 27 or 48).
    #[must_use]
    pub fn sh_dim(&self) -> usize {
        self.sh_dim
    }

    /// Highest SH degree present (0 to 3).
    #[must_use]
    pub fn sh_degree(&self) -> u32 {
        match self.sh_dim {
            3 => 0,
            12 => 1,
            27 => 2,
            _ => 3,
        }
    }

    /// Floats per splat in [`GaussianScene::flatten`].
    #[must_use]
    pub fn stride(&self) -> usize {
        SPLAT_HEADER_FLOATS + self.sh_dim
    }

    /// Packs the scene for GPU upload.
    ///
    /// Per splat: `x y z`, rotation `w x y z`, `sx sy sz`, opacity, then the
    /// SH coefficients.
    #[must_use]
    pub fn flatten(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.len() * self.stride());
        for i in 0..self.len() {
            let p = self.positions[i];
            let q = self.rotations[i];
            let s = self.scales[i];
            data.extend_from_slice(&[p.x, p.y, p.z, q.w, q.x, q.y, q.z, s.x, s.y, s.z]);
            data.push(self.opacities[i]);
            data.extend_from_slice(&self.sh[i * self.sh_dim..(i + 1) * self.sh_dim]);
        }
        data
    }

    /// Loads a 3D Gaussian Splatting PLY file.
    ///
    /// Expects a `vertex` element with `x y z`, `f_dc_0..2`, optional
    /// `f_rest_*` (0, 9, 24 or 45 of them), `opacity`, `scale_0..2` and
    /// `rot_0..3`. Opacities go through a sigmoid, scales through `exp`, and
    /// rotations are normalized.
    pub fn load_ply(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        let parser = Parser::<DefaultElement>::new();
        let ply = parser
            .read_ply(&mut reader)
            .map_err(|e| RenderError::InvalidScene(format!("failed to parse PLY: {e}")))?;

        let vertex_def = ply
            .header
            .elements
            .get("vertex")
            .ok_or_else(|| RenderError::InvalidScene("missing 'vertex' element".into()))?;
        let rest_count = vertex_def
            .properties
            .keys()
            .filter(|name| name.starts_with("f_rest_"))
            .count();
        if !matches!(rest_count, 0 | 9 | 24 | 45) {
            return Err(RenderError::InvalidScene(format!(
                "unexpected number of f_rest properties: {rest_count}"
            )));
        }
        let rest_per_channel = rest_count / 3;
        let sh_dim = 3 + rest_count;

        let vertices = ply
            .payload
            .get("vertex")
            .ok_or_else(|| RenderError::InvalidScene("missing 'vertex' payload".into()))?;
        if vertices.is_empty() {
            return Err(RenderError::EmptyScene);
        }

        let n = vertices.len();
        let mut positions = Vec::with_capacity(n);
        let mut rotations = Vec::with_capacity(n);
        let mut scales = Vec::with_capacity(n);
        let mut opacities = Vec::with_capacity(n);
        let mut sh = Vec::with_capacity(n * sh_dim);

        for v in vertices {
            positions.push(Vec3::new(scalar(v, "x")?, scalar(v, "y")?, scalar(v, "z")?));

            let q = Quat::from_xyzw(
                scalar(v, "rot_1")?,
                scalar(v, "rot_2")?,
                scalar(v, "rot_3")?,
                scalar(v, "rot_0")?,
            );
            rotations.push(if q.length_squared() > f32::EPSILON {
                q.normalize()
            } else {
                Quat::IDENTITY
            });

            scales.push(Vec3::new(
                scalar(v, "scale_0")?.exp(),
                scalar(v, "scale_1")?.exp(),
                scalar(v, "scale_2")?.exp(),
            ));
            opacities.push(sigmoid(scalar(v, "opacity")?));

            for c in 0..3 {
                sh.push(scalar(v, &format!("f_dc_{c}"))?);
            }
            // f_rest is stored channel-major; regroup as one RGB triple per coefficient
            for k in 0..rest_per_channel {
                for c in 0..3 {
                    sh.push(scalar(v, &format!("f_rest_{}", c * rest_per_channel + k))?);
                }
            }
        }

        let scene = Self::new(positions, rotations, scales, opacities, sh, sh_dim)?;
        log::info!(
            "loaded {n} splats (SH degree {}) from {}",
            scene.sh_degree(),
            path.display()
        );
        Ok(scene)
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Reads a numeric scalar property as `f32`.
fn scalar(element: &DefaultElement, name: &str) -> RenderResult<f32> {
    match element.get(name) {
        Some(Property::Float(v)) => Ok(*v),
        Some(Property::Double(v)) => Ok(*v as f32),
        Some(Property::Char(v)) => Ok(f32::from(*v)),
        Some(Property::UChar(v)) => Ok(f32::from(*v)),
        Some(Property::Short(v)) => Ok(f32::from(*v)),
        Some(Property::UShort(v)) => Ok(f32::from(*v)),
        Some(Property::Int(v)) => Ok(*v as f32),
        Some(Property::UInt(v)) => Ok(*v as f32),
        Some(_) => Err(RenderError::InvalidScene(format!(
            "property '{name}' is a list, expected a scalar"
        ))),
        None => Err(RenderError::InvalidScene(format!(
            "missing vertex property '{name}'"
        ))),
    }
}
