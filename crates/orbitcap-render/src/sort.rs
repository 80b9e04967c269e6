//! View-dependent draw order for splats.

use glam::{Mat4, Vec3};

/// Splat indices ordered farthest-first for `view`.
///
/// View space looks down -Z, so the most negative depth is drawn first.
/// Ties keep their scene order, which keeps the result deterministic.
#[must_use]
pub fn back_to_front(positions: &[Vec3], view: &Mat4) -> Vec<u32> {
    let depths: Vec<f32> = positions
        .iter()
        .map(|&p| view.transform_point3(p).z)
        .collect();
    let mut order: Vec<u32> = (0..positions.len() as u32).collect();
    order.sort_by(|&a, &b| depths[a as usize].total_cmp(&depths[b as usize]));
    order
}
