//! Smooth curves (density estimates) as a single triangle strip mesh.

#![allow(clippy::too_many_arguments)]

use super::common::PlotArea;
use crate::core::Style;
use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_camera::visibility::RenderLayers;
use bevy_mesh::{Indices, PrimitiveTopology};

/// Vertices and triangle indices of a polyline of constant width.
///
/// Each point gets two vertices offset along the averaged normal of its
/// neighbouring segments, so joints stay closed without extra geometry.
pub fn polyline_strip(points: &[Vec2], width: f32) -> (Vec<[f32; 3]>, Vec<u32>) {
    let n = points.len();
    if n < 2 {
        return (Vec::new(), Vec::new());
    }
    let half = width * 0.5;

    let segment_normal = |a: Vec2, b: Vec2| {
        let d = (b - a).normalize_or_zero();
        Vec2::new(-d.y, d.x)
    };

    let mut positions = Vec::with_capacity(n * 2);
    for i in 0..n {
        let prev = if i > 0 {
            segment_normal(points[i - 1], points[i])
        } else {
            Vec2::ZERO
        };
        let next = if i + 1 < n {
            segment_normal(points[i], points[i + 1])
        } else {
            Vec2::ZERO
        };
        let mut normal = (prev + next).normalize_or_zero();
        if normal == Vec2::ZERO {
            normal = if next != Vec2::ZERO { next } else { prev };
        }
        // Keep the stroke width on sharp joints, capped against spikes.
        let cos = normal.dot(if next != Vec2::ZERO { next } else { prev });
        let miter = if cos > 0.25 { half / cos } else { half * 4.0 };

        let p = points[i];
        positions.push([p.x + normal.x * miter, p.y + normal.y * miter, 0.0]);
        positions.push([p.x - normal.x * miter, p.y - normal.y * miter, 0.0]);
    }

    let mut indices = Vec::with_capacity((n - 1) * 6);
    for i in 0..(n - 1) as u32 {
        let (l0, r0, l1, r1) = (2 * i, 2 * i + 1, 2 * i + 2, 2 * i + 3);
        indices.extend_from_slice(&[l0, r0, r1]);
        indices.extend_from_slice(&[l0, r1, l1]);
    }
    (positions, indices)
}

pub fn draw_curve(
    commands: &mut Commands,
    root: Entity,
    xy: &[[f32; 2]],
    style: &Style,
    area: &PlotArea,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
    z: f32,
    layers: &RenderLayers,
) {
    let points: Vec<Vec2> = xy
        .iter()
        .filter(|p| p[0].is_finite() && p[1].is_finite())
        .map(|&p| area.point(p))
        .collect();

    let (positions, indices) = polyline_strip(&points, style.size);
    if indices.is_empty() {
        return;
    }

    let vertex_count = positions.len();
    let normals: Vec<[f32; 3]> = vec![[0.0, 0.0, 1.0]; vertex_count];
    let uvs: Vec<[f32; 2]> = vec![[0.0, 0.0]; vertex_count];

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));

    let curve_mesh = meshes.add(mesh);
    let curve_mat = materials.add(ColorMaterial::from(Color::from(style.resolved())));

    commands.entity(root).with_children(|parent| {
        parent.spawn((
            Mesh2d(curve_mesh),
            MeshMaterial2d(curve_mat),
            Transform::from_translation(Vec3::new(0.0, 0.0, z)),
            layers.clone(),
        ));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn straight_line_has_constant_width() {
        let pts = [Vec2::new(0.0, 0.0), Vec2::new(5.0, 0.0), Vec2::new(10.0, 0.0)];
        let (pos, idx) = polyline_strip(&pts, 2.0);
        assert_eq!(pos.len(), 6);
        assert_eq!(idx.len(), 12);
        for pair in pos.chunks(2) {
            assert_relative_eq!(pair[0][1], 1.0, epsilon = 1e-6);
            assert_relative_eq!(pair[1][1], -1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn joint_is_mitred() {
        let pts = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(2.0, 0.0)];
        let (pos, _) = polyline_strip(&pts, 2.0);
        // Apex vertices sit straight above and below the joint.
        assert_relative_eq!(pos[2][0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(pos[3][0], 1.0, epsilon = 1e-6);
        let offset = pos[2][1] - 1.0;
        assert_relative_eq!(offset, std::f32::consts::SQRT_2, epsilon = 1e-5);
    }

    #[test]
    fn degenerate_inputs_produce_nothing() {
        assert!(polyline_strip(&[], 1.0).1.is_empty());
        assert!(polyline_strip(&[Vec2::ONE], 1.0).1.is_empty());
    }

    #[test]
    fn indices_stay_in_range() {
        let pts: Vec<Vec2> = (0..20)
            .map(|i| Vec2::new(i as f32, (i as f32 * 0.7).sin()))
            .collect();
        let (pos, idx) = polyline_strip(&pts, 1.5);
        assert!(idx.iter().all(|&i| (i as usize) < pos.len()));
    }
}
