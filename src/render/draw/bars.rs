//! Count bars and density histograms.

#![allow(clippy::too_many_arguments)]

use super::common::{PlotArea, spawn_outline, spawn_rect};
use crate::core::Style;
use crate::render::UnitMeshes;
use bevy::prelude::*;
use bevy_camera::visibility::RenderLayers;

/// One bar per slot, centered on `x = i`.
pub fn draw_bars(
    commands: &mut Commands,
    root: Entity,
    heights: &[f32],
    colors: &[crate::core::Color],
    edge: Option<&Style>,
    width: f32,
    area: &PlotArea,
    unit: &UnitMeshes,
    materials: &mut Assets<ColorMaterial>,
    z: f32,
    layers: &RenderLayers,
) {
    let edge_mat = edge.map(|s| materials.add(ColorMaterial::from(Color::from(s.resolved()))));
    let fallback = crate::core::Color::BLACK;

    for (i, &h) in heights.iter().enumerate() {
        if h <= 0.0 || !h.is_finite() {
            continue;
        }
        let x = i as f32;
        let min = Vec2::new(area.x(x - width * 0.5), area.y(0.0));
        let max = Vec2::new(area.x(x + width * 0.5), area.y(h));
        let color = colors.get(i).copied().unwrap_or(fallback);
        let mat = materials.add(ColorMaterial::from(Color::from(color)));

        spawn_rect(
            commands,
            root,
            unit,
            &mat,
            (min + max) * 0.5,
            max - min,
            z,
            layers,
        );
        if let (Some(mat), Some(style)) = (&edge_mat, edge) {
            spawn_outline(
                commands,
                root,
                unit,
                mat,
                min,
                max,
                style.size.max(0.5),
                z + 0.01,
                layers,
            );
        }
    }
}

/// Bars spanning `edges[i]..edges[i + 1]` with heights `heights[i]`.
pub fn draw_histogram(
    commands: &mut Commands,
    root: Entity,
    edges: &[f32],
    heights: &[f32],
    style: &Style,
    edge: Option<&Style>,
    area: &PlotArea,
    unit: &UnitMeshes,
    materials: &mut Assets<ColorMaterial>,
    z: f32,
    layers: &RenderLayers,
) {
    let fill = materials.add(ColorMaterial::from(Color::from(style.resolved())));
    let edge_mat = edge.map(|s| materials.add(ColorMaterial::from(Color::from(s.resolved()))));

    for (bin, &h) in edges.windows(2).zip(heights) {
        if h <= 0.0 || !h.is_finite() {
            continue;
        }
        let min = Vec2::new(area.x(bin[0]), area.y(0.0));
        let max = Vec2::new(area.x(bin[1]), area.y(h));

        spawn_rect(
            commands,
            root,
            unit,
            &fill,
            (min + max) * 0.5,
            max - min,
            z,
            layers,
        );
        if let (Some(mat), Some(style)) = (&edge_mat, edge) {
            spawn_outline(
                commands,
                root,
                unit,
                mat,
                min,
                max,
                style.size.max(0.5),
                z + 0.01,
                layers,
            );
        }
    }
}
