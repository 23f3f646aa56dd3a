//! Markers drawn over the data: vertical lines, shaded zones and the legend.

#![allow(clippy::too_many_arguments)]

use super::common::{PlotArea, TEXT_COLOR, estimate_text_width, spawn_rect, spawn_segment, spawn_text};
use crate::core::{LineKind, Style};
use crate::render::UnitMeshes;
use bevy::prelude::*;
use bevy_camera::visibility::RenderLayers;

const DASH: f32 = 4.0;
const GAP: f32 = 3.0;
const LEGEND_FONT: f32 = 10.0;

/// `(start, end)` pieces of a dashed run from `from` to `to`.
pub fn dash_segments(from: f32, to: f32, dash: f32, gap: f32) -> Vec<(f32, f32)> {
    let mut out = Vec::new();
    if to <= from || dash <= 0.0 {
        return out;
    }
    let mut pos = from;
    while pos < to {
        let end = (pos + dash).min(to);
        out.push((pos, end));
        pos = end + gap.max(0.0);
    }
    out
}

pub fn draw_vline(
    commands: &mut Commands,
    root: Entity,
    x: f32,
    style: &Style,
    area: &PlotArea,
    unit: &UnitMeshes,
    materials: &mut Assets<ColorMaterial>,
    z: f32,
    layers: &RenderLayers,
) {
    let wx = area.x(x);
    if !wx.is_finite() || !area.contains_x(wx) {
        return;
    }
    let mat = materials.add(ColorMaterial::from(Color::from(style.resolved())));
    let width = style.size.max(1.0);

    match style.line {
        LineKind::Solid => spawn_rect(
            commands,
            root,
            unit,
            &mat,
            Vec2::new(wx, area.bottom() + area.size.y * 0.5),
            Vec2::new(width, area.size.y),
            z,
            layers,
        ),
        LineKind::Dashed => {
            for (a, b) in dash_segments(area.bottom(), area.top(), DASH, GAP) {
                spawn_rect(
                    commands,
                    root,
                    unit,
                    &mat,
                    Vec2::new(wx, (a + b) * 0.5),
                    Vec2::new(width, b - a),
                    z,
                    layers,
                );
            }
        }
    }
}

/// Shaded rectangle from the x axis up to `height_fraction` of the axis top.
pub fn draw_zone(
    commands: &mut Commands,
    root: Entity,
    x_start: Option<f32>,
    x_end: f32,
    height_fraction: f32,
    style: &Style,
    area: &PlotArea,
    unit: &UnitMeshes,
    materials: &mut Assets<ColorMaterial>,
    z: f32,
    layers: &RenderLayers,
) {
    let left = x_start.map_or(area.left(), |x| area.x(x)).max(area.left());
    let right = area.x(x_end).min(area.right());
    if right <= left || !right.is_finite() {
        return;
    }
    let top = area.y(area.y_range[1] * height_fraction);
    let min = Vec2::new(left, area.bottom());
    let max = Vec2::new(right, top);

    let mat = materials.add(ColorMaterial::from(Color::from(style.resolved())));
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
}

/// Legend box in the upper right corner of the plot area.
pub fn draw_legend(
    commands: &mut Commands,
    root: Entity,
    entries: &[(&str, Style)],
    area: &PlotArea,
    unit: &UnitMeshes,
    materials: &mut Assets<ColorMaterial>,
    layers: &RenderLayers,
) {
    if entries.is_empty() {
        return;
    }
    let swatch = 18.0;
    let row = 14.0;
    let pad = 6.0;
    let text_width = entries
        .iter()
        .map(|(label, _)| estimate_text_width(label, LEGEND_FONT))
        .fold(0.0f32, f32::max);
    let size = Vec2::new(
        pad * 3.0 + swatch + text_width,
        pad * 2.0 + row * entries.len() as f32,
    );
    let max = Vec2::new(area.right() - 4.0, area.top() - 4.0);
    let min = max - size;

    let bg = materials.add(ColorMaterial::from(Color::srgba(1.0, 1.0, 1.0, 0.85)));
    spawn_rect(commands, root, unit, &bg, (min + max) * 0.5, size, 3.0, layers);

    for (i, (label, style)) in entries.iter().enumerate() {
        let y = max.y - pad - row * (i as f32 + 0.5);
        let x0 = min.x + pad;
        let mat = materials.add(ColorMaterial::from(Color::from(style.resolved())));
        let width = style.size.clamp(1.0, 6.0);

        match style.line {
            LineKind::Solid => spawn_segment(
                commands,
                root,
                unit,
                &mat,
                Vec2::new(x0, y),
                Vec2::new(x0 + swatch, y),
                width,
                3.1,
                layers,
            ),
            LineKind::Dashed => {
                for (a, b) in dash_segments(x0, x0 + swatch, DASH, GAP) {
                    spawn_segment(
                        commands,
                        root,
                        unit,
                        &mat,
                        Vec2::new(a, y),
                        Vec2::new(b, y),
                        width,
                        3.1,
                        layers,
                    );
                }
            }
        }

        let text_x = x0 + swatch + pad + estimate_text_width(label, LEGEND_FONT) * 0.5;
        spawn_text(
            commands,
            root,
            label.to_string(),
            LEGEND_FONT,
            TEXT_COLOR,
            Vec2::new(text_x, y),
            0.0,
            layers,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashes_cover_the_run() {
        let d = dash_segments(0.0, 10.0, 4.0, 3.0);
        assert_eq!(d, vec![(0.0, 4.0), (7.0, 10.0)]);
    }

    #[test]
    fn last_dash_is_truncated() {
        let d = dash_segments(0.0, 16.0, 4.0, 3.0);
        assert_eq!(d.last(), Some(&(14.0, 16.0)));
    }

    #[test]
    fn empty_runs_have_no_dashes() {
        assert!(dash_segments(5.0, 5.0, 4.0, 3.0).is_empty());
        assert!(dash_segments(0.0, 5.0, 0.0, 3.0).is_empty());
    }
}
