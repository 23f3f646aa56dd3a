//! Common drawing utilities shared by all layer kinds.

#![allow(clippy::too_many_arguments)]

use crate::core::{Bounds, Panel, PlotMeta, XAxis};
use crate::render::{TileRect, UnitMeshes};
use bevy::prelude::*;
use bevy_camera::visibility::RenderLayers;

pub const TEXT_COLOR: Color = Color::srgb(0.15, 0.15, 0.15);
const AXIS_COLOR: Color = Color::srgb(0.2, 0.2, 0.2);

const TICK_FONT: f32 = 10.0;
const LABEL_FONT: f32 = 12.0;
const TITLE_FONT: f32 = 14.0;

/// Rough rendered width of a line of text.
pub fn estimate_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * 0.55
}

/// Margins between the tile edge and the plotting area, in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Insets {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl Insets {
    pub fn for_panel(panel: &Panel) -> Self {
        let mut bottom = 48.0;
        if let XAxis::Categorical { ticks, rotation } = &panel.x_axis {
            let longest = ticks
                .iter()
                .map(|t| estimate_text_width(t, TICK_FONT))
                .fold(0.0f32, f32::max);
            bottom += longest * rotation.to_radians().sin().abs();
        }
        let mut top = 14.0;
        if panel.meta.title.is_some() {
            top += 22.0;
        }
        Self {
            left: 64.0,
            right: 16.0,
            bottom,
            top,
        }
    }
}

/// Maps panel data coordinates into the world rectangle left over after
/// the insets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotArea {
    /// World position of the bottom-left corner
    pub origin: Vec2,
    pub size: Vec2,
    pub x_range: [f32; 2],
    pub y_range: [f32; 2],
}

impl PlotArea {
    pub fn new(rect: &TileRect, insets: Insets, bounds: Bounds, categorical: bool) -> Self {
        let ([x0, y0], [x1, y1]) = bounds;
        // Continuous axes get a small margin so edge bars and markers stay
        // inside the frame; categorical axes already span half a slot.
        let x_range = if categorical {
            [x0, x1]
        } else {
            let pad = (x1 - x0) * 0.05;
            [x0 - pad, x1 + pad]
        };

        let min = rect.world_center - rect.world_size * 0.5;
        let size = Vec2::new(
            (rect.world_size.x - insets.left - insets.right).max(1.0),
            (rect.world_size.y - insets.bottom - insets.top).max(1.0),
        );
        Self {
            origin: min + Vec2::new(insets.left, insets.bottom),
            size,
            x_range,
            y_range: [y0, y1],
        }
    }

    pub fn x(&self, v: f32) -> f32 {
        let [a, b] = self.x_range;
        self.origin.x + (v - a) / (b - a) * self.size.x
    }

    pub fn y(&self, v: f32) -> f32 {
        let [a, b] = self.y_range;
        self.origin.y + (v - a) / (b - a) * self.size.y
    }

    pub fn point(&self, p: [f32; 2]) -> Vec2 {
        Vec2::new(self.x(p[0]), self.y(p[1]))
    }

    pub fn left(&self) -> f32 {
        self.origin.x
    }

    pub fn right(&self) -> f32 {
        self.origin.x + self.size.x
    }

    pub fn bottom(&self) -> f32 {
        self.origin.y
    }

    pub fn top(&self) -> f32 {
        self.origin.y + self.size.y
    }

    pub fn contains_x(&self, world_x: f32) -> bool {
        world_x >= self.left() - 0.5 && world_x <= self.right() + 0.5
    }
}

/// Axis-aligned filled rectangle.
pub fn spawn_rect(
    commands: &mut Commands,
    root: Entity,
    unit: &UnitMeshes,
    mat: &Handle<ColorMaterial>,
    center: Vec2,
    size: Vec2,
    z: f32,
    layers: &RenderLayers,
) {
    if size.x <= 0.0 || size.y <= 0.0 {
        return;
    }
    commands.entity(root).with_children(|parent| {
        parent.spawn((
            Mesh2d(unit.quad.clone()),
            MeshMaterial2d(mat.clone()),
            Transform {
                translation: center.extend(z),
                scale: size.extend(1.0),
                ..default()
            },
            layers.clone(),
        ));
    });
}

/// Rectangle outline made of four thin quads.
pub fn spawn_outline(
    commands: &mut Commands,
    root: Entity,
    unit: &UnitMeshes,
    mat: &Handle<ColorMaterial>,
    min: Vec2,
    max: Vec2,
    width: f32,
    z: f32,
    layers: &RenderLayers,
) {
    let size = max - min;
    let center = (min + max) * 0.5;
    for (offset, scale) in [
        (Vec2::new(0.0, size.y * 0.5), Vec2::new(size.x + width, width)),
        (Vec2::new(0.0, -size.y * 0.5), Vec2::new(size.x + width, width)),
        (Vec2::new(-size.x * 0.5, 0.0), Vec2::new(width, size.y + width)),
        (Vec2::new(size.x * 0.5, 0.0), Vec2::new(width, size.y + width)),
    ] {
        spawn_rect(commands, root, unit, mat, center + offset, scale, z, layers);
    }
}

/// Straight segment of the given width between two world points.
pub fn spawn_segment(
    commands: &mut Commands,
    root: Entity,
    unit: &UnitMeshes,
    mat: &Handle<ColorMaterial>,
    a: Vec2,
    b: Vec2,
    width: f32,
    z: f32,
    layers: &RenderLayers,
) {
    let length = a.distance(b);
    if length <= f32::EPSILON {
        return;
    }
    let angle = (b.y - a.y).atan2(b.x - a.x);

    commands.entity(root).with_children(|parent| {
        parent.spawn((
            Mesh2d(unit.quad.clone()),
            MeshMaterial2d(mat.clone()),
            Transform {
                translation: ((a + b) * 0.5).extend(z),
                rotation: Quat::from_rotation_z(angle),
                scale: Vec3::new(length, width, 1.0),
            },
            layers.clone(),
        ));
    });
}

/// Text centered at `pos`, rotated counter-clockwise by `rotation` radians.
pub fn spawn_text(
    commands: &mut Commands,
    root: Entity,
    text: impl Into<String>,
    font_size: f32,
    color: Color,
    pos: Vec2,
    rotation: f32,
    layers: &RenderLayers,
) {
    let text = text.into();
    commands.entity(root).with_children(|parent| {
        parent.spawn((
            Text2d::new(text),
            TextFont {
                font_size,
                ..default()
            },
            TextColor(color),
            Transform {
                translation: pos.extend(2.0),
                rotation: Quat::from_rotation_z(rotation),
                ..default()
            },
            layers.clone(),
        ));
    });
}

/// Draw a border around a tile rect.
pub fn draw_tile_border(
    commands: &mut Commands,
    root: Entity,
    rect: &TileRect,
    unit: &UnitMeshes,
    materials: &mut Assets<ColorMaterial>,
    layers: &RenderLayers,
    color: Color,
) {
    let border_mat = materials.add(ColorMaterial::from(color));
    let half = rect.world_size * 0.5;
    spawn_outline(
        commands,
        root,
        unit,
        &border_mat,
        rect.world_center - half,
        rect.world_center + half,
        1.0,
        0.0,
        layers,
    );
}

/// Draw the panel title.
pub fn draw_panel_title(
    commands: &mut Commands,
    root: Entity,
    meta: &PlotMeta,
    rect: &TileRect,
    layers: &RenderLayers,
) {
    let title_y = rect.world_center.y + rect.world_size.y * 0.5 - 16.0;

    if let Some(title) = &meta.title {
        spawn_text(
            commands,
            root,
            title.clone(),
            TITLE_FONT,
            TEXT_COLOR,
            Vec2::new(rect.world_center.x, title_y),
            0.0,
            layers,
        );
    }
}

/// Calculate nice tick step for given range.
pub fn nice_step(range: f32, target_ticks: usize) -> f32 {
    if range <= 0.0 || !range.is_finite() {
        return 1.0;
    }
    let rough = range / target_ticks as f32;
    let exp = rough.log10().floor();
    let base = 10f32.powf(exp);

    let normalized = rough / base;
    let nice = if normalized <= 1.5 {
        1.0
    } else if normalized <= 3.0 {
        2.0
    } else if normalized <= 7.0 {
        5.0
    } else {
        10.0
    };

    nice * base
}

/// Format tick value for display.
pub fn format_tick(val: f32) -> String {
    if val == 0.0 {
        "0".to_string()
    } else if val.abs() < 0.001 || val.abs() >= 100_000.0 {
        format!("{:.1e}", val)
    } else if val.fract().abs() < 1e-4 {
        format!("{:.0}", val)
    } else if val.abs() < 1.0 {
        format!("{:.3}", val)
            .trim_end_matches('0')
            .to_string()
    } else {
        format!("{:.1}", val)
    }
}

/// Tick values of a nice step inside `[lo, hi]`.
pub fn tick_values(lo: f32, hi: f32, target_ticks: usize) -> Vec<f32> {
    let step = nice_step(hi - lo, target_ticks);
    let start = (lo / step).ceil() as i64;
    let end = (hi / step).floor() as i64;
    (start..=end).map(|i| i as f32 * step).collect()
}

/// Show at most `max_labels` of `n` slot labels, evenly thinned.
pub fn slot_label_stride(n: usize, max_labels: usize) -> usize {
    n.div_ceil(max_labels.max(1)).max(1)
}

/// Draw spines, ticks, tick labels and axis labels of a panel.
pub fn draw_axes(
    commands: &mut Commands,
    root: Entity,
    panel: &Panel,
    area: &PlotArea,
    rect: &TileRect,
    unit: &UnitMeshes,
    materials: &mut Assets<ColorMaterial>,
    layers: &RenderLayers,
) {
    let axis_mat = materials.add(ColorMaterial::from(AXIS_COLOR));
    let tick_length = 5.0;

    // Left and bottom spines
    spawn_rect(
        commands,
        root,
        unit,
        &axis_mat,
        Vec2::new(area.left(), area.bottom() + area.size.y * 0.5),
        Vec2::new(1.0, area.size.y),
        1.0,
        layers,
    );
    spawn_rect(
        commands,
        root,
        unit,
        &axis_mat,
        Vec2::new(area.left() + area.size.x * 0.5, area.bottom()),
        Vec2::new(area.size.x, 1.0),
        1.0,
        layers,
    );

    // X ticks
    match &panel.x_axis {
        XAxis::Continuous => {
            for v in tick_values(area.x_range[0], area.x_range[1], 6) {
                let x = area.x(v);
                spawn_rect(
                    commands,
                    root,
                    unit,
                    &axis_mat,
                    Vec2::new(x, area.bottom() - tick_length * 0.5),
                    Vec2::new(1.0, tick_length),
                    1.0,
                    layers,
                );
                spawn_text(
                    commands,
                    root,
                    format_tick(v),
                    TICK_FONT,
                    TEXT_COLOR,
                    Vec2::new(x, area.bottom() - tick_length - 9.0),
                    0.0,
                    layers,
                );
            }
        }
        XAxis::Categorical { ticks, rotation } => {
            let stride = slot_label_stride(ticks.len(), (area.size.x / 14.0) as usize);
            let angle = rotation.to_radians();
            for (i, label) in ticks.iter().enumerate().step_by(stride) {
                let x = area.x(i as f32);
                spawn_rect(
                    commands,
                    root,
                    unit,
                    &axis_mat,
                    Vec2::new(x, area.bottom() - tick_length * 0.5),
                    Vec2::new(1.0, tick_length),
                    1.0,
                    layers,
                );
                // Rotated labels hang from the tick by their right end.
                let half = estimate_text_width(label, TICK_FONT) * 0.5;
                let anchor = Vec2::new(x, area.bottom() - tick_length - 9.0);
                let pos = if angle == 0.0 {
                    anchor
                } else {
                    anchor - Vec2::new(angle.cos(), angle.sin()) * half
                };
                spawn_text(
                    commands,
                    root,
                    label.clone(),
                    TICK_FONT,
                    TEXT_COLOR,
                    pos,
                    angle,
                    layers,
                );
            }
        }
    }

    // Y ticks
    for v in tick_values(area.y_range[0], area.y_range[1], 5) {
        let y = area.y(v);
        spawn_rect(
            commands,
            root,
            unit,
            &axis_mat,
            Vec2::new(area.left() - tick_length * 0.5, y),
            Vec2::new(tick_length, 1.0),
            1.0,
            layers,
        );
        let text = format_tick(v);
        let half = estimate_text_width(&text, TICK_FONT) * 0.5;
        spawn_text(
            commands,
            root,
            text,
            TICK_FONT,
            TEXT_COLOR,
            Vec2::new(area.left() - tick_length - 4.0 - half, y),
            0.0,
            layers,
        );
    }

    // Axis labels
    if let Some(x_label) = &panel.x_label {
        spawn_text(
            commands,
            root,
            x_label.clone(),
            LABEL_FONT,
            TEXT_COLOR,
            Vec2::new(
                area.left() + area.size.x * 0.5,
                rect.world_center.y - rect.world_size.y * 0.5 + 12.0,
            ),
            0.0,
            layers,
        );
    }
    if let Some(y_label) = &panel.y_label {
        spawn_text(
            commands,
            root,
            y_label.clone(),
            LABEL_FONT,
            TEXT_COLOR,
            Vec2::new(
                rect.world_center.x - rect.world_size.x * 0.5 + 12.0,
                area.bottom() + area.size.y * 0.5,
            ),
            std::f32::consts::FRAC_PI_2,
            layers,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> TileRect {
        TileRect {
            world_center: Vec2::new(100.0, 50.0),
            world_size: Vec2::new(200.0, 100.0),
            ..TileRect::default()
        }
    }

    const NO_INSETS: Insets = Insets {
        left: 0.0,
        right: 0.0,
        bottom: 0.0,
        top: 0.0,
    };

    #[test]
    fn categorical_area_maps_slots_evenly() {
        let area = PlotArea::new(&rect(), NO_INSETS, ([-0.5, 0.0], [3.5, 10.0]), true);
        assert_eq!(area.origin, Vec2::new(0.0, 0.0));
        assert_eq!(area.x(-0.5), 0.0);
        assert_eq!(area.x(1.5), 100.0);
        assert_eq!(area.y(5.0), 50.0);
        assert_eq!(area.top(), 100.0);
    }

    #[test]
    fn continuous_area_gets_margins() {
        let area = PlotArea::new(&rect(), NO_INSETS, ([0.0, 0.0], [10.0, 1.0]), false);
        assert_eq!(area.x_range, [-0.5, 10.5]);
        assert!(area.contains_x(area.x(0.0)));
        assert!(!area.contains_x(area.x(20.0)));
    }

    #[test]
    fn insets_grow_for_rotated_ticks_and_titles() {
        let plain = Insets::for_panel(&Panel::new());
        let panel = Panel {
            x_axis: XAxis::Categorical {
                ticks: vec!["a fairly long category".into()],
                rotation: 75.0,
            },
            meta: PlotMeta {
                title: Some("t".into()),
            },
            ..Panel::new()
        };
        let rotated = Insets::for_panel(&panel);
        assert!(rotated.bottom > plain.bottom + 50.0);
        assert_eq!(rotated.top, plain.top + 22.0);
    }

    #[test]
    fn nice_steps() {
        assert_eq!(nice_step(10.0, 5), 2.0);
        assert_eq!(nice_step(100.0, 4), 20.0);
        assert_eq!(nice_step(0.0, 5), 1.0);
        assert_eq!(tick_values(-0.3, 2.2, 5), vec![0.0, 0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn tick_formatting() {
        assert_eq!(format_tick(0.0), "0");
        assert_eq!(format_tick(5.0), "5");
        assert_eq!(format_tick(0.05), "0.05");
        assert_eq!(format_tick(2.5), "2.5");
        assert_eq!(format_tick(1.0e6), "1.0e6");
    }

    #[test]
    fn slot_labels_are_thinned() {
        assert_eq!(slot_label_stride(10, 20), 1);
        assert_eq!(slot_label_stride(100, 20), 5);
        assert_eq!(slot_label_stride(5, 0), 5);
    }
}
