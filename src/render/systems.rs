use super::*;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_camera::visibility::RenderLayers;
use bevy_camera::{ClearColorConfig, OrthographicProjection, Projection, ScalingMode, Viewport};
use bevy_math::UVec2;
use std::collections::HashSet;

const MARGIN: f32 = 20.0;
const GAP: f32 = 10.0;

/// Spawn one tile per figure panel. Panels are fixed for the lifetime of
/// the window, so this only ever creates missing tiles.
pub fn spawn_panel_tiles(
    mut commands: Commands,
    figure: Res<FigureRes>,
    mut registry: ResMut<TileRegistry>,
) {
    for index in 0..figure.0.panels.len() {
        if registry.by_panel.contains_key(&index) {
            continue;
        }
        let tile = commands
            .spawn((
                PanelTile { index },
                TileRect::default(),
                Transform::default(),
                Visibility::default(),
            ))
            .id();
        registry.by_panel.insert(index, tile);
        registry.mark_dirty(index);
    }
}

/// Placement of panel `index` in a `cols x rows` grid filling `window`
/// (logical pixels), below a title band of `title_height`.
pub fn tile_layout(
    window: Vec2,
    scale: f32,
    index: usize,
    (cols, rows): (usize, usize),
    title_height: f32,
) -> TileRect {
    let cols = cols.max(1);
    let rows = rows.max(1);

    let avail_w = window.x - 2.0 * MARGIN;
    let avail_h = window.y - 2.0 * MARGIN - title_height;
    let tile_w = ((avail_w - (cols - 1) as f32 * GAP) / cols as f32).max(1.0);
    let tile_h = ((avail_h - (rows - 1) as f32 * GAP) / rows as f32).max(1.0);

    let col = index % cols;
    let row = index / cols;
    let vp_x = MARGIN + col as f32 * (tile_w + GAP);
    let vp_y = MARGIN + title_height + row as f32 * (tile_h + GAP);

    // Viewports are in physical pixels
    let phys_pos = UVec2::new(
        (vp_x * scale).round().max(0.0) as u32,
        (vp_y * scale).round().max(0.0) as u32,
    );
    let phys_size = UVec2::new(
        (tile_w * scale).round().max(1.0) as u32,
        (tile_h * scale).round().max(1.0) as u32,
    );

    // World coordinates (centered origin)
    let world_center = Vec2::new(
        vp_x + tile_w * 0.5 - window.x * 0.5,
        window.y * 0.5 - vp_y - tile_h * 0.5,
    );

    TileRect {
        world_center,
        world_size: Vec2::new(tile_w, tile_h),
        viewport: Viewport {
            physical_position: phys_pos,
            physical_size: phys_size,
            depth: 0.0..1.0,
        },
    }
}

/// Update tile layout when the window resizes
pub fn update_tile_layout(
    windows: Query<&Window, With<PrimaryWindow>>,
    figure: Res<FigureRes>,
    mut registry: ResMut<TileRegistry>,
    mut tiles: Query<(&PanelTile, &mut TileRect)>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let size = Vec2::new(window.width(), window.height());
    if size.x <= 2.0 * MARGIN || size.y <= 2.0 * MARGIN {
        return;
    }
    let scale = window.resolution.scale_factor();
    let grid = figure.0.grid();
    let title_height = figure.title_height();

    for (tile, mut rect) in tiles.iter_mut() {
        let next = tile_layout(size, scale, tile.index, grid, title_height);

        // Only mark dirty if layout actually changed
        let changed = rect.world_center != next.world_center
            || rect.world_size != next.world_size
            || rect.viewport.physical_position != next.viewport.physical_position
            || rect.viewport.physical_size != next.viewport.physical_size;

        if changed {
            *rect = next;
            registry.mark_dirty(tile.index);
        }
    }
}

/// Create/update cameras for each tile
pub fn sync_tile_cameras(
    mut commands: Commands,
    mut registry: ResMut<TileRegistry>,
    tiles: Query<(&PanelTile, &TileRect), Changed<TileRect>>,
    existing: Query<Entity, With<TileCamera>>,
) {
    for (tile, rect) in tiles.iter() {
        let cam_entity = if let Some(&cam) = registry.camera_of.get(&tile.index) {
            cam
        } else {
            let cam = commands.spawn((TileCamera, Transform::default())).id();
            registry.camera_of.insert(tile.index, cam);
            cam
        };

        let mut ortho = OrthographicProjection::default_2d();
        ortho.scaling_mode = ScalingMode::FixedVertical {
            viewport_height: rect.world_size.y,
        };

        commands.entity(cam_entity).insert((
            Camera2d::default(),
            Camera {
                viewport: Some(rect.viewport.clone()),
                order: 10 + tile.index as isize,
                // The window camera already cleared to the figure background.
                clear_color: ClearColorConfig::None,
                ..default()
            },
            Projection::from(ortho),
            Transform::from_translation(rect.world_center.extend(1000.0)),
            tile_layer(tile.index),
        ));
    }

    // Despawn cameras whose tile is gone
    let used: HashSet<Entity> = registry.camera_of.values().copied().collect();
    for cam_entity in existing.iter() {
        if !used.contains(&cam_entity) {
            commands.entity(cam_entity).despawn();
        }
    }
}

/// Keep the figure title centered in the band above the grid.
pub fn position_figure_title(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut titles: Query<&mut Transform, With<FigureTitle>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let y = window.height() * 0.5 - MARGIN * 0.5 - FIGURE_TITLE_HEIGHT * 0.5;
    for mut transform in titles.iter_mut() {
        if transform.translation.y != y {
            transform.translation = Vec3::new(0.0, y, 1.0);
        }
    }
}

/// Draw only dirty tiles
pub fn draw_dirty_tiles(
    mut commands: Commands,
    mut registry: ResMut<TileRegistry>,
    tiles: Query<&TileRect>,
    children_q: Query<&Children>,
    is_root_q: Query<(), With<TileRenderRoot>>,
    figure: Res<FigureRes>,
    unit: Res<UnitMeshes>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    while let Some(index) = registry.dirty.pop_front() {
        let Some(&tile_entity) = registry.by_panel.get(&index) else {
            continue;
        };
        let Ok(rect) = tiles.get(tile_entity) else {
            continue;
        };

        // Remove the previous render root, keep the tile
        if let Ok(children) = children_q.get(tile_entity) {
            for child in children.iter() {
                if is_root_q.get(child).is_ok() {
                    commands.entity(child).try_despawn();
                }
            }
        }

        let root = commands
            .spawn((TileRenderRoot, Transform::default(), Visibility::default()))
            .id();
        commands.entity(tile_entity).add_child(root);

        if let Some(panel) = figure.0.panels.get(index) {
            draw_panel(
                &mut commands,
                root,
                panel,
                rect,
                &unit,
                &mut meshes,
                &mut materials,
                &tile_layer(index),
            );
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_panel(
    commands: &mut Commands,
    root: Entity,
    panel: &crate::core::Panel,
    rect: &TileRect,
    unit: &UnitMeshes,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
    layers: &RenderLayers,
) {
    use crate::core::{Layer, XAxis};

    draw_tile_border(
        commands,
        root,
        rect,
        unit,
        materials,
        layers,
        Color::srgba(0.0, 0.0, 0.0, 0.15),
    );
    draw_panel_title(commands, root, &panel.meta, rect, layers);

    let Some(bounds) = panel.bounds() else {
        return;
    };
    let categorical = matches!(panel.x_axis, XAxis::Categorical { .. });
    let area = PlotArea::new(rect, Insets::for_panel(panel), bounds, categorical);

    for (i, layer) in panel.layers.iter().enumerate() {
        let z = 0.1 + i as f32 * 0.1;
        match layer {
            Layer::Bars {
                heights,
                colors,
                edge,
                width,
            } => draw_bars(
                commands,
                root,
                heights,
                colors,
                edge.as_ref(),
                *width,
                &area,
                unit,
                materials,
                z,
                layers,
            ),
            Layer::Histogram {
                edges,
                heights,
                style,
                edge,
            } => draw_histogram(
                commands,
                root,
                edges,
                heights,
                style,
                edge.as_ref(),
                &area,
                unit,
                materials,
                z,
                layers,
            ),
            Layer::Curve { xy, style, .. } => {
                draw_curve(commands, root, xy, style, &area, meshes, materials, z, layers)
            }
            Layer::VLine { x, style, .. } => {
                draw_vline(commands, root, *x, style, &area, unit, materials, z, layers)
            }
            Layer::Zone {
                x_start,
                x_end,
                height_fraction,
                style,
                ..
            } => draw_zone(
                commands,
                root,
                *x_start,
                *x_end,
                *height_fraction,
                style,
                &area,
                unit,
                materials,
                z,
                layers,
            ),
        }
    }

    draw_axes(commands, root, panel, &area, rect, unit, materials, layers);

    if panel.legend {
        draw_legend(
            commands,
            root,
            &panel.legend_entries(),
            &area,
            unit,
            materials,
            layers,
        );
    }
}
