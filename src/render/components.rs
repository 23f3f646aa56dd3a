use bevy::prelude::*;
use bevy_camera::Viewport;

/// One grid cell of the figure, drawing the panel at `index`.
#[derive(Component, Clone, Copy, Debug)]
pub struct PanelTile {
    pub index: usize,
}

#[derive(Component, Clone, Debug)]
pub struct TileRect {
    pub world_center: Vec2,
    pub world_size: Vec2,
    pub viewport: Viewport,
}

impl Default for TileRect {
    fn default() -> Self {
        Self {
            world_center: Vec2::ZERO,
            world_size: Vec2::new(100.0, 100.0),
            viewport: Viewport {
                physical_position: UVec2::ZERO,
                physical_size: UVec2::new(100, 100),
                depth: 0.0..1.0,
            },
        }
    }
}

/// Parent of everything drawn for a tile; replaced on every redraw.
#[derive(Component)]
pub struct TileRenderRoot;

#[derive(Component)]
pub struct TileCamera;

/// Figure-wide title text on the window camera.
#[derive(Component)]
pub struct FigureTitle;
