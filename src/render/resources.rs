use bevy::prelude::*;
use bevy_camera::visibility::RenderLayers;
use std::collections::{HashMap, VecDeque};

use super::components::FigureTitle;

/// Height reserved at the top of the window for the figure title.
pub const FIGURE_TITLE_HEIGHT: f32 = 36.0;

#[derive(Resource, Clone)]
pub struct FigureRes(pub crate::core::Figure);

impl FigureRes {
    pub fn new(figure: crate::core::Figure) -> Self {
        Self(figure)
    }

    pub fn title_height(&self) -> f32 {
        if self.0.title.is_some() {
            FIGURE_TITLE_HEIGHT
        } else {
            0.0
        }
    }
}

#[derive(Resource, Default)]
pub struct TileRegistry {
    /// Panel index -> tile entity
    pub by_panel: HashMap<usize, Entity>,
    pub camera_of: HashMap<usize, Entity>,
    pub dirty: VecDeque<usize>,
}

impl TileRegistry {
    pub fn mark_dirty(&mut self, index: usize) {
        if !self.dirty.contains(&index) {
            self.dirty.push_back(index);
        }
    }
}

#[derive(Resource)]
pub struct UnitMeshes {
    pub quad: Handle<Mesh>,
}

/// Render layer of the window camera; tiles use `1..`.
pub const WINDOW_LAYER: usize = 0;

/// Each panel gets its own layer so tile cameras only see their own panel.
pub fn tile_layer(index: usize) -> RenderLayers {
    RenderLayers::layer(WINDOW_LAYER + 1 + index)
}

pub fn setup_global_scene(mut commands: Commands, figure: Res<FigureRes>) {
    // Window camera renders first and clears; tile cameras draw over it.
    commands.spawn((
        Camera2d::default(),
        Camera {
            order: 0,
            ..default()
        },
        RenderLayers::layer(WINDOW_LAYER),
    ));

    if let Some(title) = &figure.0.title {
        commands.spawn((
            Text2d::new(title.clone()),
            TextFont {
                font_size: 18.0,
                ..default()
            },
            TextColor(super::draw::TEXT_COLOR),
            Transform::default(),
            FigureTitle,
            RenderLayers::layer(WINDOW_LAYER),
        ));
    }
}

pub fn setup_unit_meshes(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    let quad = meshes.add(Mesh::from(Rectangle::new(1.0, 1.0)));
    commands.insert_resource(UnitMeshes { quad });
}
