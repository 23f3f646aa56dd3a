pub mod components;
pub mod draw;
pub mod resources;
pub mod systems;

pub use components::*;
use draw::*;
pub use resources::*;
use systems::*;

use bevy::prelude::*;

/// Draws a [`crate::core::Figure`] held in [`FigureRes`] as a grid of panel
/// tiles, one camera per tile.
#[derive(Default)]
pub struct FigureRenderPlugin;

impl Plugin for FigureRenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TileRegistry>()
            .add_systems(Startup, (setup_global_scene, setup_unit_meshes))
            .add_systems(
                Update,
                (
                    spawn_panel_tiles,
                    update_tile_layout,
                    sync_tile_cameras,
                    position_figure_title,
                    draw_dirty_tiles,
                )
                    .chain(),
            );
    }
}
