use bevy::prelude::*;
use tracing::info;

use crate::core::Figure;
use crate::render::{FigureRenderPlugin, FigureRes};

const DEFAULT_WINDOW_TITLE: &str = "distplot";

/// Open a window showing `figure`. Blocks until the window is closed.
///
/// Bevy's own log plugin is disabled; the caller owns the tracing
/// subscriber.
pub fn show_figure(figure: Figure) {
    let bg = figure.background;
    let window_title = figure
        .title
        .clone()
        .unwrap_or_else(|| DEFAULT_WINDOW_TITLE.to_string());
    info!(panels = figure.panels.len(), "opening figure window");

    App::new()
        .insert_resource(ClearColor(Color::srgb(bg.r, bg.g, bg.b)))
        .insert_resource(FigureRes::new(figure))
        .add_plugins((
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: window_title,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest())
                .disable::<bevy::log::LogPlugin>(),
            FigureRenderPlugin,
        ))
        .run();
}
