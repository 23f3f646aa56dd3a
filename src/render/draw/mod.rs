//! Drawing functions for panel layers.
//!
//! - `common`: plot area mapping, primitives, borders and axes
//! - `bars`: count bars and density histograms
//! - `curves`: smooth curves as strip meshes
//! - `overlays`: vertical markers, shaded zones and the legend

mod bars;
mod common;
mod curves;
mod overlays;

pub use bars::{draw_bars, draw_histogram};
pub use common::{
    Insets, PlotArea, TEXT_COLOR, draw_axes, draw_panel_title, draw_tile_border, format_tick,
    nice_step,
};
pub use curves::{draw_curve, polyline_strip};
pub use overlays::{dash_segments, draw_legend, draw_vline, draw_zone};
