//! Distribution plots for every column of a table.
//!
//! Numeric columns are split into discrete (count plot) and continuous
//! (histogram with a density estimate) by [`classify`]; categorical columns
//! get count plots. [`plot::plot_distributions`] builds a [`core::Figure`]
//! that [`runtime::show_figure`] draws in a window.

pub mod classify;
pub mod config;
pub mod core;
pub mod dash;
pub mod error;
pub mod input;
pub mod plot;
pub mod position;
pub mod render;
pub mod runtime;
pub mod stats;
pub mod table;

pub use error::{PlotError, Result};

pub mod prelude {
    pub use crate::classify::{ColumnPartition, is_discrete, partition_numeric};
    pub use crate::config::PlotOptions;
    pub use crate::core::*;
    pub use crate::dash::*;
    pub use crate::error::{PlotError, Result};
    pub use crate::input::{CsvReader, read_csv};
    pub use crate::plot::{plot_distributions, summarize};
    pub use crate::position::position;
    pub use crate::runtime::*;
    pub use crate::table::{Column, ColumnData, Table};
}
