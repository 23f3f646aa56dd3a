//! Builds a distribution [`Figure`] for every plottable column of a table.
//!
//! Numeric columns are split into discrete and continuous ones by
//! [`partition_numeric`]. Discrete columns become count plots whose summary
//! markers are placed with [`position`]; continuous columns become density
//! histograms with a KDE overlay; categorical columns become count plots in
//! first-appearance order.

use std::fmt;

use error_stack::{Report, ResultExt};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classify::{ColumnPartition, partition_numeric};
use crate::config::PlotOptions;
use crate::core::{Color, Colormap, Figure, Panel, Style};
use crate::dash::{PanelBuilder, figure};
use crate::error::{PlotError, Result};
use crate::position::position;
use crate::stats;
use crate::table::{Column, Table};

/// Shown instead of a figure when the table has nothing to plot.
pub const NO_COLUMNS_MESSAGE: &str = "No columns to plot";

/// Rotation of categorical tick labels, degrees.
const CATEGORY_TICK_ROTATION: f32 = 75.0;
/// Loss zones reach this fraction of the axis height.
const ZONE_HEIGHT_FRACTION: f32 = 0.5;

fn bar_edge() -> Style {
    Style::default().color(Color::BLACK).size(0.5)
}

fn mean_style() -> Style {
    Style::default().color(Color::RED).size(2.0).dashed()
}

fn median_style() -> Style {
    Style::default().color(Color::ORANGE).size(2.0).dashed()
}

fn interval_style() -> Style {
    Style::default().color(Color::GREEN).size(2.0)
}

fn zone_style() -> Style {
    Style::default().color(Color::BLACK).opacity(0.5)
}

/// Maps raw column values to x positions on a panel.
enum AxisMap {
    /// Continuous axis: values are drawn where they are.
    Raw,
    /// Count plot axis over the sorted unique values.
    Slots(Vec<f64>),
}

impl AxisMap {
    fn place(&self, value: f64) -> Option<f32> {
        match self {
            AxisMap::Raw => value.is_finite().then_some(value as f32),
            AxisMap::Slots(unique) => position(value, unique).map(|p| p as f32),
        }
    }
}

/// The figure for `table`, or `None` when no column can be plotted.
pub fn plot_distributions(table: &Table, options: &PlotOptions) -> Result<Option<Figure>> {
    options.validate()?;

    let numeric: Vec<&Column> = table.numeric_columns().collect();
    let categorical: Vec<&Column> = table.categorical_columns().collect();
    let n_panels = numeric.len() + categorical.len();
    if n_panels == 0 {
        info!("{NO_COLUMNS_MESSAGE}");
        return Ok(None);
    }

    let partition = classify_columns(table, options)?;

    let mut fig = figure().columns(if n_panels == 1 { 1 } else { 2 });
    if options.show_title {
        if let Some(title) = table.title() {
            fig = fig.title(format!("Distributions in table \"{title}\""));
        }
    }

    for column in numeric {
        let panel = numeric_panel(column, partition.is_discrete(&column.name), options);
        fig = fig.push_panel(panel);
    }
    for column in categorical {
        fig = fig.push_panel(categorical_panel(column, options));
    }

    let fig = fig.build();
    info!(
        panels = fig.panels.len(),
        discrete = partition.discrete.len(),
        continuous = partition.continuous.len(),
        "built distribution figure"
    );
    Ok(Some(fig))
}

/// Check every column the options name, then partition the numeric
/// columns with the forced-discrete overrides applied.
fn classify_columns(table: &Table, options: &PlotOptions) -> Result<ColumnPartition> {
    for name in &options.overlay_columns {
        if !table.require(name)?.is_numeric() {
            return Err(Report::new(PlotError::NotNumeric(name.clone()))
                .attach("overlays are only drawn on numeric columns"));
        }
    }
    for name in options.labels.keys() {
        table.require(name).attach("display label for an unknown column")?;
    }
    for name in options.category_order.keys() {
        if table.require(name)?.is_numeric() {
            return Err(Report::new(PlotError::NotCategorical(name.clone()))
                .attach("category order is only used by categorical columns"));
        }
    }

    let mut partition = partition_numeric(table, options.ratio_threshold)?;
    for name in &options.discrete {
        table.require(name)?;
        partition.force_discrete(name)?;
    }
    Ok(partition)
}

fn numeric_panel(column: &Column, discrete: bool, options: &PlotOptions) -> Panel {
    let label = options.label(&column.name);
    let values = column.valid_numbers();

    let (mut p, axis) = if discrete {
        count_bars(&values)
    } else {
        density_bars(&values, options.bins)
    };

    match (stats::mean(&values), stats::median(&values)) {
        (Some(mean), Some(median)) => {
            if let Some(x) = axis.place(mean) {
                p = p.vline(x, mean_style(), Some(format!("Mean: {mean:.2}")));
            }
            if let Some(x) = axis.place(median) {
                p = p.vline(x, median_style(), Some(format!("Median: {median:.2}")));
            }
        }
        _ => warn!(column = %column.name, "no values, skipping mean/median markers"),
    }

    if options.overlays_apply_to(&column.name) {
        if let Some(interval) = options.interval {
            p = add_interval(p, &values, interval, &axis);
        }
        if !options.zones.is_empty() {
            p = mark_zones(p, &options.zones, &axis);
        }
    }

    finish(p, label)
}

fn count_bars(values: &[f64]) -> (PanelBuilder, AxisMap) {
    let counts = stats::value_counts(values);
    let unique: Vec<f64> = counts.iter().map(|(v, _)| *v).collect();
    let heights: Vec<f32> = counts.iter().map(|(_, n)| *n as f32).collect();
    let ticks: Vec<String> = unique.iter().map(|v| format!("{v}")).collect();
    debug!(slots = unique.len(), "count plot");

    let p = PanelBuilder::new()
        .categorical(ticks, 0.0)
        .bars(heights, Colormap::Viridis.palette(unique.len()), &bar_edge())
        .y_label("Count");
    (p, AxisMap::Slots(unique))
}

fn density_bars(values: &[f64], bins: usize) -> (PanelBuilder, AxisMap) {
    let mut p = PanelBuilder::new().y_label("Density");

    if let Some(hist) = stats::density_histogram(values, bins) {
        p = p.histogram(
            hist.edges.iter().map(|&e| e as f32).collect(),
            hist.density.iter().map(|&d| d as f32).collect(),
            Style::default().color(Color::SKYBLUE).opacity(0.7),
            &bar_edge(),
        );
    }
    if let Some(kde) = stats::gaussian_kde(values, stats::KDE_GRID_SIZE, stats::KDE_CUT) {
        let xy = kde
            .xs
            .iter()
            .zip(&kde.ys)
            .map(|(&x, &y)| [x as f32, y as f32])
            .collect();
        p = p.curve(xy, Style::default().color(Color::BLUE).size(2.0));
    }
    (p, AxisMap::Raw)
}

/// Lower and upper quantiles enclosing `interval` of the values.
pub fn interval_bounds(values: &[f64], interval: f64) -> Option<(f64, f64)> {
    let low = (1.0 - interval) / 2.0;
    let up = 1.0 - low;
    Some((stats::quantile(values, low)?, stats::quantile(values, up)?))
}

fn add_interval(mut p: PanelBuilder, values: &[f64], interval: f64, axis: &AxisMap) -> PanelBuilder {
    let Some((lower, upper)) = interval_bounds(values, interval) else {
        return p;
    };
    let label = format!("CI bounds: {:.1}%", interval * 100.0);
    if let Some(x) = axis.place(lower) {
        p = p.vline(x, interval_style(), Some(label));
    }
    if let Some(x) = axis.place(upper) {
        p = p.vline(x, interval_style(), None);
    }
    p
}

fn mark_zones(mut p: PanelBuilder, zones: &[[f64; 2]], axis: &AxisMap) -> PanelBuilder {
    for (i, &[low, high]) in zones.iter().enumerate() {
        let Some(end) = axis.place(high) else {
            continue;
        };
        let start = if i == 0 { None } else { axis.place(low) };
        let label = (i == 0).then(|| "Loss zone".to_string());
        p = p.zone(start, end, ZONE_HEIGHT_FRACTION, zone_style(), label);
    }
    p
}

fn categorical_panel(column: &Column, options: &PlotOptions) -> Panel {
    let label = options.label(&column.name);
    let values = column.as_categorical().unwrap_or_default();
    let order = options.category_order.get(&column.name).map(Vec::as_slice);
    let counts = stats::category_counts(values, order);

    let p = PanelBuilder::new()
        .categorical(
            counts.iter().map(|(c, _)| c.clone()).collect(),
            CATEGORY_TICK_ROTATION,
        )
        .bars(
            counts.iter().map(|(_, n)| *n as f32).collect(),
            Colormap::Set2.palette(counts.len()),
            None,
        )
        .y_label("Count");
    finish(p, label)
}

fn finish(p: PanelBuilder, label: &str) -> Panel {
    let p = p
        .title(format!("Distribution of \"{label}\""))
        .x_label(format!("Value of \"{label}\""));
    let legend = p.has_legend_entries();
    p.legend(legend).build()
}

/* -------------------- SUMMARY -------------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    Discrete,
    Continuous,
    Categorical,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnKind::Discrete => "discrete",
            ColumnKind::Continuous => "continuous",
            ColumnKind::Categorical => "categorical",
        };
        f.write_str(s)
    }
}

/// Per-column facts printed by the CLI instead of drawing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    pub rows: usize,
    pub valid: usize,
    pub distinct: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
}

impl fmt::Display for ColumnSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<20} {:<12} rows={} valid={} distinct={}",
            self.name, self.kind, self.rows, self.valid, self.distinct
        )?;
        let opt = |v: Option<f64>| v.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".into());
        if self.kind != ColumnKind::Categorical {
            write!(
                f,
                " mean={} median={} std={}",
                opt(self.mean),
                opt(self.median),
                opt(self.std)
            )?;
        }
        Ok(())
    }
}

/// Classify every column and collect its summary statistics, in plotting
/// order (numeric columns first).
pub fn summarize(table: &Table, options: &PlotOptions) -> Result<Vec<ColumnSummary>> {
    let partition = classify_columns(table, options)?;

    let mut out = Vec::with_capacity(table.column_count());
    for column in table.numeric_columns() {
        let values = column.valid_numbers();
        out.push(ColumnSummary {
            name: column.name.clone(),
            kind: if partition.is_discrete(&column.name) {
                ColumnKind::Discrete
            } else {
                ColumnKind::Continuous
            },
            rows: column.len(),
            valid: values.len(),
            distinct: stats::distinct_count(&values),
            mean: stats::mean(&values),
            median: stats::median(&values),
            std: stats::std_dev(&values),
        });
    }
    for column in table.categorical_columns() {
        let values = column.as_categorical().unwrap_or_default();
        let counts = stats::category_counts(values, None);
        out.push(ColumnSummary {
            name: column.name.clone(),
            kind: ColumnKind::Categorical,
            rows: column.len(),
            valid: counts.iter().map(|(_, n)| n).sum(),
            distinct: counts.len(),
            mean: None,
            median: None,
            std: None,
        });
    }
    Ok(out)
}
