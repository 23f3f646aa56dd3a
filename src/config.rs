//! Plot options and command line arguments

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::Parser;
use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};

use crate::classify::DEFAULT_RATIO_THRESHOLD;
use crate::error::{PlotError, Result};
use crate::stats::DEFAULT_BINS;

/// What to draw and how to label it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    /// Show the table title above the figure when the table has one
    pub show_title: bool,
    /// Columns forced to the discrete set
    pub discrete: Vec<String>,
    /// Display labels by column name; unlisted columns use their own name
    pub labels: HashMap<String, String>,
    /// Confidence interval, e.g. `0.95`
    pub interval: Option<f64>,
    /// Loss zones as `[low, high]`; the first zone starts at the axis edge
    pub zones: Vec<[f64; 2]>,
    /// Numeric columns that get interval/zone overlays; empty means all
    pub overlay_columns: Vec<String>,
    /// Explicit bar order for categorical columns
    pub category_order: HashMap<String, Vec<String>>,
    pub ratio_threshold: f64,
    pub bins: usize,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            show_title: true,
            discrete: vec![],
            labels: HashMap::new(),
            interval: None,
            zones: vec![],
            overlay_columns: vec![],
            category_order: HashMap::new(),
            ratio_threshold: DEFAULT_RATIO_THRESHOLD,
            bins: DEFAULT_BINS,
        }
    }
}

impl PlotOptions {
    /// Load options from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .change_context_lazy(|| PlotError::Config(format!("cannot read {}", path.display())))?;
        Self::from_json_str(&text)
            .attach(format!("config file: {}", path.display()))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .change_context_lazy(|| PlotError::Config("malformed JSON options".to_string()))
    }

    /// Display label for a column.
    pub fn label<'a>(&'a self, column: &'a str) -> &'a str {
        self.labels.get(column).map(String::as_str).unwrap_or(column)
    }

    pub fn overlays_apply_to(&self, column: &str) -> bool {
        self.overlay_columns.is_empty() || self.overlay_columns.iter().any(|c| c == column)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(p) = self.interval {
            if !(p > 0.0 && p < 1.0) {
                return Err(Report::new(PlotError::InvalidInterval(p)));
            }
        }
        for (index, [low, high]) in self.zones.iter().copied().enumerate() {
            // The first zone's lower bound is replaced by the axis edge.
            if index > 0 && low > high {
                return Err(Report::new(PlotError::InvalidZone { index, low, high }));
            }
        }
        if self.bins == 0 {
            return Err(Report::new(PlotError::Config("bins must be positive".into())));
        }
        if !(self.ratio_threshold > 0.0 && self.ratio_threshold <= 1.0) {
            return Err(Report::new(PlotError::Config(format!(
                "ratio threshold must lie in (0, 1], got {}",
                self.ratio_threshold
            ))));
        }
        Ok(())
    }
}

/// Plot the distribution of every column in a CSV file
#[derive(Parser, Clone, Debug)]
#[command(name = "distplot")]
#[command(about = "Classify the columns of a CSV file and plot their distributions")]
pub struct Args {
    /// CSV file with a header row
    pub input: PathBuf,

    /// JSON file with plot options
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Table title
    #[arg(long)]
    pub title: Option<String>,

    /// Do not show the table title
    #[arg(long)]
    pub no_title: bool,

    /// Force a numeric column to be plotted as discrete
    #[arg(long = "discrete", value_name = "COLUMN")]
    pub discrete: Vec<String>,

    /// Display label as COLUMN=LABEL
    #[arg(long = "label", value_name = "COLUMN=LABEL", value_parser = parse_label)]
    pub labels: Vec<(String, String)>,

    /// Draw confidence interval bounds, e.g. 0.95
    #[arg(long)]
    pub interval: Option<f64>,

    /// Loss zone as LOW:HIGH
    #[arg(long = "zone", value_name = "LOW:HIGH", value_parser = parse_zone, allow_hyphen_values = true)]
    pub zones: Vec<[f64; 2]>,

    /// Uniqueness ratio below which whole-number columns are discrete
    #[arg(long)]
    pub ratio_threshold: Option<f64>,

    /// Histogram bins for continuous columns
    #[arg(long)]
    pub bins: Option<usize>,

    /// CSV field delimiter
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// Print classification and statistics instead of opening a window
    #[arg(long)]
    pub summary: bool,

    /// Write the figure as JSON
    #[arg(long, value_name = "PATH")]
    pub dump: Option<PathBuf>,
}

impl Args {
    /// Options from the config file (if any) with command line overrides.
    pub fn plot_options(&self) -> Result<PlotOptions> {
        let mut opts = match &self.config {
            Some(path) => PlotOptions::from_json_file(path)?,
            None => PlotOptions::default(),
        };

        if self.no_title {
            opts.show_title = false;
        }
        for col in &self.discrete {
            if !opts.discrete.contains(col) {
                opts.discrete.push(col.clone());
            }
        }
        opts.labels.extend(self.labels.iter().cloned());
        if self.interval.is_some() {
            opts.interval = self.interval;
        }
        if !self.zones.is_empty() {
            opts.zones = self.zones.clone();
        }
        if let Some(r) = self.ratio_threshold {
            opts.ratio_threshold = r;
        }
        if let Some(b) = self.bins {
            opts.bins = b;
        }

        opts.validate()?;
        Ok(opts)
    }

    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter).map_err(|_| {
            Report::new(PlotError::Config(format!(
                "delimiter must be a single-byte character, got {:?}",
                self.delimiter
            )))
        })
    }
}

fn parse_label(s: &str) -> std::result::Result<(String, String), String> {
    let (col, label) = s
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=LABEL, got '{s}'"))?;
    if col.is_empty() {
        return Err("column name is empty".to_string());
    }
    Ok((col.to_string(), label.to_string()))
}

fn parse_zone(s: &str) -> std::result::Result<[f64; 2], String> {
    let (low, high) = s
        .split_once(':')
        .ok_or_else(|| format!("expected LOW:HIGH, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid zone bound '{v}': {e}"))
    };
    Ok([parse(low)?, parse(high)?])
}
