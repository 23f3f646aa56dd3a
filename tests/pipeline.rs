//! CSV file to figure, end to end.

use std::io::Write;

use distplot::config::PlotOptions;
use distplot::core::{Layer, XAxis};
use distplot::error::PlotError;
use distplot::input::{CsvReader, read_csv};
use distplot::plot::{ColumnKind, plot_distributions, summarize};

/// 100 rows: `rating` has four whole values, `price` is continuous and
/// `city` is categorical.
fn write_survey() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "rating,price,city").unwrap();
    let cities = ["Paris", "Rome", "Oslo"];
    for i in 0..100 {
        writeln!(
            file,
            "{},{},{}",
            i % 4 + 1,
            10.0 + i as f64 * 0.37,
            cities[i % cities.len()]
        )
        .unwrap();
    }
    file
}

fn vlines(layers: &[Layer]) -> Vec<(f32, Option<&str>)> {
    layers
        .iter()
        .filter_map(|l| match l {
            Layer::VLine { x, label, .. } => Some((*x, label.as_deref())),
            _ => None,
        })
        .collect()
}

#[test]
fn survey_file_becomes_three_panels() {
    let file = write_survey();
    let table = CsvReader::new().title("survey").read_path(file.path()).unwrap();

    let fig = plot_distributions(&table, &PlotOptions::default())
        .unwrap()
        .expect("plottable columns");

    assert_eq!(fig.title.as_deref(), Some("Distributions in table \"survey\""));
    assert_eq!(fig.columns, 2);
    assert_eq!(fig.panels.len(), 3);

    let titles: Vec<_> = fig
        .panels
        .iter()
        .map(|p| p.meta.title.clone().unwrap())
        .collect();
    assert_eq!(
        titles,
        [
            "Distribution of \"rating\"",
            "Distribution of \"price\"",
            "Distribution of \"city\"",
        ]
    );

    // Discrete rating: count plot over slots 1..=4.
    let rating = &fig.panels[0];
    let XAxis::Categorical { ticks, .. } = &rating.x_axis else {
        panic!("rating should use a slot axis");
    };
    assert_eq!(ticks, &["1", "2", "3", "4"]);
    assert_eq!(rating.y_label.as_deref(), Some("Count"));
    // Mean 2.5 sits halfway between slots 1 and 2.
    let markers = vlines(&rating.layers);
    assert_eq!(markers[0], (1.5, Some("Mean: 2.50")));
    assert!(rating.legend);

    // Continuous price: density histogram with KDE.
    let price = &fig.panels[1];
    assert_eq!(price.x_axis, XAxis::Continuous);
    assert_eq!(price.y_label.as_deref(), Some("Density"));
    assert!(matches!(price.layers[0], Layer::Histogram { .. }));
    assert!(price.layers.iter().any(|l| matches!(l, Layer::Curve { .. })));

    // Categorical city: bars in first-appearance order, rotated ticks.
    let city = &fig.panels[2];
    let XAxis::Categorical { ticks, rotation } = &city.x_axis else {
        panic!("city should use a slot axis");
    };
    assert_eq!(ticks, &["Paris", "Rome", "Oslo"]);
    assert_eq!(*rotation, 75.0);
    assert!(!city.legend);
}

#[test]
fn overlays_follow_options() {
    let file = write_survey();
    let table = read_csv(file.path()).unwrap();
    let options = PlotOptions::from_json_str(
        r#"{
            "interval": 0.9,
            "zones": [[0, 15], [20, 25]],
            "overlay_columns": ["price"],
            "labels": {"price": "Unit price"}
        }"#,
    )
    .unwrap();

    let fig = plot_distributions(&table, &options).unwrap().unwrap();
    // Untitled tables give an untitled figure.
    assert_eq!(fig.title, None);

    let price = &fig.panels[1];
    assert_eq!(price.x_label.as_deref(), Some("Value of \"Unit price\""));
    let labels: Vec<_> = price.legend_entries().iter().map(|(l, _)| l.to_string()).collect();
    assert_eq!(labels.len(), 4);
    assert_eq!(labels[2], "CI bounds: 90.0%");
    assert_eq!(labels[3], "Loss zone");

    let zones: Vec<_> = price
        .layers
        .iter()
        .filter_map(|l| match l {
            Layer::Zone { x_start, x_end, .. } => Some((*x_start, *x_end)),
            _ => None,
        })
        .collect();
    assert_eq!(zones, [(None, 15.0), (Some(20.0), 25.0)]);

    // The discrete column is not in `overlay_columns`.
    assert_eq!(vlines(&fig.panels[0].layers).len(), 2);
}

#[test]
fn forced_discrete_column_moves_to_count_plot() {
    let file = write_survey();
    let table = read_csv(file.path()).unwrap();
    let options = PlotOptions {
        discrete: vec!["price".into()],
        ..PlotOptions::default()
    };

    let fig = plot_distributions(&table, &options).unwrap().unwrap();
    assert_eq!(fig.panels.len(), 3);
    assert!(matches!(fig.panels[1].x_axis, XAxis::Categorical { .. }));
}

#[test]
fn unknown_forced_column_is_rejected() {
    let file = write_survey();
    let table = read_csv(file.path()).unwrap();
    let options = PlotOptions {
        discrete: vec!["nope".into()],
        ..PlotOptions::default()
    };

    let err = plot_distributions(&table, &options).unwrap_err();
    assert_eq!(err.current_context(), &PlotError::ColumnNotFound("nope".into()));
}

#[test]
fn header_only_file_gives_empty_count_plots() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "a,b").unwrap();
    let table = read_csv(file.path()).unwrap();

    let fig = plot_distributions(&table, &PlotOptions::default())
        .unwrap()
        .expect("header columns are still plotted");
    assert_eq!(fig.panels.len(), 2);
    for panel in &fig.panels {
        assert!(matches!(&panel.x_axis, XAxis::Categorical { ticks, .. } if ticks.is_empty()));
        assert!(panel.bounds().is_none());
    }
}

#[test]
fn empty_file_has_nothing_to_plot() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let table = read_csv(file.path()).unwrap();
    assert_eq!(table.column_count(), 0);
    assert!(plot_distributions(&table, &PlotOptions::default()).unwrap().is_none());
    assert!(summarize(&table, &PlotOptions::default()).unwrap().is_empty());
}

#[test]
fn misspelled_overlay_column_is_rejected() {
    let file = write_survey();
    let table = read_csv(file.path()).unwrap();
    let options = PlotOptions {
        interval: Some(0.9),
        overlay_columns: vec!["prcie".into()],
        ..PlotOptions::default()
    };

    let err = plot_distributions(&table, &options).unwrap_err();
    assert_eq!(err.current_context(), &PlotError::ColumnNotFound("prcie".into()));
}

#[test]
fn summary_lists_every_column() {
    let file = write_survey();
    let table = read_csv(file.path()).unwrap();
    let summary = summarize(&table, &PlotOptions::default()).unwrap();

    let kinds: Vec<_> = summary.iter().map(|s| (s.name.as_str(), s.kind)).collect();
    assert_eq!(
        kinds,
        [
            ("rating", ColumnKind::Discrete),
            ("price", ColumnKind::Continuous),
            ("city", ColumnKind::Categorical),
        ]
    );
    assert_eq!(summary[2].distinct, 3);
    assert!(summary[0].to_string().contains("mean=2.50"));
}
