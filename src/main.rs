//! Command line front end: read a CSV file, classify its columns and plot
//! their distributions.

use clap::Parser;
use error_stack::{Report, ResultExt};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use distplot::PlotError;
use distplot::config::Args;
use distplot::input::CsvReader;
use distplot::plot::{NO_COLUMNS_MESSAGE, plot_distributions, summarize};
use distplot::runtime::show_figure;

fn main() -> Result<(), Report<PlotError>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "distplot=info".into()),
        )
        .init();

    let args = Args::parse();
    let options = args.plot_options()?;

    let mut reader = CsvReader::new().delimiter(args.delimiter_byte()?);
    if let Some(title) = &args.title {
        reader = reader.title(title.clone());
    }
    let table = reader.read_path(&args.input)?;
    info!(
        columns = table.column_count(),
        rows = table.row_count(),
        "loaded {}",
        args.input.display()
    );

    if args.summary {
        for line in summarize(&table, &options)? {
            println!("{line}");
        }
        return Ok(());
    }

    let Some(figure) = plot_distributions(&table, &options)? else {
        println!("{NO_COLUMNS_MESSAGE}");
        return Ok(());
    };

    if let Some(title) = &figure.title {
        println!("{title}");
    }

    if let Some(path) = &args.dump {
        let json = serde_json::to_string_pretty(&figure)
            .change_context_lazy(|| PlotError::Config("cannot serialize figure".into()))?;
        std::fs::write(path, json)
            .change_context_lazy(|| PlotError::Config(format!("cannot write {}", path.display())))?;
        info!("figure written to {}", path.display());
        return Ok(());
    }

    if figure.panels.is_empty() {
        warn!("figure has no panels");
        return Ok(());
    }
    show_figure(figure);
    Ok(())
}
