//! usage-synth entry point: CLI wiring and config-driven generation.

use std::path::{Path, PathBuf};
use std::process;

use chrono::Local;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use usage_synth::cli::{self, Command, PlotOptions, RecordsOptions, SeriesOptions};
use usage_synth::config::AppConfig;
use usage_synth::error::{Error, Result};
use usage_synth::io::markup::write_xml_file;
use usage_synth::io::series_csv::{export_series_csv, load_series_csv};
use usage_synth::logging;
use usage_synth::plot::render_ascii_chart;
use usage_synth::records::{RecordComposer, ReferenceContext};
use usage_synth::series::{SeriesPoint, SeriesSummary, generate_series};

/// Rows echoed to stdout ahead of the summary.
const PREVIEW_ROWS: usize = 5;

fn main() {
    logging::init();

    let command = match cli::parse_args() {
        Ok(cmd) => cmd,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };

    let outcome = match command {
        Command::Help => {
            cli::print_usage();
            Ok(())
        }
        Command::Series(opts) => run_series(&opts),
        Command::Plot(opts) => run_plot(&opts),
        Command::Records(opts) => run_records(&opts),
    };

    if let Err(e) = outcome {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Loads `--config` if given, otherwise the named preset, then validates.
fn load_config(config: Option<&Path>, preset: Option<&str>) -> Result<AppConfig> {
    let cfg = match (config, preset) {
        (Some(path), _) => AppConfig::from_toml_file(path)?,
        (None, Some(name)) => AppConfig::from_preset(name)?,
        (None, None) => AppConfig::controlled(),
    };

    let errors = cfg.validate();
    if !errors.is_empty() {
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(Error::Config(joined));
    }
    Ok(cfg)
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

fn run_series(opts: &SeriesOptions) -> Result<()> {
    let mut cfg = load_config(opts.config.as_deref(), opts.preset.as_deref())?;
    if let Some(seed) = opts.seed {
        cfg.series.seed = Some(seed);
    }

    let params = cfg.series_params()?;
    let mut rng = rng_from(cfg.series.seed);
    let series = generate_series(&params, &mut rng)?;

    let out = opts
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.series.output));
    export_series_csv(&series.points, &out)?;

    print_preview(&series.points);
    println!("\n{}", SeriesSummary::from_points(&series.points));
    if !opts.no_plot {
        println!(
            "\n{}",
            render_ascii_chart(&series.points, cfg.series.plot_width, cfg.series.plot_height)
        );
    }
    eprintln!("Series written to {}", out.display());
    Ok(())
}

fn run_plot(opts: &PlotOptions) -> Result<()> {
    let points = load_series_csv(&opts.csv)?;
    let defaults = AppConfig::default().series;
    print_preview(&points);
    println!("\n{}", SeriesSummary::from_points(&points));
    println!(
        "\n{}",
        render_ascii_chart(&points, defaults.plot_width, defaults.plot_height)
    );
    Ok(())
}

fn run_records(opts: &RecordsOptions) -> Result<()> {
    let mut cfg = load_config(opts.config.as_deref(), None)?;
    if let Some(seed) = opts.seed {
        cfg.records.seed = Some(seed);
    }
    let r = &cfg.records;

    let data_dir = opts
        .data_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&r.data_dir));
    let ctx = ReferenceContext::load(&data_dir, &r.files, opts.kind.tables());
    info!(
        kind = opts.kind.name(),
        data_dir = %data_dir.display(),
        "reference tables loaded"
    );

    let composer = RecordComposer::new(&ctx, opts.kind, Local::now().naive_local())
        .with_id_offset(r.id_offset)
        .with_source(r.source.as_str())
        .with_created_by(r.created_by.as_str());
    let mut rng = rng_from(r.seed);
    let document = composer.compose_document(opts.count, &mut rng)?;

    let out = opts
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(opts.kind.file_name()));
    let indent = (r.indent > 0).then_some(r.indent);
    write_xml_file(&document, &out, indent)?;

    println!(
        "Wrote {} {} record(s) to {}",
        opts.count,
        opts.kind.name(),
        out.display()
    );
    Ok(())
}

fn print_preview(points: &[SeriesPoint]) {
    println!("First {} of {} rows:", PREVIEW_ROWS.min(points.len()), points.len());
    for p in points.iter().take(PREVIEW_ROWS) {
        println!("  {p}");
    }
}
