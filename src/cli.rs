use std::env;
use std::path::PathBuf;

use crate::records::RecordKind;

/// A parsed command line.
#[derive(Debug, PartialEq)]
pub enum Command {
    Series(SeriesOptions),
    Plot(PlotOptions),
    Records(RecordsOptions),
    Help,
}

#[derive(Debug, Default, PartialEq)]
pub struct SeriesOptions {
    pub config: Option<PathBuf>,
    pub preset: Option<String>,
    pub seed: Option<u64>,
    pub out: Option<PathBuf>,
    pub no_plot: bool,
}

#[derive(Debug, PartialEq)]
pub struct PlotOptions {
    pub csv: PathBuf,
}

#[derive(Debug, PartialEq)]
pub struct RecordsOptions {
    pub kind: RecordKind,
    pub count: usize,
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub out: Option<PathBuf>,
}

pub fn parse_args() -> Result<Command, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

pub fn parse_args_from(args: Vec<String>) -> Result<Command, String> {
    let Some((first, rest)) = args.split_first() else {
        return Ok(Command::Series(SeriesOptions {
            preset: Some("controlled".to_string()),
            ..SeriesOptions::default()
        }));
    };
    match first.as_str() {
        "--help" | "-h" | "help" => Ok(Command::Help),
        "series" => parse_series(rest),
        "plot" => parse_plot(rest),
        "records" => parse_records(rest),
        // Bare options run the series command.
        s if s.starts_with('-') => parse_series(&args),
        other => Err(format!(
            "unknown command: {other} (expected series, plot or records)"
        )),
    }
}

fn parse_series(args: &[String]) -> Result<Command, String> {
    let mut i = 0usize;
    let mut opts = SeriesOptions::default();

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --config (expected a TOML file path)")?;
                if opts.config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name =
                    args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if opts.preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--seed" => {
                i += 1;
                opts.seed = Some(parse_seed(args, i)?);
            }
            "--out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --out (expected a file path)")?;
                if opts.out.replace(PathBuf::from(path)).is_some() {
                    return Err("--out provided more than once".to_string());
                }
            }
            "--no-plot" => opts.no_plot = true,
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.config.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--config` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    if opts.config.is_none() && opts.preset.is_none() {
        opts.preset = Some("controlled".to_string());
    }

    Ok(Command::Series(opts))
}

fn parse_plot(args: &[String]) -> Result<Command, String> {
    match args {
        [flag] if flag == "--help" || flag == "-h" => Ok(Command::Help),
        [path] if !path.starts_with('-') => Ok(Command::Plot(PlotOptions {
            csv: PathBuf::from(path),
        })),
        [] => Err("missing value for plot (expected a CSV file path)".to_string()),
        _ => Err("plot takes exactly one CSV file path".to_string()),
    }
}

fn parse_records(args: &[String]) -> Result<Command, String> {
    let mut i = 0usize;
    let mut kind = None;
    let mut count = None;
    let mut config = None;
    let mut data_dir = None;
    let mut seed = None;
    let mut out = None;

    while i < args.len() {
        match args[i].as_str() {
            "--kind" => {
                i += 1;
                let name = args.next_or_err(i, "missing value for --kind (expected a record kind)")?;
                let parsed = RecordKind::from_name(name).ok_or_else(|| {
                    format!(
                        "unknown record kind \"{name}\", available: {}",
                        RecordKind::NAMES.join(", ")
                    )
                })?;
                kind = Some(parsed);
            }
            "--count" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --count (expected a number)")?;
                let n = raw
                    .parse::<usize>()
                    .map_err(|_| format!("--count value \"{raw}\" is not a valid number"))?;
                if n == 0 {
                    return Err("--count must be at least 1".to_string());
                }
                count = Some(n);
            }
            "--config" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --config (expected a TOML file path)")?;
                config = Some(PathBuf::from(path));
            }
            "--data-dir" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --data-dir (expected a directory)")?;
                data_dir = Some(PathBuf::from(path));
            }
            "--seed" => {
                i += 1;
                seed = Some(parse_seed(args, i)?);
            }
            "--out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --out (expected a file path)")?;
                out = Some(PathBuf::from(path));
            }
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    Ok(Command::Records(RecordsOptions {
        kind: kind.ok_or("records requires --kind")?,
        count: count.ok_or("records requires --count")?,
        config,
        data_dir,
        seed,
        out,
    }))
}

fn parse_seed(args: &[String], i: usize) -> Result<u64, String> {
    let raw = args.next_or_err(i, "missing value for --seed (expected a u64)")?;
    raw.parse::<u64>()
        .map_err(|_| format!("--seed value \"{raw}\" is not a valid u64"))
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("usage-synth: synthetic license usage series and record generator");
    eprintln!();
    eprintln!("Usage:");
    eprintln!(
        "  usage-synth series [--config <path> | --preset <name>] [--seed <u64>] [--out <path>] [--no-plot]"
    );
    eprintln!("  usage-synth plot <csv-path>");
    eprintln!(
        "  usage-synth records --kind <{}> --count <n> [--config <path>] [--data-dir <dir>] [--seed <u64>] [--out <path>]",
        RecordKind::NAMES.join("|")
    );
    eprintln!("  usage-synth --help");
    eprintln!();
    eprintln!("With no command, `series --preset controlled` is run.");
    eprintln!("Set RUST_LOG to change diagnostic verbosity (default: info).");
}
