use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use log::LevelFilter;
#[cfg(not(feature = "tracing"))]
use luma_convert::core::init_with_level;
use luma_convert::core::level_from_name;
use luma_convert::{convert, ConvertConfig, ConvertError, ExpansionMode, PackPolicy};

#[derive(Parser, Debug)]
#[command(name = "luma-convert", version, about = "Convert a colour image to grayscale")]
struct Cli {
    /// Input image. Defaults to `input.png` in the working directory.
    input: Option<PathBuf>,

    /// JSON run configuration; replaces INPUT, --mode, --pack and --out-dir.
    #[arg(long, conflicts_with_all = ["input", "mode", "pack", "out_dir"])]
    config: Option<PathBuf>,

    /// Expansion mode: 0 scales samples by 255, 1 uses them directly.
    #[arg(long)]
    mode: Option<u32>,

    /// Handling of gray levels above 255: `truncate` or `clamp`.
    #[arg(long)]
    pack: Option<PackPolicy>,

    /// Directory for generated output names.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Write a JSON report of the run to this path.
    #[arg(long)]
    report: Option<PathBuf>,

    /// off, error, warn, info, debug or trace.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit JSON log lines (requires the `tracing` feature).
    #[arg(long)]
    json_logs: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let parsed = level_from_name(&cli.log_level);
    init_logging(&cli, parsed.unwrap_or(LevelFilter::Info));
    if parsed.is_none() {
        log::warn!("unknown log level '{}', using info", cli.log_level);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "tracing")]
fn init_logging(cli: &Cli, level: LevelFilter) {
    let _ = tracing_log::LogTracer::init();
    luma_convert::core::init_tracing(cli.json_logs);
    log::set_max_level(level);
}

#[cfg(not(feature = "tracing"))]
fn init_logging(cli: &Cli, level: LevelFilter) {
    if init_with_level(level).is_err() {
        eprintln!("logger already initialized");
    }
    if cli.json_logs {
        log::warn!("--json-logs needs the `tracing` feature; using plain logs");
    }
}

fn build_config(cli: &Cli) -> Result<ConvertConfig, ConvertError> {
    if let Some(path) = cli.config.as_ref() {
        let mut cfg = ConvertConfig::load_json(path)?;
        if let Some(report) = cli.report.as_ref() {
            cfg.report_path = Some(report.to_string_lossy().into_owned());
        }
        return Ok(cfg);
    }

    let mut cfg = match cli.input.as_ref() {
        Some(input) => ConvertConfig::for_input(input.to_string_lossy()),
        None => ConvertConfig::default(),
    };
    let mode = cli.mode.map(ExpansionMode::try_from).transpose()?;
    for spec in &mut cfg.outputs {
        if let Some(mode) = mode {
            spec.mode = mode;
        }
        if let Some(pack) = cli.pack {
            spec.pack = pack;
        }
    }
    cfg.output_dir = cli
        .out_dir
        .as_ref()
        .map(|dir| dir.to_string_lossy().into_owned());
    cfg.report_path = cli
        .report
        .as_ref()
        .map(|path| path.to_string_lossy().into_owned());
    Ok(cfg)
}

fn run(cli: Cli) -> Result<(), ConvertError> {
    let cfg = build_config(&cli)?;
    let report = convert::run(&cfg)?;

    if let Some(path) = cfg.report_path() {
        report.write_json(&path)?;
        log::info!("wrote report JSON to {}", path.display());
    }
    log::info!(
        "converted {} in {} ms",
        report.input_path,
        report.timings_ms.total
    );
    Ok(())
}
