//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_export_adapter::CsvExportAdapter;
use crate::adapters::csv_series_adapter::CsvSeriesAdapter;
use crate::adapters::csv_universe_adapter::CsvUniverseAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::layered_config_adapter::LayeredConfigAdapter;
use crate::adapters::table_report_adapter::TableReportAdapter;
use crate::domain::error::ScanError;
use crate::domain::instrument::Universe;
use crate::domain::scan_config::{self, ScanConfig};
use crate::domain::scanner::{ScanOutcome, run_scan};
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;
use crate::ports::series_port::SeriesPort;
use crate::ports::universe_port::UniversePort;

#[derive(Parser, Debug)]
#[command(name = "marketscan", about = "Momentum scanner for equities and crypto")]
pub struct Cli {
    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan the universe and print the ranked table
    Scan {
        #[arg(short, long)]
        config: PathBuf,
        #[command(flatten)]
        overrides: ScanOverrides,
        /// Also write the ranked results as CSV
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Check a configuration and print the resolved settings
    Validate {
        #[arg(short, long)]
        config: PathBuf,
        #[command(flatten)]
        overrides: ScanOverrides,
    },
    /// List the instruments a scan would cover
    Universe {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        category: Option<String>,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct ScanOverrides {
    /// Scoring policy: strict or graduated
    #[arg(long)]
    pub policy: Option<String>,
    /// Category filter: all, equity or crypto
    #[arg(long)]
    pub category: Option<String>,
    /// Maximum number of ranked rows (0 = no cap)
    #[arg(long)]
    pub top: Option<usize>,
    /// Keep results scoring zero or less
    #[arg(long)]
    pub all: bool,
    /// Instruments evaluated concurrently
    #[arg(long)]
    pub workers: Option<usize>,
    /// Look up headlines for the best results
    #[arg(long)]
    pub news: bool,
}

impl ScanOverrides {
    pub fn apply(&self, layered: &mut LayeredConfigAdapter<'_>) {
        layered.set_opt("scoring", "policy", self.policy.as_deref());
        layered.set_opt("universe", "category", self.category.as_deref());
        layered.set_opt("scan", "max_results", self.top);
        layered.set_opt("scan", "workers", self.workers);
        if self.all {
            layered.set("scan", "drop_non_positive", "false");
        }
        if self.news {
            layered.set("news", "enabled", "true");
        }
    }
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Scan {
            config,
            overrides,
            export,
        } => run_scan_command(&config, &overrides, export.as_deref()),
        Command::Validate { config, overrides } => run_validate(&config, &overrides),
        Command::Universe { config, category } => run_universe(&config, category.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ScanError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

/// Resolves the scan settings with command-line overrides applied.
pub fn resolve_scan_config(
    config: &dyn ConfigPort,
    overrides: &ScanOverrides,
) -> Result<ScanConfig, ScanError> {
    let mut layered = LayeredConfigAdapter::new(config);
    overrides.apply(&mut layered);
    scan_config::from_config(&layered)
}

/// Path from the config, relative paths taken from the config file's directory.
fn config_path(
    config: &dyn ConfigPort,
    base_dir: &Path,
    section: &str,
    key: &str,
) -> Result<PathBuf, ScanError> {
    let raw = config
        .get_string(section, key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ScanError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        })?;
    let path = PathBuf::from(raw.trim());
    Ok(if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    })
}

fn config_dir(config_file: &Path) -> PathBuf {
    config_file
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

pub fn load_universe(config: &dyn ConfigPort, base_dir: &Path) -> Result<Universe, ScanError> {
    let path = config_path(config, base_dir, "universe", "path")?;
    let universe = CsvUniverseAdapter::new(path.clone()).load_universe()?;
    if universe.is_empty() {
        warn!(path = %path.display(), "universe file lists no instruments");
    }
    Ok(universe)
}

/// Builds the series source named by `[data] source`.
pub fn build_series_port(
    config: &dyn ConfigPort,
    base_dir: &Path,
) -> Result<Box<dyn SeriesPort>, ScanError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "csv".to_string());

    match source.trim().to_lowercase().as_str() {
        "csv" => {
            let dir = config_path(config, base_dir, "data", "csv_dir")?;
            Ok(Box::new(CsvSeriesAdapter::new(dir)))
        }
        #[cfg(feature = "net")]
        "yahoo" => {
            use crate::adapters::yahoo_adapter::{DEFAULT_BASE_URL, YahooAdapter};
            let base_url = config
                .get_string("data", "yahoo_url")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
            let timeout = config
                .get_int("data", "timeout_secs")?
                .map(|t| u64::try_from(t).ok().filter(|t| *t > 0))
                .unwrap_or(Some(10))
                .ok_or_else(|| {
                    ScanError::invalid("data", "timeout_secs", "timeout_secs must be positive")
                })?;
            Ok(Box::new(YahooAdapter::new(
                base_url,
                std::time::Duration::from_secs(timeout),
            )?))
        }
        #[cfg(not(feature = "net"))]
        "yahoo" => Err(ScanError::invalid(
            "data",
            "source",
            "the yahoo source needs a build with the `net` feature",
        )),
        other => Err(ScanError::invalid(
            "data",
            "source",
            format!("unknown source '{}' (expected csv or yahoo)", other),
        )),
    }
}

#[cfg(feature = "net")]
fn fetch_news(outcome: &mut ScanOutcome, config: &dyn ConfigPort, settings: &ScanConfig) {
    use crate::adapters::google_news_adapter::{DEFAULT_BASE_URL, GoogleNewsAdapter};
    use crate::domain::news::attach_news;
    let base_url = config
        .get_string("news", "url")
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    match GoogleNewsAdapter::new(base_url, std::time::Duration::from_secs(10)) {
        Ok(adapter) => {
            attach_news(outcome, &adapter, &settings.news);
        }
        Err(e) => warn!(error = %e, "news disabled"),
    }
}

#[cfg(not(feature = "net"))]
fn fetch_news(_outcome: &mut ScanOutcome, _config: &dyn ConfigPort, _settings: &ScanConfig) {
    warn!("news lookup needs a build with the `net` feature; skipping");
}

/// Loads everything, runs the scan and returns the outcome.
pub fn execute_scan(
    config_file: &Path,
    overrides: &ScanOverrides,
) -> Result<ScanOutcome, ScanError> {
    let config = load_config(config_file)?;
    let settings = resolve_scan_config(&config, overrides)?;
    let base_dir = config_dir(config_file);

    let universe = load_universe(&config, &base_dir)?;
    let series_port = build_series_port(&config, &base_dir)?;

    let mut outcome = run_scan(&universe, series_port.as_ref(), &settings, None);
    if settings.news.enabled && !outcome.is_empty() {
        fetch_news(&mut outcome, &config, &settings);
    }
    Ok(outcome)
}

fn run_scan_command(
    config_file: &Path,
    overrides: &ScanOverrides,
    export: Option<&Path>,
) -> Result<(), ScanError> {
    let outcome = execute_scan(config_file, overrides)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    TableReportAdapter::default().render(&outcome, &mut out)?;
    out.flush()?;

    if let Some(path) = export {
        CsvExportAdapter.write(&outcome, &path.to_string_lossy())?;
        info!(path = %path.display(), rows = outcome.results.len(), "results exported");
    }
    Ok(())
}

fn run_validate(config_file: &Path, overrides: &ScanOverrides) -> Result<(), ScanError> {
    let config = load_config(config_file)?;
    let settings = resolve_scan_config(&config, overrides)?;
    let base_dir = config_dir(config_file);
    let universe = load_universe(&config, &base_dir)?;
    build_series_port(&config, &base_dir)?;

    let stdout = io::stdout();
    write_settings(&mut stdout.lock(), &settings, &universe)
}

/// Resolved settings as printed by `validate`.
pub fn write_settings(
    out: &mut dyn Write,
    settings: &ScanConfig,
    universe: &Universe,
) -> Result<(), ScanError> {
    let selected = universe.filtered(settings.category).len();
    let ind = &settings.indicators;
    writeln!(out, "Configuration OK")?;
    writeln!(
        out,
        "  universe:    {} instruments, {} selected ({})",
        universe.count(),
        selected,
        settings.category.as_str()
    )?;
    writeln!(
        out,
        "  data:        {} at {} (min {} bars, {} for a full indicator set)",
        settings.request.lookback.as_str(),
        settings.request.interval.as_str(),
        settings.min_bars,
        ind.full_history_len()
    )?;
    writeln!(
        out,
        "  indicators:  bar={} rsi={} volume={} short={} medium={} long={}",
        ind.bar_mode.as_str(),
        ind.rsi_period,
        ind.volume_window,
        ind.short_window,
        ind.medium_window,
        ind.long_window
    )?;
    writeln!(out, "  policy:      {}", settings.policy)?;
    writeln!(
        out,
        "  disqualify on undefined indicator: {}",
        settings.require_all_indicators
    )?;
    match settings.max_results {
        Some(n) => writeln!(out, "  results:     top {}", n)?,
        None => writeln!(out, "  results:     no cap")?,
    }
    writeln!(out, "  workers:     {}", settings.workers)?;
    Ok(())
}

fn run_universe(config_file: &Path, category: Option<&str>) -> Result<(), ScanError> {
    let config = load_config(config_file)?;
    let overrides = ScanOverrides {
        category: category.map(str::to_string),
        ..ScanOverrides::default()
    };
    let settings = resolve_scan_config(&config, &overrides)?;
    let universe = load_universe(&config, &config_dir(config_file))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let selected = universe.filtered(settings.category);
    for inst in &selected {
        writeln!(
            out,
            "{:<14} {:<8} {}",
            inst.symbol,
            inst.category.as_str(),
            inst.display_name()
        )?;
    }
    writeln!(out, "{} of {} instruments", selected.len(), universe.count())?;
    Ok(())
}
