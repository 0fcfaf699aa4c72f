use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use gliderprof_core::status::{
    build_profile_status, merge_profile_status, read_status_file, write_status_csv,
    write_status_file,
};
use gliderprof_core::stream::yo_from_config;
use gliderprof_core::{find_profiles, ProfileConfig, ProfileIndex, Sample};
use gliderprof_parser::{
    parse_glider_file, parse_with_parsers, DbaParser, ErddapCsvParser, GliderParser,
    ParsedGliderFile,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod output;

use output::{print_index, IndexRow, OutputFormat};

const CONFIG_ENV: &str = "GLIDERPROF_CONFIG";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Split glider depth records into dive and climb profiles",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the profile windows found in each file
    Index(IndexArgs),
    /// Merge per-profile summaries into a JSON status file
    Status(StatusArgs),
    /// Print a JSON status file as CSV
    StatusCsv {
        status_file: PathBuf,
    },
}

#[derive(Args, Debug)]
struct IndexArgs {
    /// Input files or glob patterns
    #[arg(required = true)]
    files: Vec<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
    #[command(flatten)]
    profile: ProfileArgs,
}

#[derive(Args, Debug)]
struct StatusArgs {
    /// Input files or glob patterns
    #[arg(required = true)]
    files: Vec<String>,
    #[arg(long)]
    status_file: PathBuf,
    /// Discard existing entries instead of merging with them
    #[arg(long)]
    clobber: bool,
    #[command(flatten)]
    profile: ProfileArgs,
}

#[derive(Args, Debug, Default)]
struct ProfileArgs {
    /// TOML profile configuration (defaults to $GLIDERPROF_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    depth_field: Option<String>,
    #[arg(long)]
    time_field: Option<String>,
    /// Resampling interval in seconds
    #[arg(long)]
    interval: Option<f64>,
    /// Master time sensor for dba files
    #[arg(long)]
    time_sensor: Option<String>,
}

impl ProfileArgs {
    fn load_config(&self) -> Result<ProfileConfig> {
        let path = self
            .config
            .clone()
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match path {
            Some(path) => ProfileConfig::from_path(&path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ProfileConfig::default(),
        };

        if let Some(field) = &self.depth_field {
            config.depth_field = field.clone();
        }
        if let Some(field) = &self.time_field {
            config.time_field = field.clone();
        }
        if let Some(interval) = self.interval {
            config.resample_interval_seconds = interval;
        }
        config.validate()?;
        debug!(?config, "profile configuration");
        Ok(config)
    }

    fn parse(&self, content: &str) -> Result<ParsedGliderFile> {
        let parsed = match &self.time_sensor {
            Some(sensor) => {
                let dba = DbaParser::with_time_sensor(sensor.clone());
                let parsers: [&dyn GliderParser; 2] = [&dba, &ErddapCsvParser];
                parse_with_parsers(content, &parsers)?
            }
            None => parse_glider_file(content)?,
        };
        Ok(parsed)
    }
}

struct ProcessedFile {
    source: String,
    samples: Vec<Sample>,
    index: ProfileIndex,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Index(args) => run_index(args),
        Command::Status(args) => run_status(args),
        Command::StatusCsv { status_file } => {
            let statuses = read_status_file(&status_file)
                .with_context(|| format!("failed to read {}", status_file.display()))?;
            write_status_csv(io::stdout().lock(), &statuses)?;
            Ok(())
        }
    }
}

fn run_index(args: IndexArgs) -> Result<()> {
    let config = args.profile.load_config()?;
    let (processed, failures) = process_all(&args.files, &args.profile, &config)?;

    let rows: Vec<IndexRow> = processed
        .iter()
        .flat_map(|file| {
            file.index
                .windows
                .iter()
                .enumerate()
                .map(|(profile, window)| IndexRow::new(&file.source, profile, window))
        })
        .collect();
    print_index(&rows, args.format)?;

    info!(
        files = processed.len(),
        failures,
        profiles = rows.len(),
        "index finished"
    );
    Ok(())
}

fn run_status(args: StatusArgs) -> Result<()> {
    let config = args.profile.load_config()?;

    let existing = if args.clobber {
        Vec::new()
    } else {
        read_status_file(&args.status_file)
            .with_context(|| format!("failed to read {}", args.status_file.display()))?
    };
    let known = existing.len();

    let (processed, failures) = process_all(&args.files, &args.profile, &config)?;
    let fresh = processed
        .iter()
        .flat_map(|file| build_profile_status(&file.samples, &file.index.windows, &file.source))
        .collect();
    let merged = merge_profile_status(existing, fresh);

    write_status_file(&args.status_file, &merged)
        .with_context(|| format!("failed to write {}", args.status_file.display()))?;

    info!(
        status_file = %args.status_file.display(),
        previous = known,
        total = merged.len(),
        failures,
        "status file updated"
    );
    Ok(())
}

/// Runs every matching file through the engine. A failing file is logged and counted.
fn process_all(
    patterns: &[String],
    args: &ProfileArgs,
    config: &ProfileConfig,
) -> Result<(Vec<ProcessedFile>, usize)> {
    let paths = expand_patterns(patterns)?;
    if paths.is_empty() {
        bail!("no input files matched {patterns:?}");
    }

    let mut processed = Vec::with_capacity(paths.len());
    let mut failures = 0;
    for path in paths {
        match process_file(&path, args, config) {
            Ok(file) => {
                info!(
                    file = %path.display(),
                    records = file.samples.len(),
                    profiles = file.index.windows.len(),
                    rejected = file.index.rejected.len(),
                    skipped = file.index.skipped.len(),
                    "indexed"
                );
                processed.push(file);
            }
            Err(err) => {
                let reason = format!("{err:#}");
                warn!(file = %path.display(), error = %reason, "skipping file");
                failures += 1;
            }
        }
    }
    Ok((processed, failures))
}

fn process_file(path: &Path, args: &ProfileArgs, config: &ProfileConfig) -> Result<ProcessedFile> {
    let content = fs::read_to_string(path).context("failed to read file")?;
    let parsed = args.parse(&content)?;
    debug!(
        file = %path.display(),
        format = %parsed.format,
        time_sensor = %parsed.metadata.time_sensor,
        rows = parsed.row_count(),
        "parsed glider file"
    );
    let samples = yo_from_config(&parsed.df, config)?;
    let index = find_profiles(&samples, config)?;

    let source = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(ProcessedFile {
        source,
        samples,
        index,
    })
}

fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let before = paths.len();
        for entry in glob::glob(pattern).with_context(|| format!("invalid pattern {pattern}"))? {
            match entry {
                Ok(path) if path.is_file() => paths.push(path),
                Ok(_) => {}
                Err(err) => warn!(error = %err, "could not read path from glob pattern"),
            }
        }
        if paths.len() == before {
            warn!(pattern = %pattern, "pattern matched no files");
        }
    }
    Ok(paths)
}
