use std::fs::{self, File};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use glob::glob;
use gw2link_core::{ByteSource, FileSource, LinkError, PositionTrail, SectionedTrail, Snapshot};
use time::OffsetDateTime;
use time::macros::format_description;

#[cfg(windows)]
mod shm;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GW2LINK_BUILD_COMMIT"),
    " ",
    env!("GW2LINK_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "gw2link")]
#[command(version = VERSION)]
#[command(
    about = "Reads the game client's link segment and prints a JSON snapshot.",
    long_about = None,
    after_help = "Examples:\n  gw2link read\n  gw2link read --source /dev/shm/MumbleLink --pretty\n  gw2link trail --source segment.bin -o trail.txt"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Segment file or glob pattern (e.g. '/dev/shm/MumbleLink*')
    #[arg(long, env = "GW2LINK_SOURCE")]
    source: Option<PathBuf>,

    /// Name of the shared-memory mapping, used when no --source is given (Windows)
    #[arg(long, env = "GW2LINK_SHM_NAME", default_value = "MumbleLink")]
    shm_name: String,

    /// Read attempts before giving up on a segment that keeps changing (0 disables the check)
    #[arg(long, default_value_t = 3)]
    stable_reads: usize,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read one snapshot and print it as JSON.
    Read {
        #[command(flatten)]
        source: SourceArgs,

        /// Write the snapshot to a file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
    /// Poll the segment and log each new minimap position.
    Trail {
        #[command(flatten)]
        source: SourceArgs,

        /// Trail log path (default: YYYYMMDD-HHMMSS.txt, UTC)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Delay between polls in milliseconds
        #[arg(long, default_value_t = 50)]
        interval_ms: u64,

        /// Stop after this many polls (default: run until interrupted)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        samples: Option<u64>,

        /// Simplify each map section with this tolerance, in minimap units;
        /// the log is rewritten after every new point
        #[arg(long, value_name = "TOL", value_parser = clap::value_parser!(i64).range(0..))]
        simplify: Option<i64>,

        /// Thin points by radial distance before simplifying (faster, coarser)
        #[arg(long, requires = "simplify")]
        radial_prepass: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("warn"));
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Read {
            source,
            output,
            pretty,
            quiet,
        } => cmd_read(source, output, pretty, quiet),
        Commands::Trail {
            source,
            output,
            interval_ms,
            samples,
            simplify,
            radial_prepass,
            quiet,
        } => cmd_trail(
            source,
            output,
            interval_ms,
            samples,
            simplify.map(|tolerance| (tolerance, !radial_prepass)),
            quiet,
        ),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

impl From<LinkError> for CliError {
    fn from(err: LinkError) -> Self {
        let hint = match &err {
            LinkError::Unstable { .. } => Some("raise --stable-reads or retry".to_string()),
            LinkError::Assemble(_) => Some(
                "the client publishes its identity only once a character is loaded".to_string(),
            ),
            LinkError::Decode(_) | LinkError::Source(_) => None,
        };
        CliError::new(err.to_string(), hint)
    }
}

fn cmd_read(
    source: SourceArgs,
    output: Option<PathBuf>,
    pretty: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let stable_reads = source.stable_reads;
    let mut link_source = open_source(&source)?;
    let snapshot = read_one(link_source.as_mut(), stable_reads)?;
    let json = serialize_snapshot(&snapshot, pretty)?;

    let Some(output) = output else {
        println!("{}", json);
        return Ok(());
    };

    create_parent_dir(&output)?;
    fs::write(&output, json)
        .with_context(|| format!("Failed to write snapshot: {}", output.display()))?;
    if !quiet {
        eprintln!("OK: snapshot written -> {}", output.display());
    }
    Ok(())
}

fn cmd_trail(
    source: SourceArgs,
    output: Option<PathBuf>,
    interval_ms: u64,
    samples: Option<u64>,
    simplify: Option<(i64, bool)>,
    quiet: bool,
) -> Result<(), CliError> {
    let stable_reads = source.stable_reads;
    let mut link_source = open_source(&source)?;
    let output = match output {
        Some(path) => path,
        None => default_trail_path()?,
    };
    create_parent_dir(&output)?;
    let mut log_file = File::create(&output)
        .with_context(|| format!("Failed to create trail log: {}", output.display()))?;

    let interval = Duration::from_millis(interval_ms);
    let mut trail = PositionTrail::new();
    let mut sections = SectionedTrail::new();
    let mut polls = 0u64;
    loop {
        match read_one(link_source.as_mut(), stable_reads) {
            Ok(snapshot) => {
                if let Some(event) = trail.observe(&snapshot) {
                    log::info!(
                        "map {} position [{}, {}]",
                        snapshot.map_id,
                        snapshot.position[0],
                        snapshot.position[1]
                    );
                    let written = match simplify {
                        Some((tolerance, highest_quality)) => {
                            sections.push(event);
                            let text = sections.render_simplified(tolerance, highest_quality);
                            rewrite(&mut log_file, &text)
                        }
                        None => writeln!(log_file, "{}", event),
                    };
                    written.with_context(|| {
                        format!("Failed to write trail log: {}", output.display())
                    })?;
                }
            }
            Err(err) => log::warn!("skipping sample: {}", err),
        }

        polls += 1;
        if samples.is_some_and(|limit| polls >= limit) {
            break;
        }
        thread::sleep(interval);
    }

    if !quiet {
        eprintln!("OK: trail written -> {}", output.display());
    }
    Ok(())
}

fn rewrite(file: &mut File, text: &str) -> std::io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(text.as_bytes())
}

fn read_one(source: &mut dyn ByteSource, stable_reads: usize) -> Result<Snapshot, LinkError> {
    let link = if stable_reads == 0 {
        gw2link_core::read_link(source)?
    } else {
        gw2link_core::read_stable_link(source, stable_reads)?
    };
    Ok(gw2link_core::assemble_link(&link)?)
}

fn serialize_snapshot(snapshot: &Snapshot, pretty: bool) -> Result<String, CliError> {
    if pretty {
        serde_json::to_string_pretty(snapshot)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(snapshot)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn open_source(args: &SourceArgs) -> Result<Box<dyn ByteSource>, CliError> {
    match &args.source {
        Some(pattern) => {
            let path = resolve_source_path(pattern)?;
            validate_source_file(&path)?;
            let source = FileSource::open(&path).map_err(|err| {
                CliError::new(format!("cannot open {}: {}", path.display(), err), None)
            })?;
            log::info!("reading link segment from {}", source.path().display());
            Ok(Box::new(source))
        }
        None => open_shared_memory(&args.shm_name),
    }
}

#[cfg(windows)]
fn open_shared_memory(name: &str) -> Result<Box<dyn ByteSource>, CliError> {
    let source = shm::SharedMemorySource::open(name).map_err(|err| {
        CliError::new(
            format!("cannot open shared memory '{}': {}", name, err),
            Some("start the game client first, or pass --source <file>".to_string()),
        )
    })?;
    Ok(Box::new(source))
}

#[cfg(not(windows))]
fn open_shared_memory(name: &str) -> Result<Box<dyn ByteSource>, CliError> {
    Err(CliError::new(
        format!("no link source given (named mapping '{}' is Windows-only)", name),
        Some(
            "pass --source <file>, e.g. --source '/dev/shm/MumbleLink*', or set GW2LINK_SOURCE"
                .to_string(),
        ),
    ))
}

fn default_trail_path() -> Result<PathBuf, CliError> {
    let stamp = OffsetDateTime::now_utc()
        .format(format_description!("[year][month][day]-[hour][minute][second]"))
        .context("Failed to format trail file name")?;
    Ok(PathBuf::from(format!("{}.txt", stamp)))
}

fn create_parent_dir(path: &Path) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    Ok(())
}

fn validate_source_file(path: &Path) -> Result<(), CliError> {
    if !path.exists() {
        return Err(CliError::new(
            format!("source not found: {}", path.display()),
            Some(
                "is the game client running? pass a segment file or '/dev/shm/MumbleLink*'"
                    .to_string(),
            ),
        ));
    }
    if !path.is_file() {
        return Err(CliError::new(
            format!("source is not a file: {}", path.display()),
            Some("pass a segment file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_source_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid source pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid source pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("is the game client running? check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                listed,
                more
            ),
            Some("pass a single segment file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
