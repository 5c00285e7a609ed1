//! scout-export: render a project's version history as json, csv, or a
//! paginated document.
//!
//! Reads a json version history (as written by `--format json`) from a file
//! or stdin and writes the artifact to a file or stdout. Logs go to stderr,
//! or to `LOG_FILE` when set.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scout_core::VersionHistory;
use scout_export::{ExportConfig, ExportEngine, ExportFormat};

#[derive(Parser)]
#[command(name = "scout-export")]
#[command(author, version, about = "Export scout version history")]
struct Cli {
    /// Output format: json, csv, or document (pdf and doc are aliases)
    #[arg(short, long, default_value = "json")]
    format: String,

    /// Version history json file (default: stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Body lines per document page
    #[arg(long)]
    page_lines: Option<usize>,

    /// Wrap width for document text
    #[arg(long)]
    line_width: Option<usize>,

    /// Emit logs as json
    #[arg(long)]
    log_json: bool,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_json);

    let format: ExportFormat = cli.format.parse()?;

    let mut config = ExportConfig::from_env();
    if let Some(lines) = cli.page_lines {
        config = config.with_page_lines(lines);
    }
    if let Some(width) = cli.line_width {
        config = config.with_line_width(width);
    }

    let raw = read_input(cli.input.as_deref())?;
    let history: VersionHistory =
        serde_json::from_slice(&raw).context("input is not a json version history")?;
    check_sequences(&history);

    let artifact = ExportEngine::new(config).export(&history, format)?;
    write_output(cli.output.as_deref(), &artifact.bytes)?;

    info!(
        %format,
        file_name = %artifact.file_name,
        media_type = artifact.media_type,
        "Export written"
    );
    Ok(())
}

/// Console or file logging. The returned guard flushes the file writer on
/// drop.
fn init_tracing(json: bool) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "scout_export=info".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    match std::env::var("LOG_FILE").ok() {
        Some(path) => {
            let path = Path::new(&path);
            let dir = path.parent().unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .and_then(|f| f.to_str())
                .unwrap_or("scout-export.log");
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            if json {
                registry
                    .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
                    .init();
            } else {
                registry
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_ansi(false)
                            .with_writer(writer),
                    )
                    .init();
            }
            Some(guard)
        }
        None => {
            if json {
                registry
                    .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
                    .init();
            } else {
                registry
                    .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
                    .init();
            }
            None
        }
    }
}

fn read_input(path: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    match path {
        Some(path) => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
            if buf.is_empty() {
                bail!("no input on stdin; pass --input or pipe a version history");
            }
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Warn about sequence gaps; export proceeds regardless.
fn check_sequences(history: &VersionHistory) {
    for pair in history.records.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if prev.project_id == next.project_id && next.sequence != prev.sequence + 1 {
            warn!(
                project_id = %next.project_id,
                after = prev.sequence,
                found = next.sequence,
                "Version sequence is not gapless"
            );
        }
    }
    debug!(
        records = history.records.len(),
        decisions = history.decision_count(),
        "Loaded version history"
    );
}
