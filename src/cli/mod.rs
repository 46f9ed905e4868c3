//! Command-line interface for gosrcs.
//!
//! ```text
//! gosrcs [DIR] [--base-dir DIR] [--tags T]... [--go PATH] [--format text|json] [-v|-q]
//! ```
//!
//! `DIR` is the package directory and defaults to the current directory. The
//! output is the sorted list of files needed to build that package, one path
//! per line, relative to the module root (or `--base-dir`).
//!
//! # Environment Variables
//!
//! - `GOSRCS_GO`: same as `--go`
//! - `GOSRCS_BASE_DIR`: same as `--base-dir`
//! - `RUST_LOG`: log filter; overrides `--verbose` and `--quiet`
//!
//! # Examples
//!
//! ```bash
//! gosrcs ./cmd/server                      # files for one binary
//! gosrcs ./cmd/server --tags netgo,osusergo
//! gosrcs ./cmd/server --format json        # with owning import paths
//! gosrcs ./cmd/server | tar -cf ctx.tar -T -
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::analyzer::{ListOptions, SourceFile, list_sources};
use crate::graph::GoListProvider;

/// How the file list is printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One path per line
    Text,
    /// A JSON array of `{ "path", "importPath" }` records
    Json,
}

/// Settings derived from the command line.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Resolution settings
    pub options: ListOptions,
    /// Output format
    pub format: OutputFormat,
}

/// List the files needed to build a Go package.
#[derive(Parser, Debug)]
#[command(
    name = "gosrcs",
    version,
    about = "List the files needed to build a Go package",
    long_about = "Lists the minimal set of files needed to build a Go package: its sources, \
                  the sources of every package it imports from the same module or from \
                  locally replaced modules, files matched by //go:embed patterns, and the \
                  go.mod/go.sum files of every module involved."
)]
pub struct Cli {
    /// Package directory
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Directory output paths are relative to (default: the module root)
    #[arg(long, env = "GOSRCS_BASE_DIR")]
    base_dir: Option<PathBuf>,

    /// Build tags, comma-separated or repeated
    #[arg(long = "tags", value_delimiter = ',')]
    tags: Vec<String>,

    /// Path to the go binary (default: looked up on PATH)
    #[arg(long = "go", env = "GOSRCS_GO")]
    go: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Sets up logging and runs.
    ///
    /// # Errors
    ///
    /// Any resolution failure.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        init_logging(&config.log_level);
        self.execute_with_config(config).await
    }

    /// Maps flags onto a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };

        CliConfig {
            log_level: log_level.to_string(),
            options: ListOptions {
                base_dir: self.base_dir.clone(),
                build_tags: self.tags.iter().filter(|t| !t.is_empty()).cloned().collect(),
                go_binary: self.go.clone(),
            },
            format: self.format,
        }
    }

    /// Runs the resolution off the async runtime and prints the result.
    ///
    /// # Errors
    ///
    /// Any resolution failure, or a failure to render the output.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        let dir = self.dir;
        let options = config.options;

        let files = tokio::task::spawn_blocking(move || {
            let provider = GoListProvider::new(options.go_binary.clone());
            list_sources(&dir, &provider, &options)
        })
        .await
        .context("Source listing task failed")??;

        print!("{}", render(&files, config.format)?);
        Ok(())
    }
}

/// Renders `files` in `format`, newline-terminated.
///
/// # Errors
///
/// JSON serialization failures.
pub fn render(files: &[SourceFile], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(files.iter().map(|f| format!("{}\n", f.path)).collect()),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(files)?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` applies.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
