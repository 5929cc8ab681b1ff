#![forbid(unsafe_code)]

mod cmd;
mod output;
mod serve;
mod validate;

use clap::{Parser, Subcommand};
use elementmap_core::ErrorCode;
use elementmap_core::config::{MapConfig, resolve_config};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "elementmap",
    author,
    version,
    about = "elementmap: incoming and outgoing relationships of content elements",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to load instead of .elementmap/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Content store database (overrides `[store] path`).
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Active locale for relations, titles, and links (overrides `[site] locale`).
    #[arg(long, global = true)]
    locale: Option<String>,

    /// Output format: pretty, text, or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Alias for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags and environment.
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }

    /// Effective config: file (or defaults) with CLI overrides applied.
    fn load_config(&self, project_root: &Path, output: OutputMode) -> anyhow::Result<MapConfig> {
        let mut config = match resolve_config(project_root, self.config.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                let code = ErrorCode::ConfigParseError;
                render_error(
                    output,
                    &CliError::with_details(
                        format!("failed to load configuration: {e:#}"),
                        code.hint().unwrap_or_default(),
                        code.code(),
                    ),
                )?;
                return Err(e.context("failed to load configuration"));
            }
        };

        if let Some(db) = &self.db {
            config.store.path.clone_from(db);
        }
        if let Some(locale) = &self.locale {
            if let Err(e) = validate::validate_locale(locale) {
                render_error(output, &e.to_cli_error())?;
                anyhow::bail!("{}", e.reason);
            }
            config.site.locale.clone_from(locale);
        }
        Ok(config)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Show the relationship map of one element",
        long_about = "Resolve every element that references the given element (incoming) and every element it or its blocks reference (outgoing).",
        after_help = "EXAMPLES:\n    # Map element 42\n    elementmap map 42\n\n    # Map in another locale, as JSON\n    elementmap --locale de map 42 --json"
    )]
    Map(cmd::map::MapArgs),

    #[command(
        about = "Serve the element map endpoint over HTTP",
        after_help = "EXAMPLES:\n    # Serve on the configured host and port\n    elementmap serve\n\n    # Serve on all interfaces\n    elementmap serve --host 0.0.0.0 --port 8080"
    )]
    Serve(cmd::serve::ServeArgs),

    #[command(
        about = "Check the content store schema and report element counts",
        after_help = "EXAMPLES:\n    elementmap check\n    elementmap --db ./craft.db check --json"
    )]
    Check(cmd::check::CheckArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("ELEMENTMAP_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "elementmap=debug,info"
        } else {
            "elementmap=info,warn"
        })
    });

    let format = env::var("ELEMENTMAP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = std::env::current_dir()?;
    let output = cli.output_mode();
    let config = cli.load_config(&project_root, output)?;
    debug!(
        store = %config.store_path(&project_root).display(),
        locale = %config.site.locale,
        "configuration resolved"
    );

    match cli.command {
        Commands::Map(ref args) => cmd::map::run_map(args, &config, output, &project_root),
        Commands::Serve(ref args) => cmd::serve::run_serve(args, &config, &project_root),
        Commands::Check(ref args) => cmd::check::run_check(args, &config, output, &project_root),
    }
}
