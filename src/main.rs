// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Snip main entry point - CLI, commands, and REPL.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tokio::io::BufReader;

use snip::app::App;
use snip::cli::{run_repl, run_shorten, ShortenRequest};
use snip::config::{self, CliOptions, SinkKind};
use snip::telemetry::{init_telemetry, TelemetryConfig};

/// Snip version string.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Snip - an instrumented URL-shortening form.
#[derive(Parser)]
#[command(name = "snip")]
#[command(author, version, about = "An instrumented URL-shortening form", long_about = None)]
struct Cli {
    /// Where action traces are written
    #[arg(long, value_enum, env = "SNIP_SINK", global = true)]
    sink: Option<Sink>,

    /// Trace file for the json sink
    #[arg(long, env = "SNIP_TRACE_FILE", global = true)]
    trace_file: Option<PathBuf>,

    /// Maximum number of URLs in the form
    #[arg(long, global = true)]
    max_urls: Option<usize>,

    /// Base URL for generated short links
    #[arg(long, env = "SNIP_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Do not collect action metrics
    #[arg(long, global = true)]
    no_metrics: bool,

    /// Show info-level diagnostics
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Show debug output, including action spans
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Trace sinks selectable on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Sink {
    /// Grouped output on stderr
    Console,
    /// Events on the diagnostics log
    Tracing,
    /// JSON Lines in the trace file
    Json,
    /// No trace output
    None,
}

impl From<Sink> for SinkKind {
    fn from(sink: Sink) -> Self {
        match sink {
            Sink::Console => SinkKind::Console,
            Sink::Tracing => SinkKind::Tracing,
            Sink::Json => SinkKind::Json,
            Sink::None => SinkKind::None,
        }
    }
}

/// Subcommands for snip.
#[derive(Subcommand)]
enum Commands {
    /// Shorten one or more URLs and exit
    Shorten {
        /// Long URLs to shorten
        #[arg(required = true)]
        urls: Vec<String>,

        /// Validity period in minutes
        #[arg(short, long)]
        period: Option<String>,

        /// Custom shortcode
        #[arg(short, long)]
        shortcode: Option<String>,

        /// Print the final form state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit the form interactively (default)
    Repl,

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },

    /// Initialize a new configuration file
    Init,

    /// Show version information
    Version,
}

/// Config subcommand actions.
#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    init_telemetry(&TelemetryConfig::from_flags(cli.verbose, cli.debug).with_ansi(!cli.no_color))?;

    let cli_options = CliOptions {
        max_urls: cli.max_urls,
        base_url: cli.base_url,
        sink: cli.sink.map(SinkKind::from),
        trace_file: cli.trace_file,
        no_color: cli.no_color,
        no_metrics: cli.no_metrics,
    };

    let current_dir = std::env::current_dir()?;
    let workspace_root = config::find_workspace_root(&current_dir).unwrap_or_else(|| current_dir.clone());

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Shorten {
            urls,
            period,
            shortcode,
            json,
        } => {
            let config = config::load_config(&workspace_root, cli_options)?;
            let app = App::new(config)?;
            let request = ShortenRequest {
                urls,
                period,
                shortcode,
            };

            let report = run_shorten(&app, &request, &mut std::io::stdout(), json).await?;
            if !report.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Repl => {
            let config = config::load_config(&workspace_root, cli_options)?;
            let app = App::new(config)?;
            let interactive = std::io::stdin().is_terminal();
            let input = BufReader::new(tokio::io::stdin());

            run_repl(&app, input, &mut std::io::stdout(), interactive).await?;
        }
        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let config = config::load_config(&workspace_root, cli_options)?;
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        },
        Commands::Init => {
            let path = config::init_config(&current_dir, None)?;
            println!("{} {}", "Created config file:".green(), path.display());
        }
        Commands::Version => {
            println!("snip {VERSION}");
        }
    }

    Ok(ExitCode::SUCCESS)
}
