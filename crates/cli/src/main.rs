mod commands;
mod config;

use std::path::PathBuf;
use std::process;

use bterm_core::ModelRoot;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::commands::translate::Entry;
use crate::config::Config;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Event-B formula translator.
#[derive(Parser)]
#[command(
    name = "bterm",
    version,
    about = "Translate Event-B formulas into animator wire terms"
)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long, global = true, value_enum)]
    output: Option<OutputFormat>,

    /// Print the bare term without the bexpr/bpred/btrans wrapper
    #[arg(long, global = true)]
    no_wrap: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where the formula's identifiers are declared.
#[derive(Args, Debug, Clone)]
pub(crate) struct ModelArgs {
    /// Path to a JSON model snapshot
    #[arg(long)]
    pub model: PathBuf,

    /// Model root as KIND:NAME (machine, sc-machine, context, sc-context)
    #[arg(long)]
    pub root: ModelRoot,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate an expression
    Expr {
        /// Expression text, ASCII or mathematical notation
        text: String,
        #[command(flatten)]
        model: ModelArgs,
    },

    /// Translate a predicate
    Pred {
        /// Predicate text, ASCII or mathematical notation
        text: String,
        #[command(flatten)]
        model: ModelArgs,
    },

    /// Translate a transition: `event` or `event | predicate`
    Trans {
        /// Transition text
        text: String,
        #[command(flatten)]
        model: ModelArgs,
    },

    /// Rewrite ASCII notation into mathematical notation
    Normalize {
        /// Formula text
        text: String,
    },
}

/// Effective settings after merging flags over the config file.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Settings {
    pub output: OutputFormat,
    pub wrap: bool,
    pub quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(c) => c,
            Err(e) => {
                report_error(
                    &e.to_string(),
                    cli.output.unwrap_or(OutputFormat::Text),
                    cli.quiet,
                );
                process::exit(1);
            }
        },
        None => Config::default(),
    };

    init_logging(config.log.level.as_deref().unwrap_or("warn"));

    let settings = Settings {
        output: cli
            .output
            .or(config.output.format)
            .unwrap_or(OutputFormat::Text),
        wrap: !cli.no_wrap && config.output.wrap.unwrap_or(true),
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Expr { text, model } => {
            commands::translate::cmd_translate(Entry::Expression, &text, &model, settings);
        }
        Commands::Pred { text, model } => {
            commands::translate::cmd_translate(Entry::Predicate, &text, &model, settings);
        }
        Commands::Trans { text, model } => {
            commands::translate::cmd_translate(Entry::Transition, &text, &model, settings);
        }
        Commands::Normalize { text } => {
            commands::normalize::cmd_normalize(&text, settings);
        }
    }
}

/// Logs go to stderr so stdout carries only the translated term.
fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// `--quiet` silences text errors only. JSON errors are machine-read and
/// always printed.
pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Text if quiet => {}
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => eprintln!("{}", serde_json::json!({ "error": msg })),
    }
}
