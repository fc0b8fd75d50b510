// Holdings CLI - subscription coverage reconciliation from the command line

mod exit_codes;
mod logging;
mod recon;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use holdings_recon::config::{MAX_YEAR, MIN_YEAR};

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "holdings")]
#[command(about = "Reconcile purchased journal products against a master title catalog")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a reconciliation from a TOML config file
    #[command(after_help = "\
Examples:
  holdings run library.holdings.toml
  holdings run library.holdings.toml --json
  holdings run library.holdings.toml --output result.json
  holdings run library.holdings.toml --deny-warnings -v")]
    Run {
        /// Path to the .holdings.toml config file
        config: PathBuf,

        /// Output JSON to stdout in addition to the human summary on stderr
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Exit non-zero when the run produced any warning
        #[arg(long)]
        deny_warnings: bool,
    },

    /// Validate a config file without running
    #[command(after_help = "\
Examples:
  holdings validate library.holdings.toml")]
    Validate {
        /// Path to the .holdings.toml config file
        config: PathBuf,
    },

    /// Print the coverage ranges of a set of years
    #[command(after_help = "\
Examples:
  holdings ranges 2005 2006 2008
  holdings ranges 2010,2008,2009 --json")]
    Ranges {
        /// Years, in any order; duplicates are ignored
        #[arg(required = true, value_delimiter = ',', allow_negative_numbers = true)]
        years: Vec<i32>,

        /// Output a JSON array instead of the joined string
        #[arg(long)]
        json: bool,
    },
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  holdings-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  holdings-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_json);

    let result = match cli.command {
        Commands::Run { config, json, output, deny_warnings } => {
            recon::cmd_run(config, json, output, deny_warnings)
        }
        Commands::Validate { config } => recon::cmd_validate(config),
        Commands::Ranges { years, json } => cmd_ranges(years, json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// ranges
// ============================================================================

fn cmd_ranges(years: Vec<i32>, json: bool) -> Result<(), CliError> {
    if let Some(bad) = years.iter().find(|y| !(MIN_YEAR..=MAX_YEAR).contains(*y)) {
        return Err(CliError::args(format!("year out of range: {bad}"))
            .with_hint("years are plain four-digit numbers, e.g. 2005"));
    }

    let ranges = holdings_recon::compress_to_ranges(years);
    if json {
        println!("{}", serde_json::json!(ranges));
    } else {
        println!("{}", holdings_recon::years::join_ranges(&ranges));
    }
    Ok(())
}
