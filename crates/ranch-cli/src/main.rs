//! # ranch CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ranch_cli::locales::{run_locales, LocalesArgs};
use ranch_cli::schema::{run_schema, SchemaArgs};
use ranch_cli::validate::{run_validate, ValidateArgs};

/// Ranch: locale-driven postal address validation.
///
/// Prints field schemas per country, validates address files against the
/// locale rules, and inspects rule tables.
#[derive(Parser, Debug)]
#[command(name = "ranch", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Locale rules file to use instead of the built-in table.
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the field schema of a locale as JSON.
    Schema(SchemaArgs),

    /// Validate an address file against the locale rules.
    Validate(ValidateArgs),

    /// List the locales of the rule table.
    Locales(LocalesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let rules = match ranch_cli::load_rules(cli.rules.as_deref()) {
        Ok(rules) => rules,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(2);
        }
    };

    let mut stdout = std::io::stdout().lock();
    let result = match cli.command {
        Commands::Schema(args) => run_schema(&args, &rules, &mut stdout),
        Commands::Validate(args) => run_validate(&args, &rules, std::io::stdin().lock(), &mut stdout),
        Commands::Locales(args) => run_locales(&args, &rules, &mut stdout),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
