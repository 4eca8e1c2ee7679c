//! Command-line interface definitions.
//!
//! Defines the CLI structure for the betgraph binary using `clap`. Every
//! sizing command reads a slate file (bets, relationships and known outcomes)
//! and an optional configuration file holding risk limits and solver settings.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Default configuration file looked up by `config validate`.
pub const DEFAULT_CONFIG_PATH: &str = "betgraph.toml";

/// Conditional bet dependency graph and portfolio sizing CLI
#[derive(Parser, Debug)]
#[command(name = "betgraph")]
#[command(version)]
pub struct Cli {
    /// Configuration file (risk limits, solver, logging)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the betgraph CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Size the open value bets of a slate
    Size(SizeArgs),

    /// Value a parlay under the slate's dependencies
    Parlay(ParlayArgs),

    /// Print the conditional covariance matrix of a slate
    Covariance(CovarianceArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `betgraph config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate a configuration file (defaults to betgraph.toml).
    Validate,
}

/// Arguments for the `size` subcommand.
#[derive(Args, Debug)]
pub struct SizeArgs {
    /// Slate file describing bets, relationships and outcomes.
    pub slate: PathBuf,

    /// Restrict sizing to these bet ids (comma separated).
    #[arg(short, long, value_delimiter = ',')]
    pub bets: Vec<String>,
}

/// Arguments for the `parlay` subcommand.
#[derive(Args, Debug)]
pub struct ParlayArgs {
    /// Slate file describing bets, relationships and outcomes.
    pub slate: PathBuf,

    /// Parlay legs (comma separated bet ids).
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub legs: Vec<String>,
}

/// Arguments for the `covariance` subcommand.
#[derive(Args, Debug)]
pub struct CovarianceArgs {
    /// Slate file describing bets, relationships and outcomes.
    pub slate: PathBuf,

    /// Restrict the matrix to these bet ids (comma separated).
    #[arg(short, long, value_delimiter = ',')]
    pub bets: Vec<String>,
}
