use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use betgraph::adapter::inbound::cli::command::{
    Cli, Commands, ConfigCommand, DEFAULT_CONFIG_PATH,
};
use betgraph::adapter::inbound::cli::output::{self, OutputConfig};
use betgraph::adapter::inbound::cli::{config, covariance, parlay, size};
use betgraph::infrastructure::config::settings::Config;

fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet));

    if let Err(e) = run(&cli) {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let validating = matches!(cli.command, Commands::Config(ConfigCommand::Validate));
    let path = cli
        .config
        .clone()
        .or_else(|| validating.then(|| PathBuf::from(DEFAULT_CONFIG_PATH)));

    let settings = match &path {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    settings.init_logging();
    debug!(config = ?path, "betgraph starting");

    match &cli.command {
        Commands::Size(args) => size::execute(&settings, args)
            .with_context(|| format!("failed to size slate {}", args.slate.display())),
        Commands::Parlay(args) => parlay::execute(&settings, args)
            .with_context(|| format!("failed to value parlay from {}", args.slate.display())),
        Commands::Covariance(args) => covariance::execute(&settings, args).with_context(|| {
            format!("failed to build covariance for {}", args.slate.display())
        }),
        Commands::Config(ConfigCommand::Validate) => {
            let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
            config::execute_validate(&path, &settings).map_err(Into::into)
        }
    }
}
