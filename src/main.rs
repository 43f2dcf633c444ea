//! etilbud-offers - Find the cheapest grocery offer per item
//!
//! Command-line front end for the eTilbudsavis offer search.

use anyhow::Result;
use clap::{Parser, Subcommand};
use etilbud_offers::commands::find::load_items_file;
use etilbud_offers::commands::{FindCommand, ValidateCommand};
use etilbud_offers::config::{Config, OutputFormat};
use etilbud_offers::ItemRequest;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "etilbud-offers",
    version,
    about = "Find the cheapest grocery offer per item",
    long_about = "Searches eTilbudsavis offers near Copenhagen and reports the lowest unit price per item."
)]
struct Cli {
    /// API key
    #[arg(long, global = true, env = "ETILBUD_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// API secret
    #[arg(long, global = true, env = "ETILBUD_API_SECRET", hide_env_values = true)]
    api_secret: Option<String>,

    /// Request timeout in seconds (ETILBUD_TIMEOUT is read by the config layer)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true)]
    proxy: Option<String>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the best offer for each item
    #[command(alias = "f")]
    Find {
        /// Items as name:unit, e.g. mælk:l smør:g
        items: Vec<ItemRequest>,

        /// JSON file with [[name, unit], ...] pairs
        #[arg(long, conflicts_with = "items")]
        items_file: Option<PathBuf>,

        /// Print results as etilbudsavis.<shop> states
        #[arg(long)]
        states: bool,
    },

    /// Check that the API credentials are accepted
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(key) = cli.api_key {
        config.api_key = Some(key);
    }
    if let Some(secret) = cli.api_secret {
        config.api_secret = Some(secret);
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    match cli.command {
        Commands::Find { items, items_file, states } => {
            let items = if let Some(path) = items_file {
                load_items_file(&path)?
            } else if !items.is_empty() {
                items
            } else {
                config.items.clone()
            };

            let cmd = FindCommand::new(config).with_states(states);
            let output = cmd.execute(&items).await?;
            println!("{}", output);
        }

        Commands::Validate => {
            let cmd = ValidateCommand::new(config);
            let output = cmd.execute().await?;
            println!("{}", output);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_invalid_timeout_env_does_not_abort_parsing() {
        let original = std::env::var("ETILBUD_TIMEOUT").ok();
        std::env::set_var("ETILBUD_TIMEOUT", "not_a_number");

        let cli = Cli::try_parse_from(["etilbud-offers", "validate"]);
        let config = Config::default().with_env();

        match original {
            Some(v) => std::env::set_var("ETILBUD_TIMEOUT", v),
            None => std::env::remove_var("ETILBUD_TIMEOUT"),
        }

        let cli = cli.unwrap();
        assert!(cli.timeout.is_none());
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_timeout_flag() {
        let cli = Cli::try_parse_from(["etilbud-offers", "--timeout", "3", "validate"]).unwrap();
        assert_eq!(cli.timeout, Some(3));

        let err = Cli::try_parse_from(["etilbud-offers", "--timeout", "soon", "validate"]);
        assert!(err.is_err());
    }
}
