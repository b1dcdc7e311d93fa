// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Questline - a multi-turn text-adventure chat bot.
//!
//! This is the binary entry point for the Questline bot.

mod channel;
mod shell;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Questline - a multi-turn text-adventure chat bot.
#[derive(Parser, Debug)]
#[command(name = "questline", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch an interactive adventure session.
    Shell,
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match questline_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            questline_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over the configured level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.agent.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Some(Commands::Shell) => {
            if let Err(e) = shell::run_shell(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            print_config(config);
        }
        None => {
            println!("questline: use --help for available commands");
        }
    }
}

/// Print the resolved configuration as TOML, with the API key masked.
fn print_config(mut config: questline_config::QuestlineConfig) {
    if config.openai.api_key.is_some() {
        config.openai.api_key = Some("<redacted>".to_string());
    }
    match toml::to_string_pretty(&config) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => {
            eprintln!("error: failed to render configuration: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed).
        let config = questline_config::load_and_validate()
            .expect("default config should be valid");
        assert_eq!(config.agent.name, "questline");
    }
}
