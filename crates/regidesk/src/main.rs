// SPDX-FileCopyrightText: 2026 Regidesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Regidesk - a university registrar helpdesk chat service.
//!
//! Binary entry point: loads configuration, then dispatches subcommands.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod serve;

/// Regidesk - a university registrar helpdesk chat service.
#[derive(Parser, Debug)]
#[command(name = "regidesk", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the helpdesk HTTP service.
    Serve,
    /// Load and validate configuration, then exit.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Check the merged configuration and report errors.
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match regidesk_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            regidesk_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("regidesk serve: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config {
            command: ConfigCommands::Check,
        }) => {
            println!(
                "config ok (agent.name={}, gateway={}:{})",
                config.agent.name, config.gateway.host, config.gateway.port
            );
        }
        None => {
            println!("regidesk: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Verify jemalloc is the global allocator by advancing the epoch.
        // Only jemalloc supports this -- the system allocator would fail.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = regidesk_config::load_and_validate()
            .expect("default config should be valid");
        assert_eq!(config.agent.name, "RegiBot");
    }
}
