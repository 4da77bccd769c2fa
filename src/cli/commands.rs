use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};

use super::demo::demo_engine;
use crate::logging::init_logging;
use crate::runtime_config::RuntimeConfig;
use crate::server::{EngineService, HttpServer};

/// Command-line interface for treeroute
#[derive(Parser)]
#[command(name = "treeroute")]
#[command(about = "treeroute demo server", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Serve the demo route table over HTTP
    Serve {
        /// Address and port to bind; overrides TREEROUTE_ADDR
        #[arg(long, env = "TREEROUTE_ADDR")]
        addr: Option<String>,
    },
    /// Print the demo route table and exit
    Routes,
}

/// Execute a parsed CLI command
///
/// # Errors
///
/// Returns an error if logging cannot be initialized, the listener cannot
/// be bound, or the server coroutine panics.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve { addr } => {
            init_logging().context("Failed to initialize logging")?;
            let mut config = RuntimeConfig::from_env();
            if let Some(addr) = addr {
                config.addr = addr;
            }
            config.apply();

            let engine = demo_engine();
            let handle = HttpServer(EngineService::new(engine))
                .start(config.addr.as_str())
                .with_context(|| format!("Failed to bind {}", config.addr))?;
            println!("treeroute listening on http://{}", handle.addr());
            handle
                .join()
                .map_err(|_| anyhow::anyhow!("Server coroutine panicked"))?;
            Ok(())
        }
        Commands::Routes => {
            demo_engine().router().dump_routes();
            Ok(())
        }
    }
}

/// Parse process arguments and execute the selected command
///
/// # Errors
///
/// See [`run`].
pub fn run_cli() -> Result<()> {
    run(Cli::parse())
}
