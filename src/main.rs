//! Testbed Coordinator CLI
//!
//! Entry point for the `testbed-coordinator` command-line tool.
//!
//! `serve` reads one JSON RPC request per stdin line and writes one
//! response per stdout line, until EOF or Ctrl-C.

use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::Ordering;

use testbed_coordinator::{simulator, Coordinator, CoordinatorConfig, RpcHandler};

#[derive(Parser)]
#[command(name = "testbed-coordinator")]
#[command(about = "Job group coordinator for the IoT testbed", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve line-delimited JSON RPC on stdin/stdout
    Serve {
        /// Path to a TOML config file (defaults apply when omitted)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// Run a scripted end-to-end scenario and print each RPC exchange
    Simulate {
        /// Path to a TOML config file (defaults apply when omitted)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            let config = match load_config(config) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Error loading config: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            run_serve(config)
        }
        Commands::Simulate { config } => {
            let config = match load_config(config) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Error loading config: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            if let Err(e) = simulator::run(config, &mut io::stdout().lock()) {
                eprintln!("Simulation error: {}", e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<CoordinatorConfig, String> {
    match path {
        Some(path) => CoordinatorConfig::load(&path).map_err(|e| e.to_string()),
        None => Ok(CoordinatorConfig::default()),
    }
}

fn run_serve(config: CoordinatorConfig) -> ExitCode {
    let handler = RpcHandler::new(Coordinator::new(config));

    let shutdown = handler.shutdown_flag();
    if let Err(e) = ctrlc::set_handler(move || {
        shutdown.store(true, Ordering::SeqCst);
    }) {
        eprintln!("Error installing Ctrl-C handler: {}", e);
        return ExitCode::FAILURE;
    }

    if let Err(e) = handler.run() {
        eprintln!("RPC handler error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
