//! licdesk: terminal admin console for the license service.
//!
//! Usage:
//!   licdesk --base-url http://127.0.0.1:8000
//!   licdesk --config licdesk.json
//!   licdesk hash-password <password>
//!
//! Type `help` at the prompt for the command list.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use licdesk_cli::{parse_line, Action, TerminalFrontend, HELP};
use licdesk_console::{password_digest, Console, ConsoleConfig, ConsoleState};
use licdesk_gateway::HttpGateway;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "licdesk")]
#[command(about = "Admin console for user registration and license issuance")]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// License service base URL (overrides the config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Directory downloaded licenses are saved in
    #[arg(long)]
    download_dir: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the SHA-256 digest to put in an operator auth config
    HashPassword { password: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    if let Some(Command::HashPassword { password }) = &args.command {
        println!("{}", password_digest(password));
        return Ok(());
    }

    let config = load_config(&args)?;
    let gate = config.login_gate().context("Invalid auth configuration")?;
    let gateway = HttpGateway::new(config.gateway_config()).context("Failed to set up the gateway")?;
    let download_dir = config.download_dir();

    info!("licdesk starting against {}", gateway.base_url());
    info!("Licenses will be saved in {}", download_dir.display());

    let state = ConsoleState::new(gate).with_max_login_attempts(config.max_login_attempts);
    let mut console = Console::new(
        state,
        Arc::new(gateway),
        TerminalFrontend::new(std::io::stdout()),
        download_dir,
    );

    println!("Type 'help' for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt(&console.state().view().to_string());
        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };
        match parse_line(&line) {
            Ok(Action::Quit) => break,
            Ok(Action::Help) => println!("{HELP}"),
            Ok(Action::Status) => {
                let state = console.state();
                println!(
                    "view: {}, modal: {}, cached users: {}",
                    state.view(),
                    state.overlay(),
                    state.users().len()
                );
            }
            Ok(Action::Events(events)) => {
                for event in events {
                    console.submit(event);
                }
                console.settle().await;
            }
            Ok(Action::Nothing) => {}
            Err(e) => println!("{e}"),
        }
    }

    info!("licdesk exiting");
    Ok(())
}

fn load_config(args: &Args) -> Result<ConsoleConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            ConsoleConfig::from_json_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => ConsoleConfig::default(),
    };
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(dir) = &args.download_dir {
        config.download_dir = Some(dir.clone());
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn prompt(view: &str) {
    print!("{view}> ");
    if let Err(e) = std::io::stdout().flush() {
        warn!("Failed to flush stdout: {e}");
    }
}
