// BotBridge: terminal front-end for the supervisor-bot.

pub mod cli;
pub mod commands;
pub mod config;
pub mod llm;
pub mod postprocessing;
pub mod session;

use crate::cli::{Cli, Commands};
use crate::commands::*;
use crate::config::Config;
use crate::llm::SupervisorClient;
use clap::Parser;
use std::io::Read;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `RUST_LOG` wins over the configured filter. Logs go to stderr so stdout
/// only carries rendered replies.
pub fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
        config.validate()?;
    }
    if cli.no_agent_header {
        config.show_agent_header = false;
    }
    Ok(config)
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(&config.log_filter);

    match cli.command {
        Commands::Format { text, output } => {
            let raw = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            println!("{}", format_reply(&raw, config.show_agent_header, output)?);
        }
        Commands::Ask { text, output } => {
            let client = SupervisorClient::new(&config)?;
            println!("{}", ask_once(&client, &text, config.show_agent_header, output).await?);
        }
        Commands::Chat => {
            let client = SupervisorClient::new(&config)?;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            run_chat(&client, stdin, &mut stdout, config.show_agent_header).await?;
        }
    }

    Ok(())
}
