use crate::commands::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "botbridge",
    about = "Chat with the supervisor-bot from the terminal",
    version,
    long_about = None,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a TOML config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Supervisor-bot endpoint, overrides config and environment
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Hide the agent header above tagged replies
    #[arg(long, global = true)]
    pub no_agent_header: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive chat on stdin
    Chat,

    /// Format a raw bot reply without contacting the backend
    Format {
        /// Reply text; read from stdin when omitted
        #[arg(value_name = "TEXT")]
        text: Option<String>,

        #[arg(long, short = 'o', value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Ask a single question and print the rendered reply
    Ask {
        #[arg(value_name = "TEXT")]
        text: String,

        #[arg(long, short = 'o', value_enum, default_value_t)]
        output: OutputFormat,
    },
}
