// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "cortex",
    about = "An offline coding-assistant chat for the terminal",
    version,
    long_about = None,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Ask a single question, print the reply and exit.
    /// Without a prompt an interactive session is started.
    #[arg(value_name = "PROMPT")]
    pub prompt: Option<String>,

    /// Path to config file (overrides auto-discovery)
    #[arg(long, short = 'c', env = "CORTEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the reply as JSON content blocks (one-shot mode only)
    #[arg(long)]
    pub json: bool,

    /// Show replies immediately instead of after the typing delay
    #[arg(long)]
    pub no_delay: bool,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Print the effective configuration and exit
    ShowConfig,
}

pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "cortex", &mut std::io::stdout());
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
