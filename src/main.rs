// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod cli;
mod render;
mod repl;

use std::io::IsTerminal;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use cortex_config::Config;
use cortex_markdown::parse_blocks;
use repl::Session;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Handle subcommands first (before loading config)
    if let Some(Commands::Completions { shell }) = &cli.command {
        cli::print_completions(*shell);
        return Ok(());
    }

    let config = cortex_config::load(cli.config.as_deref())?;

    if let Some(Commands::ShowConfig) = &cli.command {
        print!("{}", toml::to_string_pretty(&config).context("serializing config")?);
        return Ok(());
    }

    let delay = if cli.no_delay { Duration::ZERO } else { config.chat.typing_delay() };
    let styled = stdout_is_styled();
    info!(delay_ms = delay.as_millis() as u64, styled, "starting");

    match cli.prompt.as_deref() {
        Some(prompt) => run_once(&config, prompt, delay, styled, cli.json).await,
        None => repl::run(Session::new(&config, delay, styled)).await,
    }
}

/// Answer a single prompt on stdout.
async fn run_once(config: &Config, prompt: &str, delay: Duration, styled: bool, json: bool) -> anyhow::Result<()> {
    let mut session = Session::new(config, delay, styled);
    let reply = session
        .exchange(prompt)
        .await?
        .context("conversation was removed before the reply arrived")?;
    let blocks = parse_blocks(reply.content());

    if json {
        println!("{}", serde_json::to_string_pretty(&blocks)?);
    } else {
        print!("{}", render::render_blocks(&blocks, styled));
    }
    Ok(())
}

fn stdout_is_styled() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
