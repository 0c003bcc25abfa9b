//! Kiln - an asset pipeline for small site themes.

#![allow(dead_code)]

mod asset;
mod cli;
mod config;
mod core;
mod css;
mod logger;
mod pipeline;
mod template;
mod utils;
mod watch;

use anyhow::{Result, bail};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::Config;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = Config::load(&cli)?;

    match &cli.command {
        Commands::Build { args } => {
            logger::set_verbose(args.verbose);
            let params = pipeline::global_params(&config, args);
            let summary = pipeline::build_all(&config, &params);
            summary.report();
            if summary.has_failures() {
                bail!(
                    "{} of {} build units failed",
                    summary.failed(),
                    summary.total()
                );
            }
            Ok(())
        }
        Commands::Watch { args } => {
            logger::set_verbose(args.verbose);
            let params = pipeline::global_params(&config, args);
            pipeline::build_all(&config, &params).report();
            watch::run(&config, &params)
        }
    }
}
