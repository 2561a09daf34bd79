//! vectrace - configure and run a raster-to-vector tracer, then optimize the SVG.

mod cli;
mod command;
mod config;
mod error;
mod logger;
mod optimize;
mod profile;
mod tracer;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands, common::AppContext};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    // init runs before a config exists, everything else needs one
    let load = || AppContext::load(&cli);

    match &cli.command {
        Commands::Init { dry, force } => {
            let path = if cli.config.is_absolute() {
                cli.config.clone()
            } else {
                std::env::current_dir()?.join(&cli.config)
            };
            cli::init::write_config(&path, *dry, *force)
        }
        Commands::Trace { args } => cli::trace::run(&load()?, args),
        Commands::Optimize { args } => cli::optimize::run(&load()?.config, args),
        Commands::Command { overrides, argv } => cli::command::run(&load()?, overrides, *argv),
        Commands::Profile { action } => cli::profile::run(&load()?, action),
        Commands::Params => cli::params::run(&load()?),
    }
}
