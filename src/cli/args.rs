//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::optimize::Grouping;

/// Configure and run a raster-to-vector tracer, then optimize the SVG
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = crate::config::CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Trace a raster image and optimize the produced SVG
    #[command(visible_alias = "t")]
    Trace {
        #[command(flatten)]
        args: TraceArgs,
    },

    /// Rewrite existing tracer output in place
    #[command(visible_alias = "o")]
    Optimize {
        #[command(flatten)]
        args: OptimizeArgs,
    },

    /// Print the tracer command line for the current settings
    #[command(visible_alias = "c")]
    Command {
        #[command(flatten)]
        overrides: ParamOverrides,

        /// Print the argument vector, one token per line, unquoted
        #[arg(long)]
        argv: bool,
    },

    /// Manage saved settings profiles
    #[command(visible_alias = "p")]
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// List tracer parameters with their defaults and ranges
    Params,

    /// Write a commented vectrace.toml
    #[command(visible_alias = "i")]
    Init {
        /// Print the template instead of writing it
        #[arg(long)]
        dry: bool,

        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

/// Profile subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ProfileAction {
    /// List profile names
    #[command(visible_alias = "ls")]
    List,

    /// Print the command string stored under a name
    Show { name: String },

    /// Save the current settings under a name
    Save {
        name: String,

        #[command(flatten)]
        overrides: ParamOverrides,
    },

    /// Delete a saved profile
    #[command(visible_alias = "rm")]
    Delete { name: String },
}

/// Parameter adjustments applied on top of the defaults.
///
/// Order: profile, then `--enable`, then `--disable`, then `--set`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ParamOverrides {
    /// Start from a saved profile
    #[arg(short, long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Enable a parameter and set its value
    #[arg(short, long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,

    /// Enable a parameter
    #[arg(short, long = "enable", value_name = "NAME")]
    pub enable: Vec<String>,

    /// Disable a parameter
    #[arg(short, long = "disable", value_name = "NAME")]
    pub disable: Vec<String>,
}

/// Trace command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct TraceArgs {
    /// Raster image to trace
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output SVG (default: input with `.svg` extension)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ParamOverrides,

    /// Color layout of the optimized SVG
    #[arg(short, long, value_enum)]
    pub grouping: Option<Grouping>,

    /// Keep the tracer output as is, skip optimization
    #[arg(long)]
    pub raw: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Optimize command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct OptimizeArgs {
    /// SVG files written by the tracer
    #[arg(required = true, value_hint = clap::ValueHint::FilePath)]
    pub files: Vec<PathBuf>,

    /// Color layout of the optimized SVG
    #[arg(short, long, value_enum)]
    pub grouping: Option<Grouping>,

    /// Add a background rectangle of this color (six hex digits)
    #[arg(short, long, value_name = "HEX")]
    pub background: Option<String>,

    /// Files were traced in centerline mode (colors are strokes)
    #[arg(long)]
    pub centerline: bool,

    /// Print the reports as JSON
    #[arg(long)]
    pub json: bool,
}

/// Parse `name=value`. The value may be empty.
fn parse_assignment(text: &str) -> Result<(String, String), String> {
    let (name, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{text}`"))?;
    if name.is_empty() {
        return Err(format!("missing parameter name in `{text}`"));
    }
    Ok((name.to_owned(), value.to_owned()))
}
