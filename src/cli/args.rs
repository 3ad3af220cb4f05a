//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputKind;

/// Image file used when none is given.
pub const DEFAULT_IMAGE: &str = "cat.jpeg";

/// Interactive shell that renders images as character art
#[derive(Parser, Debug)]
#[command(name = "ascii-art")]
#[command(version, about = "Render images as brightness-matched character art", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Image to load on start
    #[arg(default_value = DEFAULT_IMAGE)]
    pub image: PathBuf,

    /// Starting resolution (characters per row)
    #[arg(long, short)]
    pub resolution: Option<u32>,

    /// Starting character set, e.g. "0123456789"
    #[arg(long)]
    pub charset: Option<String>,

    /// Output method
    #[arg(long, short)]
    pub output: Option<OutputKind>,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
