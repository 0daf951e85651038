//! CLI command definitions for iptv-settings
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

use crate::config::SETTINGS_SECTION;
use clap::{Args, Parser, Subcommand};

/// Inspect and edit the IPTV source aggregator configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print every effective setting
    Show {
        /// Print as JSON instead of `key = value` lines
        #[arg(long)]
        json: bool,
    },

    /// Print the raw merged value of a key
    Get(KeyArgs),

    /// Set a value and save it to the user config file
    Set {
        #[command(flatten)]
        key: KeyArgs,

        /// New value
        value: String,
    },

    /// Copy the bundled config template into ./config
    Init,

    /// Print the pixel count of a resolution such as 1920x1080
    Resolution {
        /// Resolution text
        text: String,
    },

    /// Print the resolved config file locations
    Paths,
}

/// A section/key pair.
#[derive(Args, Debug)]
pub struct KeyArgs {
    /// Config key
    pub key: String,

    /// Config section
    #[arg(short, long, default_value = SETTINGS_SECTION)]
    pub section: String,
}
