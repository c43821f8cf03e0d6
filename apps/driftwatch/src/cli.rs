//! Command line interface definition

use clap::{Parser, Subcommand};
use driftwatch_config::ColorChoice;
use std::path::PathBuf;

/// driftwatch - drift detection for installed third-party libraries
#[derive(Parser)]
#[command(name = "driftwatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Verifies installed third-party libraries against a trusted checksum snapshot")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Capture the trusted directory into the freeze file
    Freeze {
        /// Write the freeze file to this path
        #[arg(long, value_name = "PATH")]
        freeze_file: Option<PathBuf>,

        /// Directory holding the trusted library copies
        #[arg(long, short = 't', value_name = "DIR")]
        trusted: Option<PathBuf>,
    },

    /// Compare installed libraries against the trusted baseline
    Check {
        /// Directory holding the trusted library copies
        #[arg(long, short = 't', value_name = "DIR")]
        trusted: Option<PathBuf>,

        /// Directory with the installed libraries to verify
        #[arg(long, short = 'c', value_name = "DIR")]
        check: Option<PathBuf>,

        /// Read the baseline from this freeze file
        #[arg(long, value_name = "PATH")]
        freeze_file: Option<PathBuf>,
    },

    /// Install pristine library copies into the trusted directory
    #[command(name = "fetch-trusted")]
    FetchTrusted {
        /// Libraries to fetch (empty = configured scan.libraries)
        #[arg(value_name = "LIBS")]
        libraries: Vec<String>,

        /// Alternate package index URL
        #[arg(long, value_name = "URL")]
        fetch_url: Option<String>,

        /// Directory to install the trusted copies into
        #[arg(long, short = 't', value_name = "DIR")]
        trusted: Option<PathBuf>,
    },
}
