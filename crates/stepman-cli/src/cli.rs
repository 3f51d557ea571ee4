//! CLI argument definitions for stepman.
//!
//! Each command corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "stepman",
    version,
    about = "Step library manager",
    long_about = "stepman sets up step libraries, resolves step version constraints \
                  against a library's manifest, and activates step versions into a \
                  working directory."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// The library a command works on.
#[derive(Args, Debug)]
pub struct LibraryArg {
    /// Library URI; defaults to `library.default` from config
    #[arg(short, long, visible_alias = "collection", env = "STEPMAN_LIBRARY")]
    pub library: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Set up a step library
    Setup {
        #[command(flatten)]
        library: LibraryArg,
        /// Use this prebuilt spec.json instead of generating one
        #[arg(long)]
        copy_spec: Option<PathBuf>,
    },

    /// Pull a library and regenerate its manifest
    Update {
        #[command(flatten)]
        library: LibraryArg,
    },

    /// Copy a step version into a directory
    Activate {
        #[command(flatten)]
        library: LibraryArg,
        /// Step id
        #[arg(long)]
        id: String,
        /// Version constraint: X.Y.Z, X.Y, X.Y.x, X, X.x.x; empty for latest
        #[arg(long, default_value = "")]
        version: String,
        /// Destination directory
        #[arg(long)]
        path: PathBuf,
        /// Also write the resolved step definition to this file
        #[arg(long)]
        copy_definition: Option<PathBuf>,
        /// Update the library and retry if no version matches
        #[arg(long)]
        update: bool,
    },

    /// Show details of a step version
    StepInfo {
        #[command(flatten)]
        library: LibraryArg,
        /// Step id
        #[arg(long)]
        id: String,
        /// Version constraint; empty for latest
        #[arg(long, default_value = "")]
        version: String,
        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List the steps of a library
    StepList {
        #[command(flatten)]
        library: LibraryArg,
        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List the libraries that are set up
    Libraries {
        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Remove a library and its cached steps
    Delete {
        #[command(flatten)]
        library: LibraryArg,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Write a library's manifest to a file
    ExportSpec {
        #[command(flatten)]
        library: LibraryArg,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
        /// Keep only the latest version of each step
        #[arg(long)]
        latest: bool,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
