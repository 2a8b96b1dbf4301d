//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for pagesel using the `clap` crate.
//!
//! # Commands
//!
//! - **browse**: Interactive paginated selection session (default)
//! - **config**: Show the config file location or the effective configuration
//! - **completions**: Print a shell completion script
//!
//! # Examples
//!
//! ```
//! use pagesel::cli::{Cli, Commands};
//!
//! let cli = Cli::parse_from_args(["pagesel", "--offline", "40", "browse"]);
//! assert!(matches!(cli.get_command(), Commands::Browse));
//! assert_eq!(cli.offline, Some(40));
//! ```

use crate::config::MAX_PAGE_SIZE;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io::Write;
use std::path::PathBuf;

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "pagesel")]
#[command(about = "Select records across the pages of a remote collection", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Use this config file instead of the default location
    #[arg(short = 'c', long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Rows per page (overrides config)
    #[arg(
        short = 'p',
        long = "page-size",
        value_name = "N",
        global = true,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PAGE_SIZE))
    )]
    pub page_size: Option<u32>,

    /// Browse N synthetic records in memory instead of the remote collection
    #[arg(long = "offline", value_name = "N", global = true)]
    pub offline: Option<u64>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Open the interactive selection session (default)
    #[command(visible_alias = "b")]
    Browse,

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Print a shell completion script
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print the config file location
    Path,
    /// Print the effective configuration as TOML
    Show,
}

impl Cli {
    /// Parse command-line arguments from the process environment
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parse command-line arguments from an explicit list
    ///
    /// # Panics
    /// Exits the process with a usage message if the arguments are invalid,
    /// like [`Cli::parse_args`].
    #[must_use]
    pub fn parse_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(args)
    }

    /// Get the command to execute, defaulting to Browse if none specified
    #[must_use]
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Browse)
    }

    /// Log filter directive implied by `-v` flags, if any were given
    #[must_use]
    pub const fn verbosity_filter(&self) -> Option<&'static str> {
        match self.verbose {
            0 => None,
            1 => Some("pagesel=info"),
            2 => Some("pagesel=debug"),
            _ => Some("pagesel=trace"),
        }
    }
}

/// Write a static completion script for `shell` to `buf`
pub fn generate_completions<W: Write>(shell: Shell, buf: &mut W) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, buf);
}

/// Answer a dynamic completion request from the shell, if this is one
///
/// Exits the process when `COMPLETE` is set in the environment.
#[cfg(feature = "dynamic-completions")]
pub fn init_dynamic_completions() {
    clap_complete::CompleteEnv::with_factory(Cli::command).complete();
}
