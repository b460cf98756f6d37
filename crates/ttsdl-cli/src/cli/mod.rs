//! CLI for ttsdl.

mod commands;
mod interrupt;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use ttsdl_core::config;
use ttsdl_core::export::ExportFormat;

use commands::{
    run_completions, run_download, run_extract, run_fetch_list, run_man, run_workshop,
};

/// Top-level CLI for ttsdl.
#[derive(Debug, Parser)]
#[command(name = "ttsdl", version)]
#[command(about = "ttsdl: extract and download the assets referenced by tabletop save files", long_about = None)]
pub struct Cli {
    /// Log everything at debug level (RUST_LOG still wins).
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// List the asset URLs found in a save blob.
    Extract {
        /// Path to the save blob.
        blob: PathBuf,
        /// Output format: text, csv or json (default: from the --output extension, else text).
        #[arg(long, short)]
        format: Option<ExportFormat>,
        /// Write the list to FILE instead of stdout.
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Extract the asset URLs from a save blob and download them.
    Download {
        /// Path to the save blob.
        blob: PathBuf,
        /// Destination directory (default: the blob's file name without extension).
        #[arg(long, value_name = "DIR")]
        dest: Option<PathBuf>,
    },

    /// Download a plain list of URLs, one per line.
    FetchList {
        /// Text file with one URL per line; `#` starts a comment.
        list: PathBuf,
        /// Destination directory (default: the list's file name without extension).
        #[arg(long, value_name = "DIR")]
        dest: Option<PathBuf>,
    },

    /// Fetch a workshop item's save blob and download its assets.
    Workshop {
        /// Numeric workshop id.
        id: String,
        /// Destination directory (default: the blob's file name without extension).
        #[arg(long, value_name = "DIR")]
        dest: Option<PathBuf>,
        /// Keep the downloaded blob after processing.
        #[arg(long)]
        keep_blob: bool,
    },

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        shell: Shell,
    },

    /// Print the man page (roff).
    Man,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    pub fn run(self) -> Result<()> {
        match self.command {
            CliCommand::Completions { shell } => return run_completions(shell),
            CliCommand::Man => return run_man(),
            _ => {}
        }

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match self.command {
            CliCommand::Extract {
                blob,
                format,
                output,
            } => run_extract(&cfg, &blob, format, output.as_deref())?,
            CliCommand::Download { blob, dest } => {
                run_download(&cfg, &blob, dest.as_deref())?;
            }
            CliCommand::FetchList { list, dest } => run_fetch_list(&cfg, &list, dest.as_deref())?,
            CliCommand::Workshop {
                id,
                dest,
                keep_blob,
            } => run_workshop(&cfg, &id, dest.as_deref(), keep_blob)?,
            CliCommand::Completions { .. } | CliCommand::Man => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
