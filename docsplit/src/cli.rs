//! Command-line interface definitions for docsplit

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI structure for the docsplit application
#[derive(Parser)]
#[command(name = "docsplit")]
#[command(version)]
#[command(about = "Split a document into linked HTML topics", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for docsplit
#[derive(Subcommand)]
pub enum Commands {
    /// Split a source document into topics and generate a table of contents
    Build {
        /// Source document to split
        input: PathBuf,

        /// TOC template containing the merge region
        #[arg(short, long)]
        template: PathBuf,

        /// Output directory (must already exist)
        #[arg(short, long)]
        output: PathBuf,

        /// Path to a docsplit.toml configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Paragraph style that starts a new topic (overrides config)
        #[arg(long)]
        heading_style: Option<String>,

        /// Human-readable formatted output (overrides config)
        #[arg(long)]
        pretty: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the topics a build would export, without writing anything
    Inspect {
        /// Source document to analyze
        input: PathBuf,

        /// Path to a docsplit.toml configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Paragraph style that starts a new topic (overrides config)
        #[arg(long)]
        heading_style: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}
