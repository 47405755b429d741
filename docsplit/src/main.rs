//! docsplit - heading-based document splitter
//!
//! A CLI tool that splits a source document into standalone HTML topics at
//! heading boundaries and generates a hyperlinked table of contents from a
//! merge template.

use anyhow::{Context, Result};
use clap::Parser;
use docsplit::cli::{Cli, Commands};
use docsplit::pipeline;
use docsplit::split_config::SplitConfig;
use std::path::PathBuf;

/// Main entry point for the docsplit CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            template,
            output,
            config,
            heading_style,
            pretty,
            verbose,
        } => {
            init_logging(verbose);
            let mut config = load_config(config)?;
            if let Some(style) = heading_style {
                config.heading_style = style;
            }
            if pretty {
                config.pretty_print = true;
            }
            handle_build_command(&input, &template, &output, &config)?;
        }

        Commands::Inspect {
            input,
            config,
            heading_style,
            verbose,
        } => {
            init_logging(verbose);
            let mut config = load_config(config)?;
            if let Some(style) = heading_style {
                config.heading_style = style;
            }
            handle_inspect_command(&input, &config)?;
        }
    }

    Ok(())
}

/// Initialize env_logger; verbose raises the default filter to info
fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(log::LevelFilter::Info);
    }
    builder.init();
}

/// Load the configuration file if given, defaults otherwise
fn load_config(path: Option<PathBuf>) -> Result<SplitConfig> {
    match path {
        Some(path) => SplitConfig::load(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(SplitConfig::default()),
    }
}

/// Handle the build command
fn handle_build_command(
    input: &std::path::Path,
    template: &std::path::Path,
    output: &std::path::Path,
    config: &SplitConfig,
) -> Result<()> {
    println!("Splitting document...");
    println!("Input: {}", input.display());
    println!("Template: {}", template.display());
    println!("Output directory: {}", output.display());

    let report = pipeline::run(input, template, output, config)
        .with_context(|| format!("Failed to split {}", input.display()))?;

    println!("\n✓ Exported {} topics:", report.topics.len());
    for topic in &report.topics {
        println!("  {} -> {}", topic.title, topic.output_path.display());
    }
    println!("✓ Table of contents: {}", report.toc_path.display());

    Ok(())
}

/// Handle the inspect command
fn handle_inspect_command(input: &std::path::Path, config: &SplitConfig) -> Result<()> {
    let topics = pipeline::inspect(input, config)
        .with_context(|| format!("Failed to inspect {}", input.display()))?;

    println!(
        "{} topics split on '{}':",
        topics.len(),
        config.heading_style
    );
    for topic in &topics {
        println!("  {} -> {}", topic.title, topic.output_path.display());
    }

    Ok(())
}
