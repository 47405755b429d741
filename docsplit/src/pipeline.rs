//! Document splitting pipeline
//!
//! Orchestrates the four stages of a run:
//! 1. **Load**: parse the source document into a single-section tree
//! 2. **Split**: select topic starts and insert section boundaries
//! 3. **Export**: render each section as a standalone topic file
//! 4. **TOC**: populate the merge template and render `contents.html`
//!
//! Everything is single-threaded and synchronous; all IO is blocking. Every
//! stage error is fatal to the run. There is no partial-output recovery:
//! the TOC is only generated once every topic has been written, so a failed
//! topic render aborts before `contents.html` exists.

use crate::document_loader::{load_document, DocumentLoadError};
use crate::document_model::StructuralEditError;
use crate::split_config::SplitConfig;
use crate::toc_generator::{generate_toc, HyperlinkMerger, TocError};
use crate::topic_exporter::{export_topics, plan_topics, ExportError, Topic};
use crate::topic_splitter::{insert_breaks, select_topic_starts};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from any pipeline stage
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Stage 1: source document could not be loaded
    #[error(transparent)]
    Load(#[from] DocumentLoadError),

    /// Stage 2: section break insertion failed
    #[error(transparent)]
    Split(#[from] StructuralEditError),

    /// Stage 3: a topic failed to export
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Stage 4: TOC generation failed
    #[error(transparent)]
    Toc(#[from] TocError),
}

/// Result of a successful run
#[derive(Debug)]
pub struct PipelineReport {
    /// Exported topics in document order
    pub topics: Vec<Topic>,

    /// Path of the generated table of contents
    pub toc_path: PathBuf,
}

/// Run the whole pipeline: load, split, export, generate TOC
///
/// # Parameters
/// * `input` - Source document path
/// * `template` - TOC template path (must contain the configured region)
/// * `out_dir` - Pre-existing output directory
/// * `config` - Split configuration
pub fn run(
    input: &Path,
    template: &Path,
    out_dir: &Path,
    config: &SplitConfig,
) -> Result<PipelineReport, PipelineError> {
    log::info!("loading {}", input.display());
    let mut doc = load_document(input)?;

    let starts = select_topic_starts(&doc, &config.heading_style);
    log::info!(
        "found {} '{}' topic starts",
        starts.len(),
        config.heading_style
    );
    insert_breaks(&mut doc, &starts)?;

    let topics = export_topics(&doc, out_dir, config)?;
    // The source document is no longer needed once topics are on disk
    drop(doc);

    let mut merger = HyperlinkMerger::new();
    let toc_path = generate_toc(template, &topics, out_dir, config, &mut merger)?;

    Ok(PipelineReport { topics, toc_path })
}

/// Compute the topics a run would export, without writing anything
///
/// Performs the load and split stages, then derives titles and file names
/// the same way the exporter would.
pub fn inspect(input: &Path, config: &SplitConfig) -> Result<Vec<Topic>, PipelineError> {
    let mut doc = load_document(input)?;
    let starts = select_topic_starts(&doc, &config.heading_style);
    insert_breaks(&mut doc, &starts)?;
    Ok(plan_topics(&doc, config))
}
