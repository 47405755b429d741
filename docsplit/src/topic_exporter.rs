//! Topic export
//!
//! Renders every section of a split document as a standalone HTML file and
//! records the resulting (title, path) pairs for the table of contents.
//! Topics are pure data: produced here in document order, consumed once by
//! the TOC generator.

use crate::document_model::Document;
use crate::html_renderer::{render_to_file, RenderError, RenderOptions};
use crate::split_config::SplitConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One exported topic: display title and the file it was rendered to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    /// Human-readable title shown in the table of contents
    pub title: String,

    /// Path of the rendered topic file
    pub output_path: PathBuf,
}

/// Errors that can occur during topic export
#[derive(Error, Debug)]
pub enum ExportError {
    /// The output directory does not exist (it is never created implicitly)
    #[error("output directory does not exist: {dir}", dir = .0.display())]
    MissingOutputDir(PathBuf),

    /// A topic failed to render; the whole export is aborted
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Characters that are neither letters, digits nor whitespace
static DROPPED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}\s]").expect("invalid sanitizer regex"));

/// Whitespace runs, collapsed to a single underscore
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("invalid whitespace regex"));

/// Derive a filesystem-safe base name from a heading
///
/// Keeps only letters and digits, collapses whitespace runs to a single
/// underscore, drops everything else. Returns None when nothing survives.
pub fn derive_base_name(heading: &str) -> Option<String> {
    let kept = DROPPED.replace_all(heading, "");
    let trimmed = kept.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(WHITESPACE.replace_all(trimmed, "_").into_owned())
}

/// Derive a display title from a heading
///
/// Strips the trailing paragraph terminator. Returns None when the result
/// is blank.
pub fn derive_title(heading: &str) -> Option<String> {
    let stripped = heading
        .strip_suffix("\r\n")
        .or_else(|| heading.strip_suffix('\n'))
        .or_else(|| heading.strip_suffix('\r'))
        .unwrap_or(heading);
    if stripped.trim().is_empty() {
        None
    } else {
        Some(stripped.to_string())
    }
}

/// Fallback name for sections with no usable heading
fn untitled(index: usize) -> String {
    format!("UNTITLED SECTION {}", index)
}

/// Compute the (title, file name) for every section without rendering
///
/// Used by the inspect command and internally by [`export_topics`]. The
/// returned `output_path` holds just the file name; export joins it onto
/// the output directory. Base name collisions fall back to the untitled
/// name so no earlier topic is overwritten.
pub fn plan_topics(doc: &Document, config: &SplitConfig) -> Vec<Topic> {
    let mut used: HashSet<String> = HashSet::new();
    let mut topics = Vec::with_capacity(doc.sections.len());

    for (index, section) in doc.sections.iter().enumerate() {
        let heading = section
            .first_paragraph()
            .map(|p| p.text())
            .unwrap_or_default();

        let title = derive_title(&heading).unwrap_or_else(|| untitled(index));

        let base = derive_base_name(&heading)
            .filter(|name| !used.contains(name))
            .unwrap_or_else(|| untitled(index));
        used.insert(base.clone());

        topics.push(Topic {
            title,
            output_path: PathBuf::from(format!("{}.{}", base, config.output_extension)),
        });
    }

    topics
}

/// Render every section of a split document to the output directory
///
/// Sections are exported in document order, each as a standalone document
/// with its display title as metadata. The per-topic document is dropped as
/// soon as it is rendered. Any render failure aborts the export: topics are
/// either all written or the run fails.
pub fn export_topics(
    doc: &Document,
    out_dir: &Path,
    config: &SplitConfig,
) -> Result<Vec<Topic>, ExportError> {
    if !out_dir.is_dir() {
        return Err(ExportError::MissingOutputDir(out_dir.to_path_buf()));
    }

    let options = RenderOptions::from_config(config);
    let mut topics = plan_topics(doc, config);

    for (section, topic) in doc.sections.iter().zip(topics.iter_mut()) {
        let output_path = out_dir.join(&topic.output_path);
        {
            let standalone = Document::from_section(section.clone(), &topic.title);
            render_to_file(&standalone, &output_path, &options)?;
        }
        log::info!("exported topic '{}' -> {}", topic.title, output_path.display());
        topic.output_path = output_path;
    }

    Ok(topics)
}
