//! Table-of-contents generation from a merge template
//!
//! The template is a Markdown document containing one named repeating
//! region delimited by comment markers:
//!
//! ```markdown
//! # Contents
//!
//! <!-- region: TOC -->
//! - {{TocEntry}}
//! <!-- end: TOC -->
//! ```
//!
//! The region body is repeated once per topic. The single field placeholder
//! inside it is filled by a [`FieldMerge`] hook, which owns the field's
//! rendered content entirely; no default text is inserted. The populated
//! template then goes through the regular loader and renderer to produce
//! `contents.html`.

use crate::document_loader::parse_markdown;
use crate::html_renderer::{render_to_file, RenderError, RenderOptions};
use crate::split_config::SplitConfig;
use crate::topic_exporter::Topic;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the generated table of contents
pub const TOC_FILE_NAME: &str = "contents.html";

/// Errors that can occur during TOC generation
#[derive(Error, Debug)]
pub enum TocError {
    /// Template file could not be read
    #[error("error reading template {path}: {source}", path = .0.display(), source = .1)]
    TemplateLoad(PathBuf, #[source] std::io::Error),

    /// Template has no region with the configured name
    #[error("template has no region named '{0}'")]
    MissingRegion(String),

    /// Region start marker found but no matching end marker
    #[error("region '{0}' is not terminated")]
    UnterminatedRegion(String),

    /// Region body must contain the field placeholder exactly once
    #[error("region '{region}' must contain field '{field}' exactly once, found {count}")]
    FieldCount {
        /// Region name
        region: String,
        /// Field name
        field: String,
        /// Number of placeholders actually found
        count: usize,
    },

    /// The populated TOC failed to render
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Hook invoked once per region repetition to fill the field
///
/// Implementations own the field's rendered content entirely. The hook is
/// constructed once and threaded through the whole generation call, so it
/// can lazily initialize shared state on the first invocation and reuse it
/// for every later repetition.
pub trait FieldMerge {
    /// Produce the Markdown replacing the field for this topic
    fn merge_field(&mut self, field_name: &str, topic: &Topic) -> String;
}

/// Writes Markdown hyperlinks; bound once and reused for all repetitions
#[derive(Debug)]
struct HyperlinkWriter;

impl HyperlinkWriter {
    /// Format one link; pointy-bracket destination tolerates spaces in
    /// file names like "UNTITLED SECTION 0.html"
    fn link(&self, text: &str, target: &str) -> String {
        let text = text.replace('[', "\\[").replace(']', "\\]");
        format!("[{}](<{}>)", text, target)
    }
}

/// Default merge hook: one hyperlink per topic
///
/// The link's visible text is the topic title and its target is the topic's
/// output file name (the TOC lands in the same directory as the topics).
#[derive(Debug, Default)]
pub struct HyperlinkMerger {
    /// Writer bound lazily on the first field event
    writer: Option<HyperlinkWriter>,

    /// Number of repetitions merged so far
    repetitions: usize,
}

impl HyperlinkMerger {
    /// Create an unbound merger
    pub fn new() -> Self {
        Self::default()
    }
}

impl FieldMerge for HyperlinkMerger {
    fn merge_field(&mut self, field_name: &str, topic: &Topic) -> String {
        let writer = self.writer.get_or_insert_with(|| {
            log::debug!("binding hyperlink writer on first '{}' event", field_name);
            HyperlinkWriter
        });
        self.repetitions += 1;

        let target = topic
            .output_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| topic.output_path.display().to_string());

        writer.link(&topic.title, &target)
    }
}

/// A template split around its repeating region
#[derive(Debug)]
struct TemplateRegion {
    /// Everything before the region start marker
    prefix: String,

    /// The repeated body between the markers
    body: String,

    /// Everything after the region end marker
    suffix: String,
}

fn region_start_marker(name: &str) -> String {
    format!("<!-- region: {} -->", name)
}

fn region_end_marker(name: &str) -> String {
    format!("<!-- end: {} -->", name)
}

/// Locate the named region and validate its field placeholder
fn parse_template(
    content: &str,
    region: &str,
    field: &str,
) -> Result<TemplateRegion, TocError> {
    let start_marker = region_start_marker(region);
    let end_marker = region_end_marker(region);

    let start = content
        .find(&start_marker)
        .ok_or_else(|| TocError::MissingRegion(region.to_string()))?;
    let body_start = start + start_marker.len();

    let end_rel = content[body_start..]
        .find(&end_marker)
        .ok_or_else(|| TocError::UnterminatedRegion(region.to_string()))?;
    let body_end = body_start + end_rel;

    let body = &content[body_start..body_end];

    let placeholder = field_placeholder(field);
    let count = body.matches(&placeholder).count();
    if count != 1 {
        return Err(TocError::FieldCount {
            region: region.to_string(),
            field: field.to_string(),
            count,
        });
    }

    Ok(TemplateRegion {
        prefix: content[..start].to_string(),
        body: body.to_string(),
        suffix: content[body_end + end_marker.len()..].to_string(),
    })
}

fn field_placeholder(field: &str) -> String {
    format!("{{{{{}}}}}", field)
}

/// Generate `contents.html` from the template and the exported topics
///
/// One region repetition is produced per topic, in topic order; the merge
/// hook fills the field for each. The populated template is loaded through
/// the document loader and rendered into the output directory.
///
/// # Returns
/// * `Ok(PathBuf)` - Path of the written `contents.html`
/// * `Err(TocError)` - Template load/shape error or render failure
pub fn generate_toc(
    template_path: &Path,
    topics: &[Topic],
    out_dir: &Path,
    config: &SplitConfig,
    merger: &mut dyn FieldMerge,
) -> Result<PathBuf, TocError> {
    let content = std::fs::read_to_string(template_path)
        .map_err(|e| TocError::TemplateLoad(template_path.to_path_buf(), e))?;

    let region = parse_template(&content, &config.toc.region, &config.toc.field)?;
    let placeholder = field_placeholder(&config.toc.field);

    let mut populated = String::with_capacity(content.len() + topics.len() * 64);
    populated.push_str(&region.prefix);
    for topic in topics {
        let filled = region
            .body
            .replace(&placeholder, &merger.merge_field(&config.toc.field, topic));
        populated.push_str(&filled);
    }
    populated.push_str(&region.suffix);

    let template_dir = template_path.parent().unwrap_or_else(|| Path::new("."));
    let mut doc = parse_markdown(&populated, template_dir);
    doc.title = Some(toc_title(&doc));

    let output_path = out_dir.join(TOC_FILE_NAME);
    render_to_file(&doc, &output_path, &RenderOptions::from_config(config))?;

    log::info!(
        "generated {} with {} entries",
        output_path.display(),
        topics.len()
    );
    Ok(output_path)
}

/// Title metadata for the TOC document: the template's leading heading if
/// it has one, a plain default otherwise
fn toc_title(doc: &crate::document_model::Document) -> String {
    doc.sections
        .first()
        .and_then(|s| s.first_paragraph())
        .filter(|p| p.style.starts_with("Heading"))
        .map(|p| p.text())
        .unwrap_or_else(|| "Contents".to_string())
}
