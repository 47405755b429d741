//! HTML rendering for standalone documents
//!
//! Renders a [`Document`] to a single HTML file. Image assets referenced by
//! the document are copied next to the output file using engine-default
//! naming (`<stem>.NNN.<ext>`) and referenced by that relative name, so a
//! rendered topic plus its siblings is a self-contained unit.
//!
//! The renderer never creates the output directory: topics must land in a
//! pre-existing directory, and a missing one surfaces as an IO error.

use crate::document_model::{Document, Paragraph, TextRun, STYLE_CODE, STYLE_LIST};
use crate::split_config::SplitConfig;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during HTML rendering
#[derive(Error, Debug)]
pub enum RenderError {
    /// Output file could not be written
    #[error("error writing {path}: {source}", path = .path.display())]
    IoError {
        /// Output path that failed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Image asset could not be copied alongside the output file
    #[error("error extracting asset {path}: {source}", path = .path.display())]
    AssetError {
        /// Source image path that failed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

/// Rendering behavior switches
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Emit human-readable formatted output (newlines between elements)
    pub pretty_print: bool,

    /// Preserve negative left indentation instead of clamping to zero
    pub allow_negative_indent: bool,

    /// Emit header/footer text (suppressed by default)
    pub export_header_footer: bool,
}

impl RenderOptions {
    /// Derive rendering options from the split configuration
    pub fn from_config(config: &SplitConfig) -> Self {
        Self {
            pretty_print: config.pretty_print,
            allow_negative_indent: config.allow_negative_indent,
            export_header_footer: config.export_header_footer,
        }
    }
}

/// Render a document to an HTML file with asset extraction
///
/// # Parameters
/// * `doc` - The document to render
/// * `output_path` - Path of the HTML file to write; its parent directory
///   must already exist
/// * `options` - Rendering behavior switches
pub fn render_to_file(
    doc: &Document,
    output_path: &Path,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    let mut assets = AssetSink::new(output_path);
    let html = render_document(doc, options, &mut assets)?;

    let mut file = fs::File::create(output_path).map_err(|e| RenderError::IoError {
        path: output_path.to_path_buf(),
        source: e,
    })?;
    file.write_all(html.as_bytes())
        .map_err(|e| RenderError::IoError {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}

/// Copies image assets next to the output file, numbering them in
/// encounter order
struct AssetSink {
    /// Directory the output file lands in
    out_dir: PathBuf,

    /// Output file stem used to prefix asset names
    stem: String,

    /// Next asset number (1-based)
    counter: usize,
}

impl AssetSink {
    fn new(output_path: &Path) -> Self {
        let out_dir = output_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        let stem = output_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output")
            .to_string();
        Self {
            out_dir,
            stem,
            counter: 1,
        }
    }

    /// Copy one image next to the output file, returning its sibling name
    fn extract(&mut self, source: &Path) -> Result<String, RenderError> {
        let extension = source.extension().and_then(|e| e.to_str()).unwrap_or("png");
        let name = format!("{}.{:03}.{}", self.stem, self.counter, extension);
        let target = self.out_dir.join(&name);

        fs::copy(source, &target).map_err(|e| RenderError::AssetError {
            path: source.to_path_buf(),
            source: e,
        })?;

        log::debug!("extracted asset {} -> {}", source.display(), name);
        self.counter += 1;
        Ok(name)
    }
}

/// Render a document to an HTML string, extracting assets as encountered
fn render_document(
    doc: &Document,
    options: &RenderOptions,
    assets: &mut AssetSink,
) -> Result<String, RenderError> {
    let mut out = String::new();
    let nl = if options.pretty_print { "\n" } else { "" };

    let title = doc.title.as_deref().unwrap_or("");
    out.push_str("<!DOCTYPE html>");
    out.push_str(nl);
    out.push_str("<html lang=\"en\">");
    out.push_str(nl);
    out.push_str("<head>");
    out.push_str(nl);
    out.push_str("<meta charset=\"UTF-8\">");
    out.push_str(nl);
    out.push_str(&format!("<title>{}</title>", escape_html(title)));
    out.push_str(nl);
    out.push_str("</head>");
    out.push_str(nl);
    out.push_str("<body>");
    out.push_str(nl);

    if options.export_header_footer {
        if let Some(ref header) = doc.header {
            out.push_str(&format!("<header><p>{}</p></header>", escape_html(header)));
            out.push_str(nl);
        }
    }

    for section in &doc.sections {
        write_section(&mut out, &section.paragraphs, options, assets, nl)?;
    }

    if options.export_header_footer {
        if let Some(ref footer) = doc.footer {
            out.push_str(&format!("<footer><p>{}</p></footer>", escape_html(footer)));
            out.push_str(nl);
        }
    }

    out.push_str("</body>");
    out.push_str(nl);
    out.push_str("</html>");
    out.push_str(nl);

    Ok(out)
}

/// Write one section's paragraphs, grouping consecutive list paragraphs
fn write_section(
    out: &mut String,
    paragraphs: &[Paragraph],
    options: &RenderOptions,
    assets: &mut AssetSink,
    nl: &str,
) -> Result<(), RenderError> {
    let mut in_list = false;

    for para in paragraphs {
        let is_list = para.style == STYLE_LIST;
        if is_list && !in_list {
            out.push_str("<ul>");
            out.push_str(nl);
        }
        if !is_list && in_list {
            out.push_str("</ul>");
            out.push_str(nl);
        }
        in_list = is_list;

        write_paragraph(out, para, options, assets)?;
        out.push_str(nl);
    }

    if in_list {
        out.push_str("</ul>");
        out.push_str(nl);
    }

    Ok(())
}

/// Write a single paragraph as its HTML element
fn write_paragraph(
    out: &mut String,
    para: &Paragraph,
    options: &RenderOptions,
    assets: &mut AssetSink,
) -> Result<(), RenderError> {
    if let Some(ref image) = para.image {
        if !image.exists {
            out.push_str(&format!(
                "<p class=\"image-error\">Image not found: {}</p>",
                escape_html(&image.path.display().to_string())
            ));
            return Ok(());
        }
        let name = assets.extract(&image.absolute_path)?;
        out.push_str(&format!(
            "<figure><img src=\"{}\" alt=\"{}\"></figure>",
            escape_html(&name),
            escape_html(&image.alt_text)
        ));
        return Ok(());
    }

    let indent_attr = indent_attribute(para.left_indent_pt, options);

    if let Some(level) = heading_level(&para.style) {
        out.push_str(&format!(
            "<h{}{}>{}</h{}>",
            level,
            indent_attr,
            runs_to_html(&para.runs),
            level
        ));
    } else if para.style == STYLE_CODE {
        out.push_str(&format!(
            "<pre{}><code>{}</code></pre>",
            indent_attr,
            escape_html(&para.text())
        ));
    } else if para.style == STYLE_LIST {
        out.push_str(&format!("<li{}>{}</li>", indent_attr, runs_to_html(&para.runs)));
    } else {
        out.push_str(&format!("<p{}>{}</p>", indent_attr, runs_to_html(&para.runs)));
    }

    Ok(())
}

/// Heading level for "Heading1".."Heading6" styles, None otherwise
fn heading_level(style: &str) -> Option<usize> {
    let level: usize = style.strip_prefix("Heading")?.parse().ok()?;
    if (1..=6).contains(&level) {
        Some(level)
    } else {
        None
    }
}

/// Build the margin-left style attribute for an indented paragraph
fn indent_attribute(indent_pt: i32, options: &RenderOptions) -> String {
    let indent = if indent_pt < 0 && !options.allow_negative_indent {
        0
    } else {
        indent_pt
    };
    if indent == 0 {
        String::new()
    } else {
        format!(" style=\"margin-left: {}pt;\"", indent)
    }
}

/// Convert text runs to HTML string with formatting
fn runs_to_html(runs: &[TextRun]) -> String {
    let mut result = String::new();

    for run in runs {
        let mut text = escape_html(&run.text);

        if run.code {
            text = format!("<code>{}</code>", text);
        }
        if run.bold {
            text = format!("<strong>{}</strong>", text);
        }
        if run.italic {
            text = format!("<em>{}</em>", text);
        }
        if run.strikethrough {
            text = format!("<del>{}</del>", text);
        }

        if let Some(ref url) = run.link_url {
            let escaped_url = escape_html(url);
            if let Some(ref link_title) = run.link_title {
                text = format!(
                    "<a href=\"{}\" title=\"{}\">{}</a>",
                    escaped_url,
                    escape_html(link_title),
                    text
                );
            } else {
                text = format!("<a href=\"{}\">{}</a>", escaped_url, text);
            }
        }

        result.push_str(&text);
    }

    result
}

/// Escape HTML special characters
pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_model::{heading_style, Paragraph, STYLE_NORMAL};

    fn render_string(doc: &Document, options: &RenderOptions) -> String {
        let mut assets = AssetSink::new(Path::new("out/test.html"));
        render_document(doc, options, &mut assets).unwrap()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<div>"), "&lt;div&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("\"quoted\""), "&quot;quoted&quot;");
    }

    #[test]
    fn test_runs_to_html_link() {
        let mut run = TextRun::new("link text".to_string());
        run.link_url = Some("topic.html".to_string());
        assert_eq!(
            runs_to_html(&[run]),
            "<a href=\"topic.html\">link text</a>"
        );
    }

    #[test]
    fn test_title_metadata_rendered() {
        let doc = Document::from_section(
            crate::document_model::Section {
                paragraphs: vec![Paragraph::with_text(heading_style(1), "Intro")],
            },
            "Intro",
        );
        let html = render_string(&doc, &RenderOptions::default());
        assert!(html.contains("<title>Intro</title>"));
        assert!(html.contains("<h1>Intro</h1>"));
    }

    #[test]
    fn test_pretty_print_inserts_newlines() {
        let doc = Document::from_paragraphs(vec![Paragraph::with_text(STYLE_NORMAL, "one")]);
        let compact = render_string(&doc, &RenderOptions::default());
        let pretty = render_string(
            &doc,
            &RenderOptions {
                pretty_print: true,
                ..Default::default()
            },
        );
        assert!(!compact.contains("<body>\n"));
        assert!(pretty.contains("<body>\n"));
        assert!(pretty.contains("<p>one</p>\n"));
    }

    #[test]
    fn test_negative_indent_clamped_by_default() {
        let mut para = Paragraph::with_text(STYLE_NORMAL, "hanging");
        para.left_indent_pt = -18;
        let doc = Document::from_paragraphs(vec![para]);

        let clamped = render_string(&doc, &RenderOptions::default());
        assert!(clamped.contains("<p>hanging</p>"));

        let preserved = render_string(
            &doc,
            &RenderOptions {
                allow_negative_indent: true,
                ..Default::default()
            },
        );
        assert!(preserved.contains("margin-left: -18pt;"));
    }

    #[test]
    fn test_header_footer_suppressed_by_default() {
        let mut doc = Document::from_paragraphs(vec![Paragraph::with_text(STYLE_NORMAL, "body")]);
        doc.header = Some("Running head".to_string());
        doc.footer = Some("Page foot".to_string());

        let suppressed = render_string(&doc, &RenderOptions::default());
        assert!(!suppressed.contains("<header>"));
        assert!(!suppressed.contains("<footer>"));

        let emitted = render_string(
            &doc,
            &RenderOptions {
                export_header_footer: true,
                ..Default::default()
            },
        );
        assert!(emitted.contains("<header><p>Running head</p></header>"));
        assert!(emitted.contains("<footer><p>Page foot</p></footer>"));
    }

    #[test]
    fn test_list_grouping() {
        let doc = Document::from_paragraphs(vec![
            Paragraph::with_text(STYLE_LIST, "first"),
            Paragraph::with_text(STYLE_LIST, "second"),
            Paragraph::with_text(STYLE_NORMAL, "after"),
        ]);
        let html = render_string(&doc, &RenderOptions::default());
        assert!(html.contains("<ul><li>first</li><li>second</li></ul><p>after</p>"));
    }

    #[test]
    fn test_missing_image_placeholder() {
        let mut para = Paragraph::new(STYLE_NORMAL);
        para.image = Some(crate::document_model::ImageReference {
            path: PathBuf::from("gone.png"),
            absolute_path: PathBuf::from("/nowhere/gone.png"),
            alt_text: "gone".to_string(),
            exists: false,
        });
        let doc = Document::from_paragraphs(vec![para]);
        let html = render_string(&doc, &RenderOptions::default());
        assert!(html.contains("image-error"));
        assert!(html.contains("gone.png"));
    }
}
