//! Markdown document loading
//!
//! Converts pulldown-cmark's event stream into the Section/Paragraph tree
//! used by the splitter and exporter. Headings map to "Heading1".."Heading6"
//! paragraph styles, everything else to body styles, so the splitter only
//! ever deals in style identifiers.

use crate::document_model::{
    heading_style, Document, ImageReference, Paragraph, TextRun, STYLE_CODE, STYLE_LIST,
    STYLE_NORMAL,
};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Left indent applied per block quote nesting level
const BLOCKQUOTE_INDENT_PT: i32 = 36;

/// Errors that can occur while loading a source document
#[derive(Error, Debug)]
pub enum DocumentLoadError {
    /// File could not be read (missing, unreadable, or not valid UTF-8)
    #[error("error reading {path}: {source}", path = .0.display(), source = .1)]
    IoError(PathBuf, #[source] std::io::Error),
}

/// Load a Markdown source document into a single-section [`Document`]
///
/// Relative image paths are resolved against the source file's directory.
pub fn load_document(path: &Path) -> Result<Document, DocumentLoadError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| DocumentLoadError::IoError(path.to_path_buf(), e))?;

    let source_dir = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(parse_markdown(&content, source_dir))
}

/// Parse Markdown content into a single-section [`Document`]
pub fn parse_markdown(content: &str, source_dir: &Path) -> Document {
    let mut loader = Loader::new(source_dir);
    for event in Parser::new(content) {
        loader.process_event(event);
    }
    Document::from_paragraphs(loader.finish())
}

/// Active formatting state during parsing
///
/// Tracks which inline formatting is currently open as the event stream
/// is processed.
#[derive(Debug, Clone, Default)]
struct TextFormatting {
    bold: bool,
    italic: bool,
    strikethrough: bool,
    link_url: Option<String>,
    link_title: Option<String>,
}

/// Parser state for converting markdown events to paragraphs
struct Loader<'a> {
    /// Directory for resolving relative image paths
    source_dir: &'a Path,

    /// Current formatting state
    formatting: TextFormatting,

    /// Runs being accumulated for the current paragraph
    current_runs: Vec<TextRun>,

    /// Completed paragraphs in document order
    paragraphs: Vec<Paragraph>,

    /// Block quote nesting depth
    blockquote_depth: usize,

    /// List nesting depth (> 0 inside a list)
    list_depth: usize,

    /// Code block text being accumulated, if inside one
    code_text: Option<String>,

    /// Image currently open (url, title) with its alt text buffer
    pending_image: Option<(String, String, String)>,
}

impl<'a> Loader<'a> {
    fn new(source_dir: &'a Path) -> Self {
        Self {
            source_dir,
            formatting: TextFormatting::default(),
            current_runs: Vec::new(),
            paragraphs: Vec::new(),
            blockquote_depth: 0,
            list_depth: 0,
            code_text: None,
            pending_image: None,
        }
    }

    fn finish(mut self) -> Vec<Paragraph> {
        self.flush_paragraph(STYLE_NORMAL);
        self.paragraphs
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.handle_start_tag(tag),
            Event::End(tag_end) => self.handle_end_tag(tag_end),
            Event::Text(text) => self.handle_text(text.to_string()),
            Event::Code(code) => self.handle_inline_code(code.to_string()),
            Event::SoftBreak => self.handle_text(" ".to_string()),
            Event::HardBreak => self.handle_text("\n".to_string()),
            // Raw HTML (including comments) has no paragraph representation
            Event::Html(_) | Event::InlineHtml(_) => {}
            Event::Rule => {}
            _ => {}
        }
    }

    fn handle_start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.current_runs.clear();
            }
            Tag::Heading { .. } => {
                self.current_runs.clear();
            }
            Tag::BlockQuote(_) => {
                self.blockquote_depth += 1;
            }
            Tag::CodeBlock(_) => {
                self.code_text = Some(String::new());
            }
            Tag::List(_) => {
                self.list_depth += 1;
            }
            Tag::Item => {
                self.current_runs.clear();
            }
            Tag::Emphasis => {
                self.formatting.italic = true;
            }
            Tag::Strong => {
                self.formatting.bold = true;
            }
            Tag::Strikethrough => {
                self.formatting.strikethrough = true;
            }
            Tag::Link {
                dest_url, title, ..
            } => {
                self.formatting.link_url = Some(dest_url.to_string());
                self.formatting.link_title = if title.is_empty() {
                    None
                } else {
                    Some(title.to_string())
                };
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.pending_image =
                    Some((dest_url.to_string(), title.to_string(), String::new()));
            }
            _ => {}
        }
    }

    fn handle_end_tag(&mut self, tag_end: TagEnd) {
        match tag_end {
            TagEnd::Paragraph => {
                self.flush_paragraph(STYLE_NORMAL);
            }
            TagEnd::Heading(level) => {
                self.flush_paragraph(heading_style(level as usize));
            }
            TagEnd::BlockQuote(_) => {
                self.blockquote_depth = self.blockquote_depth.saturating_sub(1);
            }
            TagEnd::CodeBlock => {
                self.flush_code_block();
            }
            TagEnd::List(_) => {
                self.list_depth = self.list_depth.saturating_sub(1);
            }
            TagEnd::Item => {
                self.flush_paragraph(STYLE_LIST);
            }
            TagEnd::Emphasis => {
                self.formatting.italic = false;
            }
            TagEnd::Strong => {
                self.formatting.bold = false;
            }
            TagEnd::Strikethrough => {
                self.formatting.strikethrough = false;
            }
            TagEnd::Link => {
                self.formatting.link_url = None;
                self.formatting.link_title = None;
            }
            TagEnd::Image => {
                self.flush_image();
            }
            _ => {}
        }
    }

    fn handle_text(&mut self, text: String) {
        if let Some((_, _, alt)) = self.pending_image.as_mut() {
            alt.push_str(&text);
            return;
        }
        if let Some(code) = self.code_text.as_mut() {
            code.push_str(&text);
            return;
        }
        if text.is_empty() {
            return;
        }
        let mut run = TextRun::new(text);
        run.bold = self.formatting.bold;
        run.italic = self.formatting.italic;
        run.strikethrough = self.formatting.strikethrough;
        run.link_url = self.formatting.link_url.clone();
        run.link_title = self.formatting.link_title.clone();
        self.current_runs.push(run);
    }

    fn handle_inline_code(&mut self, code: String) {
        let mut run = TextRun::new(code);
        run.code = true;
        run.link_url = self.formatting.link_url.clone();
        self.current_runs.push(run);
    }

    /// Close the current paragraph with the given style
    fn flush_paragraph(&mut self, style: &str) {
        if self.current_runs.is_empty() {
            return;
        }
        let style = if style == STYLE_NORMAL && self.list_depth > 0 {
            STYLE_LIST
        } else {
            style
        };
        let mut para = Paragraph::new(style);
        para.left_indent_pt = self.blockquote_depth as i32 * BLOCKQUOTE_INDENT_PT;
        para.runs = std::mem::take(&mut self.current_runs);
        self.paragraphs.push(para);
    }

    fn flush_code_block(&mut self) {
        let Some(code) = self.code_text.take() else {
            return;
        };
        let mut para = Paragraph::new(STYLE_CODE);
        para.left_indent_pt = self.blockquote_depth as i32 * BLOCKQUOTE_INDENT_PT;
        // Trailing newline comes from the fence, not the content
        para.runs = vec![TextRun::new(
            code.strip_suffix('\n').unwrap_or(&code).to_string(),
        )];
        self.paragraphs.push(para);
    }

    /// Emit the open image as its own paragraph
    ///
    /// Runs accumulated before an inline image are flushed first so the
    /// image lands between two text paragraphs in document order.
    fn flush_image(&mut self) {
        let Some((url, title, alt)) = self.pending_image.take() else {
            return;
        };
        self.flush_paragraph(STYLE_NORMAL);

        let path = PathBuf::from(&url);
        let absolute_path = if path.is_absolute() {
            path.clone()
        } else {
            self.source_dir.join(&path)
        };
        let exists = absolute_path.exists();
        if !exists {
            log::warn!("image not found: {}", absolute_path.display());
        }

        let alt_text = if alt.is_empty() { title } else { alt };
        let mut para = Paragraph::new(STYLE_NORMAL);
        para.image = Some(ImageReference {
            path,
            absolute_path,
            alt_text,
            exists,
        });
        self.paragraphs.push(para);
    }
}
