//! Document tree shared by the splitter, exporter and renderer
//!
//! A [`Document`] owns an ordered list of [`Section`]s, each owning an
//! ordered list of [`Paragraph`]s. Paragraphs carry a style identifier
//! ("Heading1", "Normal", ...) and formatted text runs. Structural edits
//! (section break insertion) operate on [`ParagraphRef`] handles collected
//! beforehand, never on live iterators.

use std::path::PathBuf;
use thiserror::Error;

/// Style identifier for body text paragraphs
pub const STYLE_NORMAL: &str = "Normal";

/// Style identifier for code block paragraphs
pub const STYLE_CODE: &str = "Code";

/// Style identifier for list item paragraphs
pub const STYLE_LIST: &str = "ListParagraph";

/// Map a heading level to its style identifier
///
/// Levels 1-6 map to "Heading1" through "Heading6"; out-of-range levels
/// are clamped.
pub fn heading_style(level: usize) -> &'static str {
    match level {
        1 => "Heading1",
        2 => "Heading2",
        3 => "Heading3",
        4 => "Heading4",
        5 => "Heading5",
        6 => "Heading6",
        _ if level < 1 => "Heading1",
        _ => "Heading6",
    }
}

/// The document being split and exported
#[derive(Debug, Clone)]
pub struct Document {
    /// Title metadata, rendered as the HTML `<title>`
    pub title: Option<String>,

    /// Running header text (only rendered when header/footer export is on)
    pub header: Option<String>,

    /// Running footer text (only rendered when header/footer export is on)
    pub footer: Option<String>,

    /// Ordered sections of the document
    pub sections: Vec<Section>,
}

impl Document {
    /// Create a document with a single section holding the given paragraphs
    ///
    /// A loaded document always starts as one implicit section; topic
    /// splitting introduces further section boundaries afterwards.
    pub fn from_paragraphs(paragraphs: Vec<Paragraph>) -> Self {
        let paragraphs = if paragraphs.is_empty() {
            // Keep the section invariant: at least one paragraph
            vec![Paragraph::new(STYLE_NORMAL)]
        } else {
            paragraphs
        };
        Self {
            title: None,
            header: None,
            footer: None,
            sections: vec![Section { paragraphs }],
        }
    }

    /// Build a standalone single-section document from one section
    ///
    /// Used by the topic exporter to render a section in isolation with
    /// its own title metadata. Formatting is preserved via the clone.
    pub fn from_section(section: Section, title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            header: None,
            footer: None,
            sections: vec![section],
        }
    }

    /// Look up a paragraph by stable handle
    pub fn paragraph(&self, at: ParagraphRef) -> Option<&Paragraph> {
        self.sections.get(at.section)?.paragraphs.get(at.paragraph)
    }

    /// Insert a section boundary immediately before the referenced paragraph
    ///
    /// Everything from the referenced paragraph onward moves into a new
    /// section inserted right after the one being closed. The closed section
    /// keeps a carried empty terminator paragraph (the paragraph mark that a
    /// break insertion leaves behind); callers that must not emit empty
    /// topics remove it with [`Section::remove_trailing_empty_paragraph`].
    ///
    /// Inserting before a paragraph that is already first in its section is
    /// a no-op.
    pub fn insert_section_break_before(
        &mut self,
        at: ParagraphRef,
    ) -> Result<(), StructuralEditError> {
        let section = self
            .sections
            .get_mut(at.section)
            .ok_or(StructuralEditError::DetachedParagraph {
                section: at.section,
                paragraph: at.paragraph,
            })?;

        if at.paragraph >= section.paragraphs.len() {
            return Err(StructuralEditError::DetachedParagraph {
                section: at.section,
                paragraph: at.paragraph,
            });
        }

        if at.paragraph == 0 {
            return Ok(());
        }

        let tail = section.paragraphs.split_off(at.paragraph);
        section.paragraphs.push(Paragraph::new(STYLE_NORMAL));
        self.sections.insert(at.section + 1, Section { paragraphs: tail });

        Ok(())
    }
}

/// A contiguous run of paragraphs, exported as one topic
#[derive(Debug, Clone)]
pub struct Section {
    /// Ordered paragraphs; never empty for a loaded or split document
    pub paragraphs: Vec<Paragraph>,
}

impl Section {
    /// First paragraph of the section (its heading, once split)
    pub fn first_paragraph(&self) -> Option<&Paragraph> {
        self.paragraphs.first()
    }

    /// Last paragraph of the section
    pub fn last_paragraph(&self) -> Option<&Paragraph> {
        self.paragraphs.last()
    }

    /// Remove the trailing paragraph if it is empty
    ///
    /// Returns true if a paragraph was removed. The section is never
    /// emptied: a single remaining paragraph stays even when empty.
    pub fn remove_trailing_empty_paragraph(&mut self) -> bool {
        if self.paragraphs.len() > 1
            && self.paragraphs.last().is_some_and(Paragraph::is_empty)
        {
            self.paragraphs.pop();
            true
        } else {
            false
        }
    }
}

/// A styled paragraph with formatted text runs
#[derive(Debug, Clone)]
pub struct Paragraph {
    /// Style identifier (e.g. "Heading1", "Normal", "Code")
    pub style: String,

    /// Left indentation in points; negative values are possible and are
    /// clamped by the renderer unless negative indent is allowed
    pub left_indent_pt: i32,

    /// Formatted text runs comprising the paragraph content
    pub runs: Vec<TextRun>,

    /// Inline image carried by this paragraph, if any
    pub image: Option<ImageReference>,
}

impl Paragraph {
    /// Create an empty paragraph with the given style
    pub fn new(style: &str) -> Self {
        Self {
            style: style.to_string(),
            left_indent_pt: 0,
            runs: Vec::new(),
            image: None,
        }
    }

    /// Create a paragraph with a single plain text run
    pub fn with_text(style: &str, text: &str) -> Self {
        Self {
            style: style.to_string(),
            left_indent_pt: 0,
            runs: vec![TextRun::new(text.to_string())],
            image: None,
        }
    }

    /// Concatenated text of all runs
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Whether the paragraph carries no visible content
    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.runs.iter().all(|r| r.text.trim().is_empty())
    }
}

/// A span of text with consistent formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Bold formatting
    pub bold: bool,

    /// Italic formatting
    pub italic: bool,

    /// Inline code formatting
    pub code: bool,

    /// Strikethrough formatting
    pub strikethrough: bool,

    /// Link URL (if this text is part of a hyperlink)
    pub link_url: Option<String>,

    /// Link title (if this text is part of a hyperlink)
    pub link_title: Option<String>,
}

impl TextRun {
    /// Create a new plain text run
    pub fn new(text: String) -> Self {
        Self {
            text,
            bold: false,
            italic: false,
            code: false,
            strikethrough: false,
            link_url: None,
            link_title: None,
        }
    }
}

/// Reference to an image carried by a paragraph
#[derive(Debug, Clone)]
pub struct ImageReference {
    /// Path as written in the source document
    pub path: PathBuf,

    /// Absolute path resolved against the source document's directory
    pub absolute_path: PathBuf,

    /// Alternative text for the image
    pub alt_text: String,

    /// Whether the image file exists on disk
    pub exists: bool,
}

/// Stable handle to a paragraph, collected before any mutation
///
/// Handles are (section index, paragraph index) pairs valid against the
/// document state they were collected from. Mutating from the back of a
/// collected list keeps earlier handles valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ParagraphRef {
    /// Section index within the document
    pub section: usize,

    /// Paragraph index within the section
    pub paragraph: usize,
}

/// Errors from structural document edits
#[derive(Error, Debug)]
pub enum StructuralEditError {
    /// The referenced paragraph does not exist in the document
    #[error("detached paragraph reference: section {section}, paragraph {paragraph}")]
    DetachedParagraph {
        /// Section index of the bad reference
        section: usize,
        /// Paragraph index of the bad reference
        paragraph: usize,
    },

    /// Break targets were not given in ascending document order
    #[error("paragraph references out of document order at section {section}, paragraph {paragraph}")]
    OutOfOrderRefs {
        /// Section index of the offending reference
        section: usize,
        /// Paragraph index of the offending reference
        paragraph: usize,
    },
}
