//! Topic boundary detection and section break insertion
//!
//! Splitting is two separate passes: [`select_topic_starts`] scans the
//! document and collects stable paragraph handles without mutating anything,
//! then [`insert_breaks`] mutates from that snapshot. Mutating while
//! scanning risks skipping or duplicating paragraphs, so the two are never
//! combined.

use crate::document_model::{Document, ParagraphRef, StructuralEditError};
use itertools::Itertools;

/// Collect every paragraph with the topic heading style, in document order
///
/// Pure scan; the document is not touched. A document whose first paragraph
/// is not a heading keeps that preamble as its own leading topic after
/// splitting.
pub fn select_topic_starts(doc: &Document, heading_style: &str) -> Vec<ParagraphRef> {
    let mut starts = Vec::new();

    for (section_idx, section) in doc.sections.iter().enumerate() {
        for (para_idx, para) in section.paragraphs.iter().enumerate() {
            if para.style == heading_style {
                starts.push(ParagraphRef {
                    section: section_idx,
                    paragraph: para_idx,
                });
            }
        }
    }

    starts
}

/// Insert a section boundary before each heading paragraph
///
/// Headings already first in their section are skipped, which makes the
/// operation idempotent: a second pass over an already-split document finds
/// every heading at the front of its section and does nothing.
///
/// The handles must come from [`select_topic_starts`] on the same document
/// state (ascending document order); breaks are applied back to front so
/// earlier handles stay valid while later sections are split. The spurious
/// trailing empty paragraph that a break leaves in the closed section is
/// removed so no empty topic is emitted.
pub fn insert_breaks(
    doc: &mut Document,
    starts: &[ParagraphRef],
) -> Result<(), StructuralEditError> {
    // Reject a snapshot that was not collected in document order
    if let Some((_, bad)) = starts.iter().tuple_windows().find(|(a, b)| a >= b) {
        return Err(StructuralEditError::OutOfOrderRefs {
            section: bad.section,
            paragraph: bad.paragraph,
        });
    }

    for at in starts {
        if doc.paragraph(*at).is_none() {
            return Err(StructuralEditError::DetachedParagraph {
                section: at.section,
                paragraph: at.paragraph,
            });
        }
    }

    let mut splits = 0usize;
    for at in starts.iter().rev() {
        if at.paragraph == 0 {
            // Already first in its section; nothing to split
            continue;
        }
        doc.insert_section_break_before(*at)?;
        doc.sections[at.section].remove_trailing_empty_paragraph();
        splits += 1;
    }

    log::debug!(
        "inserted {} section breaks for {} topic starts",
        splits,
        starts.len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_loader::parse_markdown;
    use std::path::Path;

    fn load(content: &str) -> Document {
        parse_markdown(content, Path::new("."))
    }

    fn split(doc: &mut Document) {
        let starts = select_topic_starts(doc, "Heading1");
        insert_breaks(doc, &starts).unwrap();
    }

    #[test]
    fn test_select_finds_headings_in_order() {
        let doc = load("# A\n\nbody\n\n# B\n\n## Sub\n\n# C\n");
        let starts = select_topic_starts(&doc, "Heading1");
        assert_eq!(starts.len(), 3);
        assert!(starts.iter().tuple_windows().all(|(a, b)| a < b));
    }

    #[test]
    fn test_select_respects_configured_style() {
        let doc = load("# A\n\n## One\n\n## Two\n");
        assert_eq!(select_topic_starts(&doc, "Heading2").len(), 2);
    }

    #[test]
    fn test_split_produces_one_section_per_heading() {
        let mut doc = load("# A\n\none\n\n# B\n\ntwo\n\n# C\n\nthree\n");
        split(&mut doc);

        assert_eq!(doc.sections.len(), 3);
        for (section, title) in doc.sections.iter().zip(["A", "B", "C"]) {
            assert_eq!(section.first_paragraph().unwrap().text(), title);
        }
    }

    #[test]
    fn test_split_removes_spurious_trailing_paragraph() {
        let mut doc = load("# A\n\none\n\n# B\n");
        split(&mut doc);

        // The closed first section must not keep the carried empty paragraph
        let first = &doc.sections[0];
        assert!(!first.last_paragraph().unwrap().is_empty());
        assert_eq!(first.paragraphs.len(), 2);
    }

    #[test]
    fn test_split_is_idempotent() {
        let mut doc = load("# A\n\none\n\n# B\n\ntwo\n");
        split(&mut doc);
        let section_lens: Vec<usize> =
            doc.sections.iter().map(|s| s.paragraphs.len()).collect();

        split(&mut doc);
        let again: Vec<usize> = doc.sections.iter().map(|s| s.paragraphs.len()).collect();

        assert_eq!(section_lens, again);
    }

    #[test]
    fn test_no_headings_leaves_single_section() {
        let mut doc = load("just some text\n\nand more\n");
        split(&mut doc);
        assert_eq!(doc.sections.len(), 1);
    }

    #[test]
    fn test_preamble_becomes_leading_topic() {
        let mut doc = load("intro text before any heading\n\n# A\n\nbody\n");
        split(&mut doc);
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(
            doc.sections[0].first_paragraph().unwrap().text(),
            "intro text before any heading"
        );
        assert_eq!(doc.sections[1].first_paragraph().unwrap().text(), "A");
    }

    #[test]
    fn test_out_of_order_refs_rejected() {
        let mut doc = load("# A\n\n# B\n");
        let mut starts = select_topic_starts(&doc, "Heading1");
        starts.reverse();
        let err = insert_breaks(&mut doc, &starts).unwrap_err();
        assert!(matches!(err, StructuralEditError::OutOfOrderRefs { .. }));
    }

    #[test]
    fn test_detached_ref_rejected() {
        let mut doc = load("# A\n");
        let err = insert_breaks(
            &mut doc,
            &[ParagraphRef {
                section: 4,
                paragraph: 0,
            }],
        )
        .unwrap_err();
        assert!(matches!(err, StructuralEditError::DetachedParagraph { .. }));
    }
}
