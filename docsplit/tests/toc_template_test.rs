//! Template shape and TOC generation behavior at the pipeline level

use docsplit::pipeline::{self, PipelineError};
use docsplit::split_config::{SplitConfig, TocConfig};
use docsplit::toc_generator::TocError;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    input: PathBuf,
    template: PathBuf,
    out_dir: PathBuf,
}

fn fixture(template_content: &str) -> Fixture {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("source.md");
    fs::write(&input, "# A\n\nbody\n\n# B\n\nbody\n").unwrap();
    let template = dir.path().join("toc.md");
    fs::write(&template, template_content).unwrap();
    let out_dir = dir.path().join("out");
    fs::create_dir(&out_dir).unwrap();
    Fixture {
        _dir: dir,
        input,
        template,
        out_dir,
    }
}

#[test]
fn test_template_without_region_fails_after_topics_written() {
    let fx = fixture("# Contents\n\nno region here\n");

    let err = pipeline::run(&fx.input, &fx.template, &fx.out_dir, &SplitConfig::default())
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Toc(TocError::MissingRegion(_))
    ));
    // Topics were already exported; only the TOC is missing
    assert!(fx.out_dir.join("A.html").exists());
    assert!(fx.out_dir.join("B.html").exists());
    assert!(!fx.out_dir.join("contents.html").exists());
}

#[test]
fn test_template_with_unterminated_region_fails() {
    let fx = fixture("<!-- region: TOC -->\n- {{TocEntry}}\n");

    let err = pipeline::run(&fx.input, &fx.template, &fx.out_dir, &SplitConfig::default())
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Toc(TocError::UnterminatedRegion(_))
    ));
}

#[test]
fn test_template_without_field_fails() {
    let fx = fixture("<!-- region: TOC -->\nstatic text only\n<!-- end: TOC -->\n");

    let err = pipeline::run(&fx.input, &fx.template, &fx.out_dir, &SplitConfig::default())
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Toc(TocError::FieldCount { count: 0, .. })
    ));
}

#[test]
fn test_missing_template_file_fails() {
    let fx = fixture("irrelevant");
    fs::remove_file(&fx.template).unwrap();

    let err = pipeline::run(&fx.input, &fx.template, &fx.out_dir, &SplitConfig::default())
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Toc(TocError::TemplateLoad(_, _))
    ));
}

#[test]
fn test_template_content_outside_region_preserved() {
    let fx = fixture(
        "# Guide Contents\n\nPreamble paragraph.\n\n<!-- region: TOC -->\n- {{TocEntry}}\n<!-- end: TOC -->\n\nTrailing note.\n",
    );

    let report = pipeline::run(&fx.input, &fx.template, &fx.out_dir, &SplitConfig::default())
        .unwrap();

    let toc = fs::read_to_string(&report.toc_path).unwrap();
    assert!(toc.contains("<title>Guide Contents</title>"));
    assert!(toc.contains("Preamble paragraph."));
    assert!(toc.contains("Trailing note."));
    let preamble = toc.find("Preamble paragraph.").unwrap();
    let first_link = toc.find("href=\"A.html\"").unwrap();
    let note = toc.find("Trailing note.").unwrap();
    assert!(preamble < first_link && first_link < note);
}

#[test]
fn test_custom_region_and_field_names() {
    let fx = fixture("<!-- region: Chapters -->\n{{Link}}\n\n<!-- end: Chapters -->\n");
    let config = SplitConfig {
        toc: TocConfig {
            region: "Chapters".to_string(),
            field: "Link".to_string(),
        },
        ..Default::default()
    };

    let report = pipeline::run(&fx.input, &fx.template, &fx.out_dir, &config).unwrap();

    let toc = fs::read_to_string(&report.toc_path).unwrap();
    assert!(toc.contains("<a href=\"A.html\">A</a>"));
    assert!(toc.contains("<a href=\"B.html\">B</a>"));
}
