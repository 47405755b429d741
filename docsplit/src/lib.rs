//! docsplit - heading-based document splitter
//!
//! Splits a source document into standalone HTML topics at heading
//! boundaries and generates a hyperlinked table of contents from a merge
//! template. The pipeline is strictly sequential: load, split, export,
//! TOC; every stage error is fatal to the run.

#![deny(unsafe_code)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod document_loader;
pub mod document_model;
pub mod html_renderer;
pub mod pipeline;
pub mod split_config;
pub mod toc_generator;
pub mod topic_exporter;
pub mod topic_splitter;
