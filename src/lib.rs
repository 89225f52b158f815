//! Turn markdown documents into branded, print-ready PDFs.
//!
//! A batch is a list of [`config::DocumentConfig`]s. Each one is converted from
//! markdown to HTML, wrapped with a cover page, stylesheet and footer, and
//! printed to PDF by a headless browser. Documents are processed one at a time
//! and a failing document never stops the rest of the batch.

pub mod batch;
pub mod config;
pub mod document;
pub mod markdown;
pub mod render;
pub mod report;
