//! Sequential batch conversion.
//!
//! Documents are processed one at a time, in configuration order, through a
//! fixed pipeline:
//!
//! 1. check that the input exists
//! 2. read and convert the markdown
//! 3. assemble the printable document
//! 4. create the output directory and render the PDF
//!
//! A failure at any stage fails that document only. It is reported and counted,
//! and the batch moves on to the next document.

use crate::config::{DocumentConfig, DocumentSet};
use crate::document::{self, FullDocument};
use crate::markdown::Convert;
use crate::render::{PageLayout, Render, RenderError};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Why a single document could not be produced.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create output directory {}: {source}", .path.display())]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write HTML to {}: {source}", .path.display())]
    WriteHtml {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("render failed: {0}")]
    Render(#[from] RenderError),
}

/// Result of one document's trip through the pipeline.
#[derive(Debug)]
pub enum Outcome {
    Succeeded {
        output: PathBuf,
        /// Size of the written PDF, when it could be read back
        bytes: Option<u64>,
        elapsed: Duration,
    },
    Failed(DocumentError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded { .. })
    }
}

/// Running and final tally of a batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn processed(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Process exit status: `1` if any document failed.
    pub fn exit_status(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }

    fn record(&mut self, outcome: &Outcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// Observer for batch progress; all console output goes through here.
pub trait Reporter {
    fn batch_started(&mut self, _total: usize) {}
    fn document_started(&mut self, config: &DocumentConfig);
    fn document_finished(
        &mut self,
        config: &DocumentConfig,
        outcome: &Outcome,
        tally: &BatchSummary,
    );
    fn batch_finished(&mut self, summary: &BatchSummary);
}

/// The collaborators used to produce each document.
pub struct Pipeline<'a> {
    pub converter: &'a dyn Convert,
    pub renderer: &'a dyn Render,
    pub layout: PageLayout,
    /// Also write the assembled HTML next to each PDF
    pub keep_html: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(converter: &'a dyn Convert, renderer: &'a dyn Render) -> Pipeline<'a> {
        Pipeline {
            converter,
            renderer,
            layout: PageLayout::LETTER,
            keep_html: false,
        }
    }

    pub fn keep_html(mut self, keep_html: bool) -> Pipeline<'a> {
        self.keep_html = keep_html;
        self
    }

    /// Run one document through every stage.
    pub fn process(&self, config: &DocumentConfig) -> Result<(), DocumentError> {
        if !config.input.is_file() {
            return Err(DocumentError::MissingInput(config.input.clone()));
        }
        let markdown =
            std::fs::read_to_string(&config.input).map_err(|source| DocumentError::ReadInput {
                path: config.input.clone(),
                source,
            })?;

        let body = self.converter.convert(&markdown);
        let document = document::assemble(config, body);

        ensure_parent_dir(&config.output)?;
        if self.keep_html {
            write_html(&document, &config.output)?;
        }

        self.renderer.render(&document, &config.output, &self.layout)?;
        Ok(())
    }

    fn outcome(&self, config: &DocumentConfig) -> Outcome {
        let started = Instant::now();
        match self.process(config) {
            Ok(()) => Outcome::Succeeded {
                output: config.output.clone(),
                bytes: std::fs::metadata(&config.output).ok().map(|m| m.len()),
                elapsed: started.elapsed(),
            },
            Err(e) => {
                log::debug!("document '{}' failed: {e:?}", config.name);
                Outcome::Failed(e)
            }
        }
    }
}

/// Convert every document in `documents`, in order, isolating failures.
pub fn run(
    documents: &DocumentSet,
    pipeline: &Pipeline,
    reporter: &mut dyn Reporter,
) -> BatchSummary {
    let mut summary = BatchSummary::default();
    reporter.batch_started(documents.len());

    for config in documents.iter() {
        reporter.document_started(config);
        let outcome = pipeline.outcome(config);
        summary.record(&outcome);
        reporter.document_finished(config, &outcome, &summary);
    }

    reporter.batch_finished(&summary);
    summary
}

fn ensure_parent_dir(output: &Path) -> Result<(), DocumentError> {
    match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            std::fs::create_dir_all(dir).map_err(|source| DocumentError::CreateOutputDir {
                path: dir.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

fn write_html(document: &FullDocument, output: &Path) -> Result<(), DocumentError> {
    let path = output.with_extension("html");
    std::fs::write(&path, document.to_html())
        .map_err(|source| DocumentError::WriteHtml { path, source })
}
