//! PDF rendering of assembled documents.
//!
//! Rendering is delegated to an external print engine behind the [`Render`]
//! trait. Page geometry is fixed by [`PageLayout`]; the engine's own
//! header/footer injection stays off because every document carries its own
//! footer markup.

mod chrome;

pub use chrome::Chrome;

use crate::document::FullDocument;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while turning a document into a PDF
#[derive(Error, Debug)]
pub enum RenderError {
    /// No usable print engine executable
    #[error("print engine not found: {0}")]
    EngineNotFound(String),

    #[error("failed to start {}: {source}", .executable.display())]
    Spawn {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("print engine exited with {status}: {stderr}")]
    Engine { status: ExitStatus, stderr: String },

    #[error("print engine did not finish within {0:?}")]
    Timeout(Duration),

    #[error("print engine reported success but wrote no file at {}", .0.display())]
    NoOutput(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Anything that can print an assembled document to a PDF file.
pub trait Render {
    fn render(
        &self,
        document: &FullDocument,
        outfile: &Path,
        layout: &PageLayout,
    ) -> Result<(), RenderError>;
}

/// Physical page setup handed to the print engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub page_width_in: f32,
    pub page_height_in: f32,
    pub margin_top_in: f32,
    pub margin_right_in: f32,
    pub margin_bottom_in: f32,
    pub margin_left_in: f32,
    /// Keep background colours and images in the output
    pub print_background: bool,
    /// Let the engine stamp its own header and footer on each page
    pub engine_header_footer: bool,
}

impl PageLayout {
    /// US Letter with 1in top/bottom and 0.75in side margins.
    pub const LETTER: PageLayout = PageLayout {
        page_width_in: 8.5,
        page_height_in: 11.0,
        margin_top_in: 1.0,
        margin_right_in: 0.75,
        margin_bottom_in: 1.0,
        margin_left_in: 0.75,
        print_background: true,
        engine_header_footer: false,
    };

    /// CSS enforcing this layout, for engines that take page setup from the markup.
    pub fn page_rules(&self) -> String {
        let mut css = format!(
            "@page {{\n    size: {}in {}in;\n    margin: {}in {}in {}in {}in;\n}}\n",
            self.page_width_in,
            self.page_height_in,
            self.margin_top_in,
            self.margin_right_in,
            self.margin_bottom_in,
            self.margin_left_in,
        );
        if self.print_background {
            css.push_str(
                "html {\n    -webkit-print-color-adjust: exact;\n    print-color-adjust: exact;\n}\n",
            );
        }
        css
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        PageLayout::LETTER
    }
}
