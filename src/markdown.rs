//! Markdown to HTML conversion.

use pulldown_cmark::{html, Options, Parser};

/// Turns source text into HTML body content.
pub trait Convert {
    fn convert(&self, markdown: &str) -> String;
}

/// CommonMark with the GitHub-flavoured extensions whitepapers tend to use.
#[derive(Debug, Default, Clone, Copy)]
pub struct Markdown;

impl Markdown {
    fn options() -> Options {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options
    }
}

impl Convert for Markdown {
    fn convert(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, Markdown::options());
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}
