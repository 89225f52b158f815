//! Printable document assembly.
//!
//! Turns one [`DocumentConfig`] plus the HTML produced from its markdown into a
//! complete, self-contained HTML document ready for the print engine:
//!
//! - a stylesheet, with a watermark rule when one is configured
//! - the cover page, which always ends with a page break
//! - the converted body, inserted as-is
//! - the page footer, with or without an inline logo
//!
//! The body is trusted: it comes from the batch's own source documents and is
//! not sanitised.

pub mod cover;
pub mod footer;
pub mod styles;

use crate::config::DocumentConfig;
pub use footer::Footer;

/// A fully assembled document.
#[derive(Debug, Clone)]
pub struct FullDocument {
    pub title: String,
    pub stylesheet: String,
    pub cover: String,
    pub body: String,
    pub footer: Footer,
}

impl FullDocument {
    pub fn to_html(&self) -> String {
        self.to_html_with_styles("")
    }

    /// Render the document, appending `extra` CSS after the document's own
    /// stylesheet so it takes precedence.
    pub fn to_html_with_styles(&self, extra: &str) -> String {
        let extra = if extra.is_empty() {
            String::new()
        } else {
            format!("\n<style>\n{extra}</style>")
        };

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>{title}</title>
<style>
{stylesheet}</style>{extra}
</head>
<body>
{cover}
{body}
{footer}
</body>
</html>
"#,
            title = html_escape::encode_text(&self.title),
            stylesheet = self.stylesheet,
            extra = extra,
            cover = self.cover,
            body = self.body,
            footer = self.footer.markup(),
        )
    }
}

/// Assemble the printable document for `config` around an already converted body.
pub fn assemble(config: &DocumentConfig, body_html: String) -> FullDocument {
    FullDocument {
        title: config.title.clone(),
        stylesheet: styles::build_stylesheet(config.watermark.as_deref()),
        cover: cover::render(config),
        body: body_html,
        footer: footer::build(config),
    }
}
