//! Page footer rendering.
//!
//! A footer is either plain text or text with an inline logo. A missing or
//! unreadable logo is a normal configuration and silently produces the text-only
//! variant. Logos are embedded as base64 data URLs; the image subtype is the
//! file extension exactly as written.

use crate::config::DocumentConfig;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

/// An image embedded directly in the markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// The `image/<subtype>` part of the data URL
    pub subtype: String,
    /// Base64-encoded image bytes
    pub data: String,
}

impl InlineImage {
    /// Read and encode the image at `path`.
    pub fn load(path: &Path) -> std::io::Result<InlineImage> {
        let bytes = std::fs::read(path)?;
        let subtype = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(InlineImage {
            subtype,
            data: STANDARD.encode(bytes),
        })
    }

    pub fn data_url(&self) -> String {
        format!("data:image/{};base64,{}", self.subtype, self.data)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Footer {
    TextOnly { text: String },
    WithLogo { text: String, logo: InlineImage },
}

impl Footer {
    pub fn text(&self) -> &str {
        match self {
            Footer::TextOnly { text } | Footer::WithLogo { text, .. } => text,
        }
    }

    /// Render the footer element.
    pub fn markup(&self) -> String {
        let logo = match self {
            Footer::TextOnly { .. } => String::new(),
            Footer::WithLogo { logo, .. } => format!(
                "\n    <img src=\"{}\" class=\"footer-logo\" />",
                html_escape::encode_double_quoted_attribute(&logo.data_url())
            ),
        };

        format!(
            r#"<div class="page-footer">{logo}
    <div class="footer-text">{text}</div>
    <div class="footer-page"><span class="pageNumber"></span></div>
</div>"#,
            logo = logo,
            text = html_escape::encode_text(self.text()),
        )
    }
}

/// Build the footer for a document, embedding its logo when one can be read.
pub fn build(config: &DocumentConfig) -> Footer {
    let text = config.footer_text.clone();

    let path = match &config.footer_logo {
        Some(path) if path.is_file() => path,
        _ => return Footer::TextOnly { text },
    };

    match InlineImage::load(path) {
        Ok(logo) => Footer::WithLogo { text, logo },
        Err(e) => {
            log::warn!(
                "Footer logo {} could not be read, using a text-only footer: {e}",
                path.display()
            );
            Footer::TextOnly { text }
        }
    }
}
