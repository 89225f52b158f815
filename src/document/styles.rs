//! CSS generation for printed documents.
//!
//! The stylesheet is assembled from a few fixed blocks:
//!
//! - page box and base typography for the converted markdown body
//! - cover page classes (the cover always ends with a forced page break)
//! - print-only footer classes, pinned to the bottom of every page
//!
//! plus an optional watermark rule on `body`. The watermark rule only depends on
//! whether a watermark was configured; the path is never checked here, so a
//! missing file simply renders without a background.

use std::path::Path;

/// Generate the complete stylesheet for one document.
pub fn build_stylesheet(watermark: Option<&Path>) -> String {
    let mut css = String::with_capacity(4096);

    css.push_str(PAGE_STYLES);
    css.push_str(&body_rule(watermark));
    css.push_str(CONTENT_STYLES);

    css.push_str("\n/* Cover page */\n");
    css.push_str(COVER_STYLES);

    css.push_str("\n/* Footer */\n");
    css.push_str(FOOTER_STYLES);

    css
}

fn body_rule(watermark: Option<&Path>) -> String {
    let background = match watermark {
        Some(path) => watermark_rule(path),
        None => String::new(),
    };

    format!(
        r#"
body {{
    font-family: 'Georgia', 'Times New Roman', serif;
    font-size: 11pt;
    line-height: 1.6;
    color: #1a1a1a;
    max-width: 100%;{background}
}}
"#
    )
}

fn watermark_rule(path: &Path) -> String {
    format!(
        r#"
    background-image: url('{}');
    background-repeat: no-repeat;
    background-position: center center;
    background-size: 60%;
    background-attachment: fixed;"#,
        file_url(path)
    )
}

/// `file://` URL for an absolute path.
///
/// Every byte outside the unreserved set and `/` is percent-encoded, so quotes,
/// parentheses and spaces in the path cannot end the CSS `url('...')` token.
/// Relative paths are not made absolute here; `DocumentSet::load` resolves them.
fn file_url(path: &Path) -> String {
    let path = path.to_string_lossy();
    let mut url = String::with_capacity(path.len() + 7);
    url.push_str("file://");
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                url.push(byte as char)
            }
            _ => url.push_str(&format!("%{byte:02X}")),
        }
    }
    url
}

const PAGE_STYLES: &str = r#"/* Page */
@page {
    size: Letter;
    margin: 1in 0.75in;
}
"#;

const CONTENT_STYLES: &str = r#"
h1 {
    font-size: 24pt;
    font-weight: 700;
    margin-top: 24pt;
    margin-bottom: 12pt;
    color: #0a0a0a;
    page-break-after: avoid;
}

h2 {
    font-size: 18pt;
    font-weight: 600;
    margin-top: 20pt;
    margin-bottom: 10pt;
    color: #1a1a1a;
    page-break-after: avoid;
    border-bottom: 1px solid #e0e0e0;
    padding-bottom: 6pt;
}

h3 {
    font-size: 14pt;
    font-weight: 600;
    margin-top: 16pt;
    margin-bottom: 8pt;
    color: #2a2a2a;
    page-break-after: avoid;
}

p {
    margin-bottom: 10pt;
    text-align: justify;
}

ul, ol {
    margin-bottom: 10pt;
    padding-left: 24pt;
}

li {
    margin-bottom: 6pt;
}

blockquote {
    margin: 16pt 0;
    padding: 12pt 20pt;
    background: #f8f8f8;
    border-left: 4pt solid #16c79a;
    font-style: italic;
    page-break-inside: avoid;
}

code {
    font-family: 'Consolas', 'Monaco', monospace;
    font-size: 9pt;
    background: #f5f5f5;
    padding: 2pt 4pt;
    border-radius: 2pt;
}

pre {
    background: #f8f8f8;
    padding: 12pt;
    border-radius: 4pt;
    overflow-x: auto;
    page-break-inside: avoid;
}

table {
    width: 100%;
    border-collapse: collapse;
    margin: 16pt 0;
    page-break-inside: avoid;
}

th, td {
    border: 1pt solid #d0d0d0;
    padding: 8pt;
    text-align: left;
}

th {
    background: #f0f0f0;
    font-weight: 600;
}

hr {
    border: none;
    border-top: 1pt solid #d0d0d0;
    margin: 20pt 0;
}
"#;

const COVER_STYLES: &str = r#".cover-page {
    display: flex;
    flex-direction: column;
    justify-content: center;
    align-items: center;
    height: 100vh;
    text-align: center;
    page-break-after: always;
}

.cover-title {
    font-size: 36pt;
    font-weight: 700;
    margin-bottom: 16pt;
    color: #0a0a0a;
}

.cover-subtitle {
    font-size: 18pt;
    font-weight: 400;
    margin-bottom: 32pt;
    color: #4a4a4a;
}

.cover-line {
    font-size: 14pt;
    font-weight: 600;
    margin-top: 48pt;
    color: #16c79a;
    padding: 12pt 24pt;
    border: 2pt solid #16c79a;
    border-radius: 4pt;
}

.cover-meta {
    font-size: 11pt;
    color: #6a6a6a;
    margin-top: 64pt;
}
"#;

const FOOTER_STYLES: &str = r#"@media print {
    .page-footer {
        position: fixed;
        bottom: 0;
        left: 0;
        right: 0;
        height: 40pt;
        display: flex;
        align-items: center;
        justify-content: space-between;
        padding: 0 0.75in;
        border-top: 1pt solid #e0e0e0;
        font-size: 9pt;
        color: #6a6a6a;
    }

    .footer-logo {
        height: 20pt;
        opacity: 0.7;
    }

    .footer-text {
        flex: 1;
        text-align: center;
    }

    .footer-page {
        text-align: right;
    }
}
"#;
