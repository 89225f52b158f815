//! Cover page rendering.
//!
//! The cover carries the title, subtitle, an optional badge line and a small
//! metadata block. The publication date is taken when the cover is built, so
//! every document in a batch gets its own timestamp.

use crate::config::DocumentConfig;
use chrono::{Local, NaiveDate};

const VERSION_LABEL: &str = "Version 1.0.0";
const STATUS_LABEL: &str = "Status: Canonical";

/// Render the cover section, dated today.
pub fn render(config: &DocumentConfig) -> String {
    render_dated(config, Local::now().date_naive())
}

/// Render the cover section with an explicit publication date.
pub fn render_dated(config: &DocumentConfig, date: NaiveDate) -> String {
    let badge = match &config.cover_line {
        Some(line) => format!(
            "\n    <div class=\"cover-line\">{}</div>",
            html_escape::encode_text(line)
        ),
        None => String::new(),
    };

    format!(
        r#"<div class="cover-page">
    <div class="cover-title">{title}</div>
    <div class="cover-subtitle">{subtitle}</div>{badge}
    <div class="cover-meta">
        {version}<br/>
        Published: {date}<br/>
        {status}
    </div>
</div>"#,
        title = html_escape::encode_text(&config.title),
        subtitle = html_escape::encode_text(&config.subtitle),
        badge = badge,
        version = VERSION_LABEL,
        date = long_date(date),
        status = STATUS_LABEL,
    )
}

/// Format a date the long way, e.g. `October 18, 2026`.
fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}
