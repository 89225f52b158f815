use anyhow::{Context, Result};
use cli::Cli;
use paper_press::config::DocumentSet;
use paper_press::{batch, markdown, render, report};
use std::process::ExitCode;
use std::time::Duration;

mod cli;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match try_main() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {e:#}", console::style("Error").red());
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<ExitCode> {
    use clap::Parser;
    let cli = Cli::parse();

    let documents = DocumentSet::load(&cli.config)
        .with_context(|| "Failed to load document configuration")?
        .select(&cli.only)?;
    if documents.is_empty() {
        log::warn!("no documents configured in {}", cli.config.display());
    }
    log::info!(
        "loaded {} document(s) from {}",
        documents.len(),
        cli.config.display()
    );

    let chrome = render::Chrome::discover(cli.chrome.clone())
        .with_context(|| "Failed to find a print engine")?
        .with_timeout(cli.timeout.map(Duration::from_secs))
        .with_sandbox(!cli.no_sandbox);
    log::info!("printing with {}", chrome.executable().display());

    let converter = markdown::Markdown;
    let pipeline = batch::Pipeline::new(&converter, &chrome).keep_html(cli.keep_html);
    let mut reporter = report::ConsoleReporter::new();

    let summary = batch::run(&documents, &pipeline, &mut reporter);
    Ok(summary.exit_code())
}
