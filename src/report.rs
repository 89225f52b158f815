//! Console progress reporting for batch runs.

use crate::batch::{BatchSummary, Outcome, Reporter};
use crate::config::DocumentConfig;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

const RULE: &str = "==================================";

/// Prints per-document progress lines above a progress bar.
#[derive(Default)]
pub struct ConsoleReporter {
    progress: Option<ProgressBar>,
}

impl ConsoleReporter {
    pub fn new() -> ConsoleReporter {
        ConsoleReporter::default()
    }

    /// Print with the progress bar moved out of the way.
    fn print(&self, line: String) {
        match &self.progress {
            Some(progress) => progress.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn batch_started(&mut self, total: usize) {
        println!("{}", style("paper-press").bold());
        println!("{RULE}");

        let progress = ProgressBar::new(total as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("can parse progress style")
                .progress_chars("#>-"),
        );
        progress.set_message("Rendering PDFs...");
        self.progress = Some(progress);
    }

    fn document_started(&mut self, config: &DocumentConfig) {
        self.print(format!(
            "\n{} {}\n   Input:  {}\n   Output: {}",
            style("Generating").cyan().bold(),
            config.name,
            config.input.display(),
            config.output.display()
        ));
        if let Some(progress) = &self.progress {
            progress.set_message(config.name.clone());
        }
    }

    fn document_finished(
        &mut self,
        config: &DocumentConfig,
        outcome: &Outcome,
        tally: &BatchSummary,
    ) {
        self.print(outcome_line(config, outcome));
        self.print(format!("   {}", tally_line(tally)));
        if let Some(progress) = &self.progress {
            progress.inc(1);
        }
    }

    fn batch_finished(&mut self, summary: &BatchSummary) {
        if let Some(progress) = self.progress.take() {
            progress.finish_and_clear();
        }

        println!("\n{RULE}");
        println!(
            "{} {}",
            style("Succeeded:").green(),
            summary.succeeded
        );
        println!("{} {}", style("Failed:   ").red(), summary.failed);
        println!("Processed: {}", summary.processed());
        println!("{RULE}");
    }
}

/// One line describing how a document turned out.
fn outcome_line(config: &DocumentConfig, outcome: &Outcome) -> String {
    match outcome {
        Outcome::Succeeded {
            output,
            bytes,
            elapsed,
        } => {
            let size = match bytes {
                Some(bytes) => format!("{}, ", human_size(*bytes)),
                None => String::new(),
            };
            format!(
                "   {} PDF generated at {} ({size}{:.1?})",
                style("ok").green().bold(),
                output.display(),
                elapsed
            )
        }
        Outcome::Failed(e) => format!(
            "   {} {}: {e}",
            style("failed").red().bold(),
            config.name
        ),
    }
}

fn tally_line(tally: &BatchSummary) -> String {
    format!(
        "Running total: {} succeeded, {} failed",
        tally.succeeded, tally.failed
    )
}

fn human_size(bytes: u64) -> String {
    byte_unit::Byte::from_u64(bytes)
        .get_appropriate_unit(byte_unit::UnitType::Binary)
        .to_string()
}
