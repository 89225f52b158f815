use clap::Parser;
use paper_press::config::DEFAULT_CONFIG_FILE;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    /// Batch configuration file
    #[clap(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Only render documents whose name matches this glob (repeatable)
    #[clap(long, value_name = "GLOB")]
    pub only: Vec<String>,

    /// Chrome or Chromium executable to print with (searched on PATH if unset)
    #[clap(long, env = "CHROME", value_name = "PATH")]
    pub chrome: Option<PathBuf>,

    /// Give up on a document if printing takes longer than this many seconds
    #[clap(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Run the browser without its sandbox (needed when running as root)
    #[clap(long)]
    pub no_sandbox: bool,

    /// Also write the assembled HTML next to each PDF
    #[clap(long)]
    pub keep_html: bool,
}
