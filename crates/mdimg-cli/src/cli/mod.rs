//! CLI for mdimg.

mod commands;

use anyhow::Result;
use clap::Parser;
use mdimg_core::config;

use commands::run_localize;

/// Download the remote images a Markdown document references and point it at local copies.
#[derive(Debug, Parser)]
#[command(name = "mdimg")]
#[command(
    about = "Download remote images referenced by a Markdown document into assets/<name>/ and rewrite the links",
    long_about = None
)]
pub struct Cli {
    /// Markdown document to process.
    pub document: String,

    /// Do not rename the document to a slug of its file name first.
    #[arg(long)]
    pub keep_name: bool,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_default();
        tracing::debug!("loaded config: {:?}", cfg);

        let cwd = std::env::current_dir()?;
        run_localize(&cli.document, &cwd, !cli.keep_name, &cfg)
    }
}

#[cfg(test)]
mod tests;
