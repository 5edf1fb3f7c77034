//! websift CLI — focused web content harvester.
//!
//! Crawls from a start URL within an admission policy, converts HTML to
//! Markdown, drops paragraphs already emitted anywhere in the crawl, and
//! streams the survivors to stdout as named documents.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
