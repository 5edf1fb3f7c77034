//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use tracing::info;

use websift_core::sink::{DocumentSink, WriterSink};
use websift_shared::{AppConfig, HarvestConfig, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// websift — harvest deduplicated Markdown from a website.
#[derive(Parser)]
#[command(
    name = "websift",
    version,
    about = "Crawl a site, convert pages to Markdown, and stream deduplicated text.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json. Logs go to stderr; stdout
    /// carries the document stream.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v echoes visited URLs, -vv traces decisions).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Crawl from a start URL and stream deduplicated documents.
    Harvest {
        /// The URL the crawl starts from.
        url: String,

        /// Allow pattern (regex over the absolute URL); repeatable.
        /// Default: same subtree as the start URL.
        #[arg(short, long = "allow")]
        allow: Vec<String>,

        /// Deny pattern (regex over the absolute URL); repeatable.
        /// A deny match overrides any allow match.
        #[arg(short, long = "deny")]
        deny: Vec<String>,

        /// Permitted response extension; repeatable. Pass "" for
        /// extensionless paths. Default: "", .html, .md, .txt, .rst.
        #[arg(short, long = "ext")]
        ext: Vec<String>,

        /// Maximum crawl depth (links on the start page are depth 1).
        #[arg(long)]
        depth: Option<u32>,

        /// Crawl one page at a time for deterministic, diffable output.
        #[arg(long)]
        sync: bool,

        /// Maximum concurrent requests.
        #[arg(long)]
        concurrency: Option<u32>,

        /// Maximum response body size in bytes; larger bodies are skipped.
        #[arg(long)]
        max_body_size: Option<usize>,

        /// Write the document stream to a file instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Diagnostics always go to stderr
/// so the stdout document stream stays clean.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "websift=info",
        1 => "websift=debug",
        _ => "websift=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Harvest {
            url,
            allow,
            deny,
            ext,
            depth,
            sync,
            concurrency,
            max_body_size,
            out,
        } => {
            cmd_harvest(
                &url,
                allow,
                deny,
                ext,
                depth,
                sync,
                concurrency,
                max_body_size,
                out.as_deref(),
            )
            .await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
async fn cmd_harvest(
    url: &str,
    allow: Vec<String>,
    deny: Vec<String>,
    ext: Vec<String>,
    depth: Option<u32>,
    sync: bool,
    concurrency: Option<u32>,
    max_body_size: Option<usize>,
    out: Option<&std::path::Path>,
) -> Result<()> {
    let app_config = load_config()?;

    // CLI flags override config file values, which override defaults.
    let mut config = HarvestConfig::new(url, &app_config)?;
    if !allow.is_empty() {
        config.allow_patterns = allow;
    }
    if !deny.is_empty() {
        config.deny_patterns = deny;
    }
    if !ext.is_empty() {
        config.extensions = ext;
    }
    if depth.is_some() {
        config.max_depth = depth;
    }
    if sync {
        config.synchronous = true;
    }
    if let Some(n) = concurrency {
        config.concurrency = n.max(1);
    }
    if let Some(n) = max_body_size {
        config.max_body_size = n;
    }

    info!(
        url,
        synchronous = config.synchronous,
        depth = ?config.max_depth,
        "starting harvest"
    );

    let sink: Arc<dyn DocumentSink> = match out {
        Some(path) => {
            let file = std::fs::File::create(path)
                .map_err(|e| eyre!("cannot create output file '{}': {e}", path.display()))?;
            Arc::new(WriterSink::new(file))
        }
        None => Arc::new(WriterSink::new(std::io::stdout())),
    };

    let summary = websift_core::harvest(&config, sink).await?;

    // Summary goes to stderr; stdout belongs to the document stream.
    eprintln!();
    eprintln!("  Harvest complete.");
    eprintln!("  Pages fetched:     {}", summary.pages_fetched);
    eprintln!("  Documents emitted: {}", summary.documents_emitted);
    eprintln!("  Pages suppressed:  {}", summary.pages_suppressed);
    eprintln!("  Unique paragraphs: {}", summary.unique_paragraphs);
    eprintln!("  Errors:            {}", summary.errors.len());
    eprintln!("  Time:              {:.1}s", summary.duration.as_secs_f64());
    eprintln!();

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
