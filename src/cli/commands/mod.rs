//! CLI parser and dispatch to command-specific modules.

mod address;
mod scrape;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "farmacie")]
#[command(about = "Extract the Italian pharmacy directory into CSV or JSON")]
#[command(version)]
pub struct Cli {
    /// Config file path (default: <config dir>/farmacie/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Search the directory and save every listed pharmacy
    Scrape {
        /// Region label as shown in the search form (e.g. "LAZIO")
        #[arg(short, long)]
        region: String,
        /// Province label (e.g. "ROMA")
        #[arg(short, long)]
        province: String,
        /// Municipality label (default: all municipalities)
        #[arg(short, long)]
        municipality: Option<String>,
        /// Show the browser window
        #[arg(long)]
        head: bool,
        /// Output file (default: generated name in the output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: OutputFormat,
        /// Click attempts before a page counts as stuck
        #[arg(long)]
        max_retries: Option<u32>,
        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// Add a formatted full-address column to a CSV export
    Address {
        /// CSV file written by `scrape`
        input: PathBuf,
        /// Output file (default: <input>_full_address.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Country appended to every address
        #[arg(long)]
        country: Option<String>,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Scrape {
            region,
            province,
            municipality,
            head,
            output,
            format,
            max_retries,
            max_pages,
        } => {
            if head {
                config.browser.headless = false;
            }
            if let Some(retries) = max_retries {
                config.pagination.max_retries = retries;
            }
            if max_pages.is_some() {
                config.pagination.max_pages = max_pages;
            }
            config.validate()?;

            let args = scrape::ScrapeArgs {
                region,
                province,
                municipality,
                output,
                format,
            };
            scrape::cmd_scrape(&config, args).await
        }
        Commands::Address {
            input,
            output,
            country,
        } => {
            if let Some(country) = country {
                config.output.country = country;
            }
            address::cmd_address(&config, &input, output.as_deref()).await
        }
    }
}
