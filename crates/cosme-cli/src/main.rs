mod collect;
mod report;

use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cosme-cli")]
#[command(about = "Collect and analyze @cosme product reviews")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape a product's review listing, export it, and print a summary
    Collect {
        /// Review-listing URL, or a product page URL
        #[arg(long)]
        url: String,

        /// Number of listing pages to fetch (defaults to COSME_DEFAULT_MAX_PAGES)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=10), conflicts_with = "all")]
        pages: Option<u32>,

        /// Fetch until the listing runs out of reviews
        #[arg(long)]
        all: bool,

        /// Layout name; detected from the first page when omitted.
        /// Layouts marked [rendered] by `layouts` are only fetched through the
        /// headless browser when named here
        #[arg(long)]
        layout: Option<String>,

        /// Output file (defaults to cosme_reviews.csv or cosme_reviews.json)
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,

        /// Pause before each detail-page fetch (defaults to COSME_SCRAPER_DETAIL_DELAY_MS)
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Skip the printed analysis summary
        #[arg(long)]
        no_summary: bool,
    },
    /// List the built-in and configured layouts in detection order
    Layouts,
    /// Normalize one reviewer profile string and print the result
    Normalize {
        profile: String,

        #[arg(long, value_enum, default_value_t = ProfileFormatArg::Pattern)]
        format: ProfileFormatArg,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

impl From<OutputFormat> for cosme_analysis::ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Csv => Self::Csv,
            OutputFormat::Json => Self::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProfileFormatArg {
    /// Search the whole string for each attribute
    Pattern,
    /// Positional fields separated by `・`
    MiddleDot,
    /// Positional fields separated by whitespace
    Whitespace,
}

impl From<ProfileFormatArg> for cosme_core::ProfileFormat {
    fn from(format: ProfileFormatArg) -> Self {
        use cosme_core::Separator;
        match format {
            ProfileFormatArg::Pattern => Self::PatternCapture,
            ProfileFormatArg::MiddleDot => Self::DelimiterSplit {
                separator: Separator::MiddleDot,
            },
            ProfileFormatArg::Whitespace => Self::DelimiterSplit {
                separator: Separator::Whitespace,
            },
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cosme_core::load_app_config().context("failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Collect {
            url,
            pages,
            all,
            layout,
            output,
            format,
            delay_ms,
            no_summary,
        }) => {
            let page_limit = if all {
                None
            } else {
                Some(pages.unwrap_or(config.default_max_pages))
            };
            let request = collect::CollectRequest {
                url,
                page_limit,
                layout,
                output: output.unwrap_or_else(|| default_output(format)),
                format: format.into(),
                detail_delay_ms: delay_ms.unwrap_or(config.scraper_detail_delay_ms),
                summary: !no_summary,
            };
            collect::run_collect(&config, request).await?;
        }
        Some(Commands::Layouts) => collect::print_layouts(&config)?,
        Some(Commands::Normalize { profile, format }) => {
            let normalized = cosme_scraper::normalize_profile(&profile, format.into());
            println!("age_bracket: {}", normalized.age_bracket);
            println!("gender:      {}", normalized.gender);
            println!("skin_type:   {}", normalized.skin_type);
        }
        None => Cli::command().print_help()?,
    }

    Ok(())
}

fn default_output(format: OutputFormat) -> PathBuf {
    match format {
        OutputFormat::Csv => PathBuf::from("cosme_reviews.csv"),
        OutputFormat::Json => PathBuf::from("cosme_reviews.json"),
    }
}
