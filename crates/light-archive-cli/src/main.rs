//! Light Archive CLI
//!
//! Command-line client for the Light Archive MCP server's HTTP transport.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "light-archive")]
#[command(about = "CLI tool for the Light Archive knowledge base")]
#[command(version)]
struct Cli {
    /// MCP server URL (http transport)
    #[arg(
        long,
        env = "LIGHT_ARCHIVE_SERVER_URL",
        default_value = "http://localhost:8081"
    )]
    server_url: String,

    /// Output format
    #[arg(long, short, default_value = "markdown")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

impl OutputFormat {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Json => "json",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Search published archives
    Search {
        /// Text to search for
        query: String,

        /// Filter by category (기술, 프로젝트, 리서치, 뉴스)
        #[arg(long, short)]
        category: Option<String>,

        /// Maximum results
        #[arg(long, short = 'n', default_value = "20")]
        limit: u64,

        /// Results to skip
        #[arg(long, default_value = "0")]
        offset: u64,
    },

    /// Show one archive
    Get {
        /// Archive ID
        id: String,
    },

    /// List archives
    List {
        /// Filter by category
        #[arg(long, short)]
        category: Option<String>,

        /// Filter by status (draft, published, archived)
        #[arg(long, short)]
        status: Option<String>,

        /// Maximum results
        #[arg(long, short = 'n', default_value = "20")]
        limit: u64,

        /// Results to skip
        #[arg(long, default_value = "0")]
        offset: u64,
    },

    /// Find archives related to one archive
    Related {
        /// Reference archive ID
        id: String,

        /// Maximum results
        #[arg(long, short = 'n', default_value = "4")]
        limit: u64,
    },

    /// Upload an image file and print its public URL
    UploadImage {
        /// Path to the image, as seen by the server
        path: String,

        /// File name without extension
        #[arg(long)]
        filename: Option<String>,
    },

    /// List the tools the server offers
    Tools,

    /// Show server status
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tools => commands::tools::handle(&cli.server_url, cli.format).await?,
        Commands::Status => commands::status::handle(&cli.server_url, cli.format).await?,
        command => commands::archives::handle(&cli.server_url, command, cli.format).await?,
    }

    Ok(())
}
