//! Pagemark CLI - inspect how documents paginate and where saved progress lands

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::Viewport;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse and validate jobs argument (must be at least 1)
fn parse_jobs(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("jobs must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

#[derive(Parser)]
#[command(name = "pagemark")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display information about a document
    Info {
        /// Input file path
        input: String,

        #[command(flatten)]
        viewport: Viewport,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List detected chapters and the pages they start on
    Chapters {
        /// Input file path
        input: String,

        #[command(flatten)]
        viewport: Viewport,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the page boundaries of a document
    Paginate {
        /// Input file path
        input: String,

        #[command(flatten)]
        viewport: Viewport,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print one page, or a whole chapter
    Show {
        /// Input file path
        input: String,

        /// Page index (0-based, clamped to the document)
        #[arg(default_value_t = 0)]
        page: usize,

        /// Show the whole chapter with this index instead of a page
        #[arg(short, long)]
        chapter: Option<usize>,

        #[command(flatten)]
        viewport: Viewport,
    },

    /// Show which page a saved progress percentage restores to
    Restore {
        /// Input file path
        input: String,

        /// Saved progress percentage
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=100))]
        percent: u8,

        #[command(flatten)]
        viewport: Viewport,
    },

    /// Paginate every text document in a directory
    Scan {
        /// Input directory
        input_dir: String,

        #[command(flatten)]
        viewport: Viewport,

        /// Number of parallel jobs (must be at least 1)
        #[arg(short, long, default_value = "4", value_parser = parse_jobs)]
        jobs: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "pagemark_cli=debug,pagemark_core=debug"
    } else {
        "pagemark_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Info {
            input,
            viewport,
            json,
        } => commands::info(&input, &viewport, json),

        Commands::Chapters {
            input,
            viewport,
            json,
        } => commands::chapters(&input, &viewport, json),

        Commands::Paginate {
            input,
            viewport,
            json,
        } => commands::paginate(&input, &viewport, json),

        Commands::Show {
            input,
            page,
            chapter,
            viewport,
        } => commands::show(&input, page, chapter, &viewport),

        Commands::Restore {
            input,
            percent,
            viewport,
        } => commands::restore(&input, percent, &viewport),

        Commands::Scan {
            input_dir,
            viewport,
            jobs,
        } => commands::scan(&input_dir, &viewport, jobs),
    }
}
