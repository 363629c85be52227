mod commands;

use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "rivalwatch-cli")]
#[command(about = "Competitor news feed command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the article feed, narrowed locally from one coarse fetch
    Feed {
        /// Time window in hours
        #[arg(long, default_value = "24")]
        hours: i32,
        /// Competitor tag to keep (repeatable)
        #[arg(long = "competitor")]
        competitors: Vec<String>,
        /// Source to keep (repeatable)
        #[arg(long = "source")]
        sources: Vec<String>,
    },
    /// List saved articles
    Saved,
    /// Save an article by id
    Save { article_id: Uuid },
    /// Remove an article from the saved list by id
    Unsave { article_id: Uuid },
    /// Show recent scrape runs
    Runs {
        /// Maximum number of runs to show
        #[arg(long, default_value = "10")]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("rivalwatch-cli: pass a command, or --help for the list");
        return Ok(());
    };

    let pool = rivalwatch_db::connect_pool_from_env().await?;

    match command {
        Commands::Feed {
            hours,
            competitors,
            sources,
        } => commands::run_feed(&pool, hours, competitors, sources).await,
        Commands::Saved => commands::run_saved(&pool).await,
        Commands::Save { article_id } => commands::run_save(&pool, article_id).await,
        Commands::Unsave { article_id } => commands::run_unsave(&pool, article_id).await,
        Commands::Runs { limit } => commands::run_runs(&pool, limit).await,
    }
}
