mod discover;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use scout_core::{LookalikeKind, Platform};
use scout_store::{JobStatusStore, RedisStore};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "scout-cli")]
#[command(about = "Creator discovery command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one discovery job in the foreground and print its summary.
    Discover(DiscoverArgs),
    /// Print the stored status record of a job.
    Status { job_id: String },
}

#[derive(Debug, Args)]
struct DiscoverArgs {
    /// JSON file with a full filter object; flags below override its fields.
    #[arg(long, value_name = "PATH")]
    filters: Option<PathBuf>,
    #[arg(long)]
    platform: Option<Platform>,
    #[arg(long)]
    max_results: Option<u32>,
    #[arg(long)]
    min_followers: Option<u64>,
    #[arg(long)]
    max_followers: Option<u64>,
    #[arg(long, value_enum)]
    lookalike_type: Option<LookalikeArg>,
    #[arg(long)]
    lookalike_username: Option<String>,
    /// Creator interest; repeatable.
    #[arg(long = "interest")]
    interests: Vec<String>,
    /// Hashtag without the leading `#`; repeatable.
    #[arg(long = "hashtag")]
    hashtags: Vec<String>,
    #[arg(long)]
    bio_phrase: Option<String>,
    /// Reuse a job id instead of generating one.
    #[arg(long)]
    job_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LookalikeArg {
    Creator,
    Audience,
}

impl From<LookalikeArg> for LookalikeKind {
    fn from(arg: LookalikeArg) -> Self {
        match arg {
            LookalikeArg::Creator => LookalikeKind::Creator,
            LookalikeArg::Audience => LookalikeKind::Audience,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = scout_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let store = JobStatusStore::new(Arc::new(RedisStore::connect(&config.redis_url).await?));

    match cli.command {
        Commands::Discover(args) => discover::run_discover(&config, store, args).await,
        Commands::Status { job_id } => discover::run_status(&store, &job_id).await,
    }
}

#[cfg(test)]
mod tests;
