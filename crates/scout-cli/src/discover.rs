//! Command handlers for `discover` and `status`.

use anyhow::Context;
use scout_core::{AppConfig, FilterSpec, FollowerRange, Hashtag};
use scout_discovery::DiscoveryOrchestrator;
use scout_store::JobStatusStore;

use crate::DiscoverArgs;

/// Merges the optional filter file with the command-line flags. Flags win.
///
/// # Errors
///
/// Returns an error if the filter file cannot be read or parsed.
pub(crate) fn build_filters(args: &DiscoverArgs) -> anyhow::Result<FilterSpec> {
    let mut filters = match &args.filters {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading filter file {}", path.display()))?;
            serde_json::from_str::<FilterSpec>(&raw)
                .with_context(|| format!("parsing filter file {}", path.display()))?
        }
        None => FilterSpec::default(),
    };

    if let Some(platform) = args.platform {
        filters.platform = platform;
    }
    if args.max_results.is_some() {
        filters.max_results = args.max_results;
    }
    if args.min_followers.is_some() || args.max_followers.is_some() {
        let current = filters.follower_count.unwrap_or_default();
        filters.follower_count = Some(FollowerRange {
            min: args.min_followers.or(current.min),
            max: args.max_followers.or(current.max),
        });
    }
    if let Some(kind) = args.lookalike_type {
        filters.lookalike_type = Some(kind.into());
    }
    if args.lookalike_username.is_some() {
        filters.lookalike_username.clone_from(&args.lookalike_username);
    }
    if !args.interests.is_empty() {
        filters.creator_interests.clone_from(&args.interests);
    }
    if !args.hashtags.is_empty() {
        filters.hashtags = args
            .hashtags
            .iter()
            .map(|h| Hashtag {
                name: h.trim_start_matches('#').to_string(),
            })
            .collect();
    }
    if args.bio_phrase.is_some() {
        filters.bio_phrase.clone_from(&args.bio_phrase);
    }

    Ok(filters)
}

pub(crate) async fn run_discover(
    config: &AppConfig,
    store: JobStatusStore,
    args: DiscoverArgs,
) -> anyhow::Result<()> {
    let filters = build_filters(&args)?;
    filters.validate()?;

    let orchestrator = DiscoveryOrchestrator::from_config(config, store)?;
    let summary = orchestrator.discover(filters, args.job_id).await?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

pub(crate) async fn run_status(store: &JobStatusStore, job_id: &str) -> anyhow::Result<()> {
    match store.get(job_id).await? {
        Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
        None => anyhow::bail!("discovery job {job_id} not found or expired"),
    }
    Ok(())
}
