mod logging;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tagsync_config::{Config, ConfigLoad, ConfigLoader};
use tagsync_core::{
    cache::TagCache,
    catalog::{DryRunCatalog, StashClient},
    context::{FailurePolicy, RunOptions},
    reconcile::{Pipeline, RunOutcome},
    source::{FetchOptions, StashBoxClient},
};
use tagsync_model::CanonicalTag;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

#[derive(Parser)]
#[command(
    name = "tagsyncctl",
    version,
    about = "Sync StashDB tags, aliases and tag merges into a local Stash"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create missing tags, merge alias tags and move aliases onto canonical tags
    Sync(SyncArgs),
    /// Fetch the canonical tag list and write the cache file
    Fetch(ConfigArgs),
}

#[derive(Args)]
struct ConfigArgs {
    /// Env file to read before the process environment (default: ./.env if present)
    #[arg(long)]
    env_file: Option<PathBuf>,
    /// Tag cache file, overriding TAGSYNC_CACHE_PATH
    #[arg(long)]
    cache: Option<PathBuf>,
}

#[derive(Args)]
struct SyncArgs {
    #[command(flatten)]
    config: ConfigArgs,
    /// Refetch tags from stash-box even when the cache file exists
    #[arg(long)]
    refresh_cache: bool,
    /// Log catalog writes instead of applying them
    #[arg(long)]
    dry_run: bool,
    /// Do not merge local tags named after a canonical alias
    #[arg(long)]
    skip_merge: bool,
    /// Overwrite local descriptions that differ from StashDB
    #[arg(long)]
    sync_descriptions: bool,
    /// Stop at the first tag that fails instead of continuing
    #[arg(long)]
    strict: bool,
}

impl ConfigArgs {
    /// Load configuration and start logging to the configured file.
    fn load(&self) -> Result<(Config, WorkerGuard)> {
        let mut loader = ConfigLoader::new();
        if let Some(path) = &self.env_file {
            loader = loader.with_env_file(path);
        }
        let ConfigLoad {
            mut config,
            warnings,
        } = loader.load().context("failed to load configuration")?;
        if let Some(cache) = &self.cache {
            config.cache.tags_path = cache.clone();
        }

        let guard = logging::init(config.log_file())?;
        for warning in &warnings.items {
            match &warning.hint {
                Some(hint) => warn!(hint = %hint, "{}", warning.message),
                None => warn!("{}", warning.message),
            }
        }
        if let Some(path) = &config.metadata.env_file {
            info!(path = %path.display(), "loaded env file");
        }
        Ok((config, guard))
    }
}

fn fetch_options(config: &Config) -> FetchOptions {
    FetchOptions {
        per_page: config.fetch.page_size,
        page_delay: config.fetch.page_delay,
    }
}

async fn load_tags(config: &Config, refresh: bool) -> Result<Vec<CanonicalTag>> {
    let source = StashBoxClient::new(
        config.stashbox.endpoint.clone(),
        config.stashbox.api_key.clone(),
    )?;
    let cache = TagCache::new(config.cache_path());
    let options = fetch_options(config);
    let tags = if refresh {
        cache.refresh(&source, &options).await
    } else {
        cache.load_or_fetch(&source, &options).await
    };
    tags.context("failed to retrieve tags from stash-box")
}

async fn sync(args: SyncArgs) -> Result<()> {
    let (config, _guard) = args.config.load()?;
    let tags = load_tags(&config, args.refresh_cache).await?;

    let endpoint = config
        .stash
        .graphql_endpoint()
        .context("invalid Stash GraphQL endpoint")?;
    info!(%endpoint, dry_run = args.dry_run, "syncing tags into Stash");
    let stash = StashClient::new(endpoint, config.stash.api_key.clone())?;

    let options = RunOptions {
        merge_tags: !args.skip_merge,
        sync_descriptions: args.sync_descriptions,
        failure_policy: if args.strict {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Continue
        },
    };

    let outcome = if args.dry_run {
        let catalog = DryRunCatalog::new(stash);
        Pipeline::new(&catalog, options).run(&tags).await
    } else {
        Pipeline::new(&stash, options).run(&tags).await
    }
    .context("sync aborted")?;

    report(&outcome);
    Ok(())
}

fn report(outcome: &RunOutcome) {
    for failure in &outcome.report.failures {
        error!("{failure}");
    }
    if outcome.report.is_clean() {
        info!("sync finished");
    } else {
        warn!(
            failures = outcome.report.failures.len(),
            conflicts = outcome.report.conflicts.len(),
            "sync finished with unresolved items"
        );
    }
}

async fn fetch(args: ConfigArgs) -> Result<()> {
    let (config, _guard) = args.load()?;
    let tags = load_tags(&config, true).await?;
    info!(
        count = tags.len(),
        path = %config.cache_path().display(),
        "cached canonical tags"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Sync(args) => sync(args).await,
        Command::Fetch(args) => fetch(args).await,
    }
}
