//! concurso-radar CLI
//!
//! Local entry point: refresh the listing cache, query it with filters, or
//! resolve a listing's deep links.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use concurso_radar::{
    cache::CacheManager,
    error::Result,
    models::{Config, EducationLevel, FilterCriteria, NationwidePolicy},
    pipeline::{self, RecordBuilder},
    services::{DeepLinkResolver, HttpListingSource, LinkKind},
    storage::SnapshotStore,
};

/// concurso-radar - Concursos Listing Radar
#[derive(Parser, Debug)]
#[command(
    name = "concurso-radar",
    version,
    about = "Scrapes, caches and filters public concursos listings"
)]
struct Cli {
    /// Path to storage directory containing config and cache files
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Refresh the listing cache from the upstream aggregator
    Fetch {
        /// Refetch even if the cached snapshot is still fresh
        #[arg(long)]
        force: bool,
    },

    /// Query the cached listings with filters
    Query {
        /// Minimum salary, lenient format ("2500", "R$ 2.500,00")
        #[arg(long)]
        min_salary: Option<String>,

        /// Comma-separated keywords, at least one must match
        #[arg(long)]
        keyword: Option<String>,

        /// Comma-separated keywords that reject a listing
        #[arg(long)]
        exclude: Option<String>,

        /// UF code to accept (repeatable)
        #[arg(long)]
        uf: Vec<String>,

        /// Macro-region group to accept: Norte, Nordeste, Centro-Oeste,
        /// Sudeste, Sul or Nacional (repeatable)
        #[arg(long)]
        region: Vec<String>,

        /// Education level to accept: fundamental, medio, superior (repeatable)
        #[arg(long)]
        education: Vec<String>,

        /// Nationwide listings pass a region filter only if explicitly selected
        #[arg(long)]
        nationwide_explicit: bool,

        /// Force a cache refresh before querying
        #[arg(long)]
        refresh: bool,
    },

    /// Resolve the deep link behind a listing's source page
    Resolve {
        /// Listing source URL
        url: String,

        /// Link kind: edital or inscricao
        #[arg(long, default_value = "edital")]
        kind: String,
    },

    /// Show current snapshot info
    Info,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn build_manager(config: &Config, storage_dir: &Path) -> Result<CacheManager> {
    let source = HttpListingSource::new(&config.fetcher)?;
    let builder = RecordBuilder::new(&config.extraction)?;
    let store = SnapshotStore::new(storage_dir);
    Ok(CacheManager::new(Box::new(source), builder, store, &config.cache))
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.storage_dir.join("config.toml");
    let config = Config::load_or_default(&config_path);

    match cli.command {
        Command::Fetch { force } => {
            let manager = build_manager(&config, &cli.storage_dir)?;
            let snapshot = manager.get_records(force).await;
            log::info!(
                "Cache holds {} records (fetched_at {})",
                snapshot.records.len(),
                snapshot.fetched_at
            );
        }

        Command::Query {
            min_salary,
            keyword,
            exclude,
            uf,
            region,
            education,
            nationwide_explicit,
            refresh,
        } => {
            let mut criteria = FilterCriteria::new();
            if let Some(raw) = min_salary {
                criteria.min_salary = FilterCriteria::parse_money(&raw);
            }
            if let Some(raw) = keyword {
                criteria.include_keywords = FilterCriteria::split_terms(&raw);
            }
            if let Some(raw) = exclude {
                criteria.exclude_keywords = FilterCriteria::split_terms(&raw);
            }
            criteria
                .target_regions
                .extend(uf.iter().map(|u| u.to_uppercase()));
            for group in &region {
                criteria.add_region_group(group);
            }
            for name in &education {
                match EducationLevel::parse(name) {
                    Some(level) => {
                        criteria.target_education_levels.insert(level);
                    }
                    None => log::warn!("Unknown education level '{name}', ignoring"),
                }
            }
            if nationwide_explicit {
                criteria.nationwide_policy = NationwidePolicy::ExplicitOnly;
            }

            let manager = build_manager(&config, &cli.storage_dir)?;
            let snapshot = manager.get_records(refresh).await;
            let results = pipeline::filter(&snapshot.records, &criteria);

            log::info!(
                "{} of {} records match",
                results.len(),
                snapshot.records.len()
            );
            for record in &results {
                println!(
                    "{} | {} | até {} | {}\n    {}",
                    record.salary, record.region, record.deadline, record.text, record.link
                );
            }
        }

        Command::Resolve { url, kind } => {
            let kind = LinkKind::parse(&kind).ok_or_else(|| {
                concurso_radar::error::AppError::config(format!("Unknown link kind '{kind}'"))
            })?;

            let resolver = DeepLinkResolver::new(&config.fetcher, &config.links)?;
            let resolved = resolver.resolve_final_link(&url, kind).await;
            println!("{resolved}");
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());

            let snapshot_path = cli.storage_dir.join(&config.cache.snapshot_file);
            if !snapshot_path.exists() {
                log::info!("No snapshot found yet.");
                return Ok(());
            }

            let content = std::fs::read_to_string(&snapshot_path)?;
            match serde_json::from_str::<concurso_radar::cache::CacheSnapshot>(&content) {
                Ok(snapshot) => {
                    let age = chrono::Utc::now().timestamp() - snapshot.fetched_at;
                    log::info!("Snapshot: {} records, {age}s old", snapshot.records.len());
                }
                Err(e) => log::warn!("Snapshot exists but is unreadable: {e}"),
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            config.validate()?;
            log::info!("Config OK");
        }
    }

    Ok(())
}
