//! Assets command - query and refresh the asset library cache

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use tailor_library::{AssetCatalog, AssetRecord, AssetType, DefaultCacheDir};

use crate::config::Config;

/// Asset cache subcommands
#[derive(Subcommand, Debug)]
pub enum AssetsCommand {
    /// Report whether the cache matches the libraries on disk
    Stale,

    /// Rescan every library and rewrite the cache
    Rebuild,

    /// List cached assets (rebuilding first if stale)
    List(ListArgs),

    /// Pick one matching asset at random
    Sample(SampleArgs),
}

/// Arguments for `assets list`
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only assets of this type (actions, collections, materials, node_groups, objects, worlds)
    #[arg(short = 't', long = "type")]
    pub asset_type: Option<AssetType>,

    /// Only assets carrying this tag (repeatable; all must match)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Print records as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `assets sample`
#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Asset type to pick from
    #[arg(short = 't', long = "type")]
    pub asset_type: AssetType,

    /// Required tag (repeatable; all must match)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Seed for a reproducible pick
    #[arg(long)]
    pub seed: Option<u64>,

    /// Re-open the source archive to confirm the asset still exists
    #[arg(long)]
    pub verify: bool,
}

/// Execute an assets subcommand
pub fn execute(command: AssetsCommand, config: &Config) -> Result<()> {
    let catalog = AssetCatalog::from_config(&config.catalog, &DefaultCacheDir)
        .context("Failed to open asset catalog")?;
    if catalog.libraries().is_empty() {
        tracing::warn!("No asset libraries configured; add [[catalog.libraries]] to tailor.toml");
    }

    match command {
        AssetsCommand::Stale => stale(&catalog),
        AssetsCommand::Rebuild => rebuild(&catalog),
        AssetsCommand::List(args) => list(&catalog, args),
        AssetsCommand::Sample(args) => sample(&catalog, args),
    }
}

fn stale(catalog: &AssetCatalog) -> Result<()> {
    let stale = catalog.is_cache_stale()?;
    println!("{}", if stale { "stale" } else { "fresh" });
    if let Some(path) = catalog.cache_path() {
        println!("  Cache: {}", path.display());
    }
    Ok(())
}

fn rebuild(catalog: &AssetCatalog) -> Result<()> {
    let snapshot = catalog.rebuild_cache()?;
    println!(
        "Cached {} assets from {} archives",
        snapshot.assets.len(),
        snapshot.known_source_files.len()
    );
    for asset_type in AssetType::ALL {
        let count = snapshot
            .assets
            .values()
            .filter(|r| r.asset_type == asset_type)
            .count();
        if count > 0 {
            println!("  {:<12} {}", asset_type, count);
        }
    }
    Ok(())
}

fn list(catalog: &AssetCatalog, args: ListArgs) -> Result<()> {
    let records: Vec<AssetRecord> = match args.asset_type {
        Some(asset_type) => catalog.list_assets(asset_type, &args.tags)?,
        None => catalog
            .all_assets()?
            .into_iter()
            .filter(|r| r.has_tags(&args.tags))
            .collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for record in &records {
            println!("{}", record);
        }
        println!("{} assets", records.len());
    }
    Ok(())
}

fn sample(catalog: &AssetCatalog, args: SampleArgs) -> Result<()> {
    let picked = match args.seed {
        Some(seed) => {
            catalog.sample_asset(&mut Pcg64::seed_from_u64(seed), args.asset_type, &args.tags)?
        }
        None => catalog.sample_asset(&mut rand::rng(), args.asset_type, &args.tags)?,
    };

    let Some(record) = picked else {
        anyhow::bail!(
            "No {} assets match tags [{}]",
            args.asset_type,
            args.tags.join(", ")
        );
    };

    if args.verify {
        catalog
            .load_asset(&record)
            .with_context(|| format!("Cached asset {} is out of date", record.id()))?;
    }
    println!("{}", record);
    println!("  Source: {}", record.source_file.display());
    Ok(())
}
