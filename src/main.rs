use anyhow::Context;
use clap::Parser;
use rental_scout::config::Settings;
use rental_scout::filters::spec::DEFAULT_FILTER_FILE;
use rental_scout::{CityId, FetchOptions, ListingSource, RentFaster};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "rental-scout", about = "Search RentFaster rental listings")]
struct Args {
    /// City to search, e.g. "Calgary" or "red-deer"
    #[arg(long, default_value = "Calgary")]
    city: CityId,

    /// Saved filter to apply (the default filter is used if it does not exist)
    #[arg(long, default_value = DEFAULT_FILTER_FILE)]
    filter: PathBuf,

    /// Where to write the listing table
    #[arg(long, default_value = "listings.json")]
    output: PathBuf,

    /// Write the raw first page JSON here
    #[arg(long)]
    dump: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = Settings::load().context("Failed to load configuration")?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level)),
        )
        .init();

    info!("🏠 Rental Scout - RentFaster search");
    info!("==================================");

    let mut scraper = RentFaster::connect(args.city, &settings)
        .await
        .with_context(|| format!("Failed to load search fields for {}", args.city))?;
    scraper
        .set_filter_from_file(&args.filter)
        .with_context(|| format!("Failed to load filter from {}", args.filter.display()))?;

    info!(
        "Searching {} on {} ({} known neighborhoods)",
        scraper.city(),
        scraper.source_name(),
        scraper.neighborhoods().len()
    );

    let options = FetchOptions { dump: args.dump };
    let results = scraper
        .request_properties(&options)
        .await
        .context("Search failed")?;

    if !results.is_complete() {
        warn!(
            "Only {}/{} pages fetched, results are partial",
            results.pages_fetched, results.pages_expected
        );
    }

    let table = results.table();
    info!("\n✅ Collected {} listings ({} unique)\n", results.len(), table.len());

    for (i, (id, row)) in table.iter().enumerate() {
        println!(
            "{}. ${} {} in {}",
            i + 1,
            row.price,
            row.property_type.as_deref().unwrap_or("Rental"),
            row.community.as_deref().unwrap_or("unknown community")
        );
        println!("   ID: {}", id);
        if !row.utilities.is_empty() {
            println!("   Utilities: {}", row.utilities);
        }
        if let Some(link) = &row.link {
            println!("   URL: {}", link);
        }
        println!();
    }

    let json = serde_json::to_string_pretty(&table)?;
    tokio::fs::write(&args.output, json).await?;
    info!("💾 Saved listing table to {}", args.output.display());

    Ok(())
}
