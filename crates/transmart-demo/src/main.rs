//! Writes the sample tranSMART data collection in transmart-copy format.

use chrono::Utc;
use transmart_copy::{write_collection, CopyConfig, Table};
use transmart_demo::sample_collection;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Output directory from env or default
    let config = CopyConfig::from_env();
    tracing::info!("Writing output to {} ...", config.output_dir.display());

    let collection = sample_collection(Utc::now().date_naive())?;
    let stats = write_collection(&collection, &config)?;

    tracing::info!(
        "Wrote {} patients, {} visits and {} observation rows",
        stats.rows(Table::Patients),
        stats.rows(Table::Visits),
        stats.rows(Table::Observations)
    );
    tracing::info!("Done.");
    Ok(())
}
