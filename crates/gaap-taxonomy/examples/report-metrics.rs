//! Example: Relate filing types to the taxonomy metrics they present.
//!
//! ```text
//! GAAP_TAXONOMY_DIR=/data/us-gaap-2025 cargo run -p gaap-taxonomy --example report-metrics
//! ```
//!
//! Prints the full analysis as JSON and a short summary per report type on
//! stderr.

use gaap_core::AppConfig;
use gaap_taxonomy::{ReportAnalyzer, TaxonomyLoader};

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,gaap=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = AppConfig::load_with_env()?;
    let table = TaxonomyLoader::from_config(&config.taxonomy)?.load()?;

    let analysis = ReportAnalyzer::new(&table, &config.taxonomy).run()?;

    for (report_type, summary) in &analysis.summary {
        eprintln!(
            "{report_type}: {} metrics ({} unique), sections: {}",
            summary.total_metrics,
            summary.unique_metrics,
            summary.sections.keys().copied().collect::<Vec<_>>().join(", ")
        );
    }

    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}
