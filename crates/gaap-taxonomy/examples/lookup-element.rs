//! Example: Load the taxonomy and print one element as JSON.
//!
//! ```text
//! GAAP_TAXONOMY_DIR=/data/us-gaap-2025 cargo run -p gaap-taxonomy --example lookup-element -- Assets
//! ```
//!
//! With no argument, the first page of element names is printed instead.

use gaap_core::AppConfig;
use gaap_taxonomy::{LookupService, TaxonomyLoader};
use std::sync::Arc;

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,gaap=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = AppConfig::load_with_env()?;

    // A failed load ends the process; nothing is served from a partial table.
    let loader = TaxonomyLoader::from_config(&config.taxonomy)?;
    let table = loader.load()?;
    let service = LookupService::with_limits(Arc::new(table), config.lookup.clone());

    match std::env::args().nth(1) {
        Some(identifier) => match service.get_element(&identifier) {
            Ok(view) => println!("{}", serde_json::to_string_pretty(&view)?),
            Err(e) if e.is_not_found() => {
                eprintln!("{e}");
                std::process::exit(1);
            }
            Err(e) => return Err(Box::new(e)),
        },
        None => {
            let page = service.list(0, None);
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
    }

    Ok(())
}
