//! GAAP Taxonomy - Element label and reference lookup for the US GAAP taxonomy.
//!
//! This crate loads the taxonomy schema together with its label and reference
//! linkbases, indexes every element once into an immutable table, and answers
//! point lookups against it. The disclosure presentation linkbases can then be
//! analyzed to relate filing types (10-K, 10-Q, ...) to the metrics they use.
//!
//! # Architecture
//!
//! - **Element Types** ([`element`]): Strongly-typed elements and standard references
//! - **Linkbase Parsing** ([`schema`], [`linkbase`]): XML walking with quick-xml
//! - **Loader** ([`loader`]): Resolves the taxonomy documents and builds the table
//! - **Table** ([`table`]): Immutable in-memory index from element name to element
//! - **Service** ([`service`]): Shared read-only lookups returning serializable views
//! - **Reports** ([`report`]): Filing types and the metrics their presentation linkbases use
//! - **Errors** ([`error`]): Taxonomy-specific error types
//!
//! # Example
//!
//! ```rust,no_run
//! use gaap_taxonomy::{LookupService, TaxonomyLoader};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let loader = TaxonomyLoader::new("/data/us-gaap-2025")?;
//! let service = LookupService::new(loader.load()?);
//!
//! let label = service.get_label("AccumulatedOtherComprehensiveIncomeLossNetOfTax")?;
//! println!("Label: {}", label.label);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod element;
pub mod error;
pub mod linkbase;
pub mod loader;
pub mod report;
pub mod schema;
pub mod service;
pub mod table;

// Re-export commonly used types
pub use element::{Element, Reference};
pub use error::{Result, TaxonomyError};
pub use loader::{TaxonomyLoader, TaxonomySources};
pub use report::{ReportAnalysis, ReportAnalyzer, ReportMetric, ReportMetrics, ReportType};
pub use service::{
    ElementPage, ElementView, LabelView, LookupService, ReferencesView, SearchPage,
};
pub use table::TaxonomyTable;
