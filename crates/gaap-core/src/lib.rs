//! GAAP Core - Foundation crate for the taxonomy lookup workspace.
//!
//! This crate provides the shared error type, configuration management and
//! identifier newtypes that the taxonomy crate builds on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes (`ElementName`)
//!
//! # Example
//!
//! ```rust
//! use gaap_core::{AppConfig, ElementName};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.taxonomy.prefix, "us-gaap");
//!
//! let name = ElementName::new("AccumulatedOtherComprehensiveIncomeLossNetOfTax")?;
//! println!("element: {name}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, LookupConfig, TaxonomyConfig};
pub use error::{ConfigError, ConfigResult, GaapError, Result};
pub use types::ElementName;
