//! Error types for the taxonomy subsystem.

use thiserror::Error;

/// Errors that can occur while loading or querying the taxonomy.
///
/// [`TaxonomyError::NotFound`] is the only error a lookup produces; every
/// other variant is raised while loading and must abort startup.
#[derive(Error, Debug)]
pub enum TaxonomyError {
    /// Element not present in the taxonomy
    #[error("element not found: {identifier}")]
    NotFound {
        /// The identifier that was looked up
        identifier: String,
    },

    /// Taxonomy root directory not found
    #[error("taxonomy directory not found at {path}")]
    DirectoryNotFound {
        /// Expected directory path
        path: String,
    },

    /// Failed to read a taxonomy document
    #[error("failed to load taxonomy document from {path}: {source}")]
    LoadError {
        /// Path to the document
        path: String,
        /// Underlying error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Document is not well-formed XML
    #[error("failed to parse XML in {path}: {source}")]
    XmlError {
        /// Path to the document
        path: String,
        /// XML parse error
        #[source]
        source: quick_xml::Error,
    },

    /// Document is well-formed but does not have the expected shape
    #[error("unexpected taxonomy structure in {path}: {reason}")]
    SchemaError {
        /// Path to the document
        path: String,
        /// What was wrong
        reason: String,
    },

    /// Element record failed validation
    #[error("invalid element {identifier}: {reason}")]
    InvalidElement {
        /// Element being validated
        identifier: String,
        /// Reason for validation failure
        reason: String,
    },

    /// The same element is declared more than once
    #[error("duplicate element declaration: {identifier}")]
    DuplicateElement {
        /// The element declared twice
        identifier: String,
    },

    /// Element name failed validation
    #[error(transparent)]
    InvalidName(#[from] gaap_core::GaapError),
}

impl TaxonomyError {
    /// Whether this is the routine "unknown element" outcome of a lookup.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this error comes from loading (and is therefore fatal).
    #[must_use]
    pub fn is_load_error(&self) -> bool {
        !self.is_not_found()
    }

    pub(crate) fn xml(path: &std::path::Path, source: quick_xml::Error) -> Self {
        Self::XmlError {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn schema(path: &std::path::Path, reason: impl Into<String>) -> Self {
        Self::SchemaError {
            path: path.display().to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for taxonomy operations.
pub type Result<T> = std::result::Result<T, TaxonomyError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_not_found_is_not_a_load_error() {
        let err = TaxonomyError::NotFound {
            identifier: "NoSuchElement".to_string(),
        };
        assert!(err.is_not_found());
        assert!(!err.is_load_error());
        assert_eq!(err.to_string(), "element not found: NoSuchElement");
    }

    #[test]
    fn test_schema_error_display() {
        let err = TaxonomyError::schema(
            Path::new("elts/us-gaap-ref-2025.xml"),
            "reference is missing URI",
        );
        assert!(err.is_load_error());
        assert_eq!(
            err.to_string(),
            "unexpected taxonomy structure in elts/us-gaap-ref-2025.xml: reference is missing URI"
        );
    }

    #[test]
    fn test_error_from_core() {
        let core_err = gaap_core::GaapError::Validation("bad name".to_string());
        let err: TaxonomyError = core_err.into();
        assert!(matches!(err, TaxonomyError::InvalidName(_)));
    }

    #[test]
    fn test_invalid_name_display_is_not_repeated() {
        let core_err = gaap_core::ElementName::new("us-gaap:Assets").unwrap_err();
        let err = TaxonomyError::from(core_err);
        assert_eq!(
            err.to_string(),
            "validation error: invalid element name: must be alphanumeric starting with a letter, got 'us-gaap:Assets'"
        );
    }
}
