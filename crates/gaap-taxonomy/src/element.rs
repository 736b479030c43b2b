//! Taxonomy element types.
//!
//! This module defines the records built from the schema and linkbases.

use crate::error::{Result, TaxonomyError};
use gaap_core::ElementName;
use serde::Serialize;

/// A single financial-reporting concept with its label and citations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    /// Case-sensitive element name (e.g. `Assets`)
    pub name: ElementName,

    /// Standard label in the configured language
    pub label: String,

    /// Documentation label, when the label linkbase provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,

    /// Standard references, in linkbase order
    pub references: Vec<Reference>,
}

impl Element {
    /// Get the element name.
    #[must_use]
    pub fn name(&self) -> &ElementName {
        &self.name
    }

    /// Get the standard label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the documentation label, if any.
    #[must_use]
    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    /// Get the standard references. Empty when the element has none.
    #[must_use]
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// Validate the element for completeness.
    pub fn validate(&self) -> Result<()> {
        if self.label.trim().is_empty() {
            return Err(TaxonomyError::InvalidElement {
                identifier: self.name.to_string(),
                reason: "element label cannot be empty".to_string(),
            });
        }

        for reference in &self.references {
            reference.validate(&self.name)?;
        }

        Ok(())
    }
}

/// Citation into an accounting standard.
///
/// Only the URI is mandatory; the FASB linkbase leaves out the sub-topic,
/// section or paragraph on some citations, and those stay `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Reference {
    /// Resolvable link to the codification text
    pub uri: String,

    /// Codification topic (e.g. `220`)
    pub topic: Option<String>,

    /// Codification sub-topic (e.g. `10`)
    pub subtopic: Option<String>,

    /// Section (e.g. `45`)
    pub section: Option<String>,

    /// Paragraph (e.g. `14A`)
    pub paragraph: Option<String>,
}

impl Reference {
    /// Validate the reference for its owning element.
    pub fn validate(&self, element: &ElementName) -> Result<()> {
        if self.uri.trim().is_empty() {
            return Err(TaxonomyError::InvalidElement {
                identifier: element.to_string(),
                reason: "reference URI cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Codification citation such as `220-10-45-14A`, built from the parts present.
    #[must_use]
    pub fn citation(&self) -> String {
        [&self.topic, &self.subtopic, &self.section, &self.paragraph]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("-")
    }
}
