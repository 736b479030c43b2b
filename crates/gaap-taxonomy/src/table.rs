//! Immutable in-memory taxonomy table.

use crate::{
    element::{Element, Reference},
    error::{Result, TaxonomyError},
};
use gaap_core::ElementName;
use std::collections::HashMap;
use tracing::debug;

/// Index from element name to element, built once and never modified.
///
/// The table has no interior mutability, so a shared reference (or an
/// `Arc`) can be read from any number of threads at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyTable {
    /// Elements indexed by name
    elements: HashMap<ElementName, Element>,
    /// All names, sorted ascending
    names: Vec<ElementName>,
}

impl TaxonomyTable {
    /// Build a table from loaded elements.
    ///
    /// # Errors
    /// Returns error if an element fails validation or a name appears twice.
    pub fn from_elements(elements: impl IntoIterator<Item = Element>) -> Result<Self> {
        let mut index = HashMap::new();

        for element in elements {
            element.validate()?;

            let name = element.name().clone();
            if index.insert(name.clone(), element).is_some() {
                return Err(TaxonomyError::DuplicateElement {
                    identifier: name.to_string(),
                });
            }
        }

        let mut names: Vec<ElementName> = index.keys().cloned().collect();
        names.sort();

        debug!(count = names.len(), "built taxonomy table");

        Ok(Self {
            elements: index,
            names,
        })
    }

    /// Get an element by its exact, case-sensitive name.
    ///
    /// # Errors
    /// Returns [`TaxonomyError::NotFound`] if no such element exists.
    pub fn get(&self, identifier: &str) -> Result<&Element> {
        self.elements
            .get(identifier)
            .ok_or_else(|| TaxonomyError::NotFound {
                identifier: identifier.to_string(),
            })
    }

    /// Get the standard label of an element.
    ///
    /// # Errors
    /// Returns [`TaxonomyError::NotFound`] if no such element exists.
    pub fn label(&self, identifier: &str) -> Result<&str> {
        self.get(identifier).map(Element::label)
    }

    /// Get the references of an element, in linkbase order.
    ///
    /// An element without references yields an empty slice, not an error.
    ///
    /// # Errors
    /// Returns [`TaxonomyError::NotFound`] if no such element exists.
    pub fn references(&self, identifier: &str) -> Result<&[Reference]> {
        self.get(identifier).map(Element::references)
    }

    /// Check if an element exists in the table.
    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.elements.contains_key(identifier)
    }

    /// Get the total number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the table holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// All element names, sorted ascending.
    #[must_use]
    pub fn names(&self) -> &[ElementName] {
        &self.names
    }

    /// Iterate over the elements in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.names.iter().filter_map(|name| self.elements.get(name))
    }
}
