//! Read-only lookup service over a loaded taxonomy.
//!
//! The service is what an HTTP layer holds on to: it is cheap to clone,
//! shares one [`TaxonomyTable`] and returns serializable views that borrow
//! from it.

use crate::{
    element::Reference,
    error::Result,
    table::TaxonomyTable,
};
use gaap_core::{ElementName, LookupConfig};
use serde::Serialize;
use std::sync::Arc;

/// Full record of one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementView<'a> {
    /// Element name
    pub identifier: &'a str,
    /// Standard label
    pub label: &'a str,
    /// Documentation label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<&'a str>,
    /// References in linkbase order
    pub references: &'a [Reference],
}

/// Label-only projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelView<'a> {
    /// Element name
    pub identifier: &'a str,
    /// Standard label
    pub label: &'a str,
}

/// References-only projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferencesView<'a> {
    /// Element name
    pub identifier: &'a str,
    /// References in linkbase order, possibly empty
    pub references: &'a [Reference],
}

/// One page of element names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementPage<'a> {
    /// Number of names before paging
    pub total: usize,
    /// Names skipped
    pub skip: usize,
    /// Effective page size
    pub limit: usize,
    /// Names on this page, sorted
    pub elements: Vec<&'a str>,
}

/// One page of names matching a keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchPage<'a> {
    /// The keyword searched for
    pub keyword: String,
    /// Number of matches before paging
    pub total: usize,
    /// Matches skipped
    pub skip: usize,
    /// Effective page size
    pub limit: usize,
    /// Matching names on this page, sorted
    pub elements: Vec<&'a str>,
}

/// Lookup operations over a shared taxonomy table.
#[derive(Debug, Clone)]
pub struct LookupService {
    table: Arc<TaxonomyTable>,
    limits: LookupConfig,
}

impl LookupService {
    /// Create a service owning the table, with default paging limits.
    #[must_use]
    pub fn new(table: TaxonomyTable) -> Self {
        Self::with_limits(Arc::new(table), LookupConfig::default())
    }

    /// Create a service over an already shared table.
    #[must_use]
    pub fn with_limits(table: Arc<TaxonomyTable>, limits: LookupConfig) -> Self {
        Self { table, limits }
    }

    /// The underlying table.
    #[must_use]
    pub fn table(&self) -> &TaxonomyTable {
        &self.table
    }

    /// Number of elements available.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether no elements are available.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Check if an element exists.
    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.table.contains(identifier)
    }

    /// Get the full record of an element.
    ///
    /// # Errors
    /// Returns `NotFound` for unknown identifiers.
    pub fn get_element(&self, identifier: &str) -> Result<ElementView<'_>> {
        let element = self.table.get(identifier)?;
        Ok(ElementView {
            identifier: element.name().as_str(),
            label: element.label(),
            documentation: element.documentation(),
            references: element.references(),
        })
    }

    /// Get the label of an element.
    ///
    /// # Errors
    /// Returns `NotFound` for unknown identifiers, never an empty label.
    pub fn get_label(&self, identifier: &str) -> Result<LabelView<'_>> {
        let element = self.table.get(identifier)?;
        Ok(LabelView {
            identifier: element.name().as_str(),
            label: element.label(),
        })
    }

    /// Get the references of an element.
    ///
    /// # Errors
    /// Returns `NotFound` for unknown identifiers. A known element without
    /// references yields an empty list.
    pub fn get_references(&self, identifier: &str) -> Result<ReferencesView<'_>> {
        let element = self.table.get(identifier)?;
        Ok(ReferencesView {
            identifier: element.name().as_str(),
            references: element.references(),
        })
    }

    /// List all element names, sorted and paginated.
    #[must_use]
    pub fn list(&self, skip: usize, limit: Option<usize>) -> ElementPage<'_> {
        let names = self.table.names();
        let limit = self.effective_limit(limit);

        ElementPage {
            total: names.len(),
            skip,
            limit,
            elements: page(names.iter(), skip, limit),
        }
    }

    /// Search element names containing `keyword`, ignoring case.
    ///
    /// An empty keyword matches every element.
    #[must_use]
    pub fn search(&self, keyword: &str, skip: usize, limit: Option<usize>) -> SearchPage<'_> {
        let needle = keyword.to_lowercase();
        let matches: Vec<&ElementName> = self
            .table
            .names()
            .iter()
            .filter(|name| name.as_str().to_lowercase().contains(&needle))
            .collect();
        let limit = self.effective_limit(limit);

        SearchPage {
            keyword: keyword.to_string(),
            total: matches.len(),
            skip,
            limit,
            elements: page(matches.into_iter(), skip, limit),
        }
    }

    fn effective_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.limits.default_page_limit)
            .min(self.limits.max_page_limit)
    }
}

fn page<'a>(
    names: impl Iterator<Item = &'a ElementName>,
    skip: usize,
    limit: usize,
) -> Vec<&'a str> {
    names.skip(skip).take(limit).map(ElementName::as_str).collect()
}
