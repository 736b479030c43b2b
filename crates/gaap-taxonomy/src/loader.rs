//! Taxonomy loading from the schema and its linkbases.
//!
//! This module reads `elts/<prefix>-<version>.xsd` together with the label and
//! reference linkbases next to it and builds the [`TaxonomyTable`]. Any
//! problem with the documents aborts the load; a partial table is never
//! returned.

use crate::{
    element::{Element, Reference},
    error::{Result, TaxonomyError},
    linkbase::{self, Locator, Resource, CONCEPT_LABEL_ARCROLE, CONCEPT_REFERENCE_ARCROLE},
    schema,
    table::TaxonomyTable,
};
use gaap_core::{ElementName, TaxonomyConfig};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Role of the standard label (also the default when a label has no role).
pub const STANDARD_LABEL_ROLE: &str = "http://www.xbrl.org/2003/role/label";

/// Role of the documentation label.
pub const DOCUMENTATION_ROLE: &str = "http://www.xbrl.org/2003/role/documentation";

/// Paths of the three documents that make up a taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomySources {
    /// Schema declaring the elements
    pub schema: PathBuf,
    /// Label linkbase
    pub labels: PathBuf,
    /// Reference linkbase
    pub references: PathBuf,
}

impl TaxonomySources {
    /// Resolve the document paths for a taxonomy configuration.
    #[must_use]
    pub fn from_config(config: &TaxonomyConfig) -> Self {
        Self {
            schema: config.schema_path(),
            labels: config.label_path(),
            references: config.reference_path(),
        }
    }
}

/// Loader for taxonomy documents.
pub struct TaxonomyLoader {
    sources: TaxonomySources,
    /// File name locators must point into (`us-gaap-2025.xsd`)
    schema_file: String,
    /// Element prefix stripped from locator fragments (`us-gaap_Assets`)
    prefix: String,
    label_language: String,
}

/// Label roles the table keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LabelKind {
    Standard,
    Documentation,
}

impl LabelKind {
    fn from_role(role: Option<&str>) -> Option<Self> {
        match role.unwrap_or(STANDARD_LABEL_ROLE) {
            STANDARD_LABEL_ROLE => Some(Self::Standard),
            DOCUMENTATION_ROLE => Some(Self::Documentation),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Documentation => "documentation",
        }
    }
}

/// Label and references collected for one element before it is finalized.
#[derive(Default)]
struct ElementDraft {
    label: Option<String>,
    documentation: Option<String>,
    references: Vec<Reference>,
}

impl TaxonomyLoader {
    /// Create a loader for the taxonomy rooted at `root_dir`, using the
    /// default prefix, version and label language.
    ///
    /// # Errors
    /// Returns error if the directory doesn't exist.
    pub fn new(root_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::from_config(&TaxonomyConfig {
            root_dir: root_dir.into(),
            ..TaxonomyConfig::default()
        })
    }

    /// Create a loader from a taxonomy configuration.
    ///
    /// # Errors
    /// Returns error if the configured root directory doesn't exist.
    pub fn from_config(config: &TaxonomyConfig) -> Result<Self> {
        if !config.root_dir.is_dir() {
            return Err(TaxonomyError::DirectoryNotFound {
                path: config.root_dir.display().to_string(),
            });
        }

        Ok(Self::with_sources(TaxonomySources::from_config(config), config))
    }

    /// Create a loader for explicit document paths.
    ///
    /// Only the prefix and label language are taken from `config`.
    #[must_use]
    pub fn with_sources(sources: TaxonomySources, config: &TaxonomyConfig) -> Self {
        let schema_file = sources
            .schema
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            sources,
            schema_file,
            prefix: config.prefix.clone(),
            label_language: config.label_language.clone(),
        }
    }

    /// The documents this loader reads.
    #[must_use]
    pub fn sources(&self) -> &TaxonomySources {
        &self.sources
    }

    /// Load the full taxonomy.
    ///
    /// # Errors
    /// Returns error if any document is missing, unreadable, not well-formed,
    /// or does not have the expected structure. Nothing is returned in that
    /// case.
    pub fn load(&self) -> Result<TaxonomyTable> {
        let schema_path = &self.sources.schema;
        let names = schema::parse_element_names(schema_path, &read_document(schema_path)?)?;

        let mut drafts: HashMap<ElementName, ElementDraft> = names
            .iter()
            .map(|name| (name.clone(), ElementDraft::default()))
            .collect();

        let labels = self.attach_labels(&mut drafts)?;
        let references = self.attach_references(&mut drafts)?;

        let mut elements = Vec::with_capacity(names.len());
        for name in names {
            let draft = drafts.remove(&name).unwrap_or_default();
            let label = draft.label.ok_or_else(|| {
                TaxonomyError::schema(
                    &self.sources.labels,
                    format!("element {name} has no standard label"),
                )
            })?;

            elements.push(Element {
                name,
                label,
                documentation: draft.documentation,
                references: draft.references,
            });
        }

        let table = TaxonomyTable::from_elements(elements)?;

        info!(
            elements = table.len(),
            labels,
            references,
            schema = %schema_path.display(),
            "loaded taxonomy"
        );

        Ok(table)
    }

    /// Attach standard and documentation labels. Returns the number assigned.
    fn attach_labels(&self, drafts: &mut HashMap<ElementName, ElementDraft>) -> Result<usize> {
        let path = &self.sources.labels;
        let links = linkbase::parse_linkbase(path, &read_document(path)?)?;
        let mut assigned = 0;

        for link in &links {
            for (locator, resource) in link.relationships(path, CONCEPT_LABEL_ARCROLE)? {
                if !self.matches_language(resource) {
                    continue;
                }
                let Some(kind) = LabelKind::from_role(resource.role.as_deref()) else {
                    continue;
                };

                let (name, draft) = self.resolve(path, locator, drafts)?;
                let slot = match kind {
                    LabelKind::Standard => &mut draft.label,
                    LabelKind::Documentation => &mut draft.documentation,
                };

                if let Some(existing) = slot.as_deref() {
                    if existing != resource.text {
                        return Err(TaxonomyError::schema(
                            path,
                            format!(
                                "element {name} has conflicting {} labels",
                                kind.as_str()
                            ),
                        ));
                    }
                } else {
                    *slot = Some(resource.text.clone());
                    assigned += 1;
                }
            }
        }

        debug!(path = %path.display(), assigned, "attached labels");
        Ok(assigned)
    }

    /// Attach references in arc order. Returns the number attached.
    fn attach_references(
        &self,
        drafts: &mut HashMap<ElementName, ElementDraft>,
    ) -> Result<usize> {
        let path = &self.sources.references;
        let links = linkbase::parse_linkbase(path, &read_document(path)?)?;
        let mut attached = 0;

        for link in &links {
            for (locator, resource) in link.relationships(path, CONCEPT_REFERENCE_ARCROLE)? {
                let reference = reference_from(path, resource)?;
                let (_, draft) = self.resolve(path, locator, drafts)?;
                draft.references.push(reference);
                attached += 1;
            }
        }

        debug!(path = %path.display(), attached, "attached references");
        Ok(attached)
    }

    /// Find the declared element a locator points at.
    ///
    /// The href must point into the schema file; its fragment may carry the
    /// `<prefix>_` id prefix or be the bare name.
    fn resolve<'d>(
        &self,
        path: &Path,
        locator: &Locator,
        drafts: &'d mut HashMap<ElementName, ElementDraft>,
    ) -> Result<(String, &'d mut ElementDraft)> {
        let href = &locator.href;
        let fragment = locator.fragment().ok_or_else(|| {
            TaxonomyError::schema(path, format!("locator href '{href}' has no fragment"))
        })?;

        if locator.document() != self.schema_file {
            return Err(TaxonomyError::schema(
                path,
                format!("locator '{href}' points outside {}", self.schema_file),
            ));
        }

        let name = fragment
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix('_'))
            .unwrap_or(fragment);

        let draft = drafts.get_mut(name).ok_or_else(|| {
            TaxonomyError::schema(
                path,
                format!("locator '{href}' points at an undeclared element"),
            )
        })?;

        Ok((name.to_string(), draft))
    }

    fn matches_language(&self, resource: &Resource) -> bool {
        match resource.lang.as_deref() {
            Some(lang) => lang.eq_ignore_ascii_case(&self.label_language),
            None => true,
        }
    }
}

/// Build a reference from a `link:reference` resource. The URI is mandatory.
fn reference_from(path: &Path, resource: &Resource) -> Result<Reference> {
    let uri = resource.part("URI").ok_or_else(|| {
        TaxonomyError::schema(
            path,
            format!("reference '{}' is missing its URI", resource.label),
        )
    })?;

    let part = |name: &str| resource.part(name).map(ToString::to_string);

    Ok(Reference {
        uri: uri.to_string(),
        topic: part("Topic"),
        subtopic: part("SubTopic"),
        section: part("Section"),
        paragraph: part("Paragraph"),
    })
}

pub(crate) fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| TaxonomyError::LoadError {
        path: path.display().to_string(),
        source: Box::new(e),
    })
}
