//! Element declarations from the taxonomy schema (`.xsd`).

use crate::error::{Result, TaxonomyError};
use gaap_core::ElementName;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Depth of the `xs:schema` root.
const ROOT_DEPTH: usize = 1;

/// Collect the names of the top-level `xs:element` declarations, in
/// document order.
///
/// Nested element declarations (inside complex types) are not concepts and
/// are skipped. A name declared twice is rejected.
pub fn parse_element_names(path: &Path, xml: &str) -> Result<Vec<ElementName>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut names = Vec::new();
    let mut seen = HashSet::new();
    let mut depth = 0usize;
    let mut saw_root = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| TaxonomyError::xml(path, e))?;

        match event {
            Event::Start(e) => {
                depth += 1;
                saw_root |= check_root(path, &e, depth)?;
                if depth == ROOT_DEPTH + 1 {
                    declare(path, &e, &mut names, &mut seen)?;
                }
            }
            Event::Empty(e) => {
                saw_root |= check_root(path, &e, depth + 1)?;
                if depth + 1 == ROOT_DEPTH + 1 {
                    declare(path, &e, &mut names, &mut seen)?;
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(TaxonomyError::schema(path, "missing xs:schema root element"));
    }

    if names.is_empty() {
        return Err(TaxonomyError::schema(path, "schema declares no elements"));
    }

    debug!(path = %path.display(), count = names.len(), "parsed schema elements");

    Ok(names)
}

fn check_root(path: &Path, e: &BytesStart<'_>, depth: usize) -> Result<bool> {
    if depth != ROOT_DEPTH {
        return Ok(false);
    }

    if e.local_name().as_ref() == b"schema" {
        Ok(true)
    } else {
        Err(TaxonomyError::schema(
            path,
            format!(
                "expected xs:schema root, found <{}>",
                String::from_utf8_lossy(e.name().as_ref())
            ),
        ))
    }
}

fn declare(
    path: &Path,
    e: &BytesStart<'_>,
    names: &mut Vec<ElementName>,
    seen: &mut HashSet<ElementName>,
) -> Result<()> {
    if e.local_name().as_ref() != b"element" {
        return Ok(());
    }

    let name = e
        .try_get_attribute("name")
        .map_err(|err| TaxonomyError::xml(path, err.into()))?
        .ok_or_else(|| TaxonomyError::schema(path, "xs:element declaration without a name"))?;

    let name = name
        .unescape_value()
        .map_err(|err| TaxonomyError::xml(path, err))?;

    let name = ElementName::new(name.into_owned())?;

    if !seen.insert(name.clone()) {
        return Err(TaxonomyError::DuplicateElement {
            identifier: name.to_string(),
        });
    }

    names.push(name);
    Ok(())
}
