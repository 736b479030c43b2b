//! XLink extended links from label, reference and presentation linkbases.
//!
//! All of them share one shape: an extended link (`link:labelLink`,
//! `link:referenceLink`, `link:presentationLink`) holds locators pointing at schema elements,
//! resources (labels or references) and arcs connecting the two. Nodes are
//! recognized by their `xlink:type`, so element prefixes do not matter.

use crate::error::{Result, TaxonomyError};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Arcrole connecting a concept to its label.
pub const CONCEPT_LABEL_ARCROLE: &str = "http://www.xbrl.org/2003/arcrole/concept-label";

/// Arcrole connecting a concept to its reference.
pub const CONCEPT_REFERENCE_ARCROLE: &str = "http://www.xbrl.org/2003/arcrole/concept-reference";

/// One extended link and everything declared inside it.
///
/// XLink labels are scoped to the extended link that declares them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtendedLink {
    /// Extended link role, if any
    pub role: Option<String>,
    /// Locators in document order
    pub locators: Vec<Locator>,
    /// Resources in document order
    pub resources: Vec<Resource>,
    /// Arcs in document order
    pub arcs: Vec<LinkArc>,
}

/// A `link:loc` pointing at a schema element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    /// `xlink:label`
    pub label: String,
    /// `xlink:href`, e.g. `us-gaap-2025.xsd#us-gaap_Assets`
    pub href: String,
}

impl Locator {
    /// File name of the document the href points into, without any directory
    /// or URL path (`us-gaap-2025.xsd` for `../elts/us-gaap-2025.xsd#Assets`).
    #[must_use]
    pub fn document(&self) -> &str {
        let document = self
            .href
            .split_once('#')
            .map_or(self.href.as_str(), |(document, _)| document);
        document.rsplit('/').next().unwrap_or(document)
    }

    /// The fragment of the href (the part after `#`).
    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        self.href
            .split_once('#')
            .map(|(_, fragment)| fragment)
            .filter(|fragment| !fragment.is_empty())
    }
}

/// A label or reference resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resource {
    /// `xlink:label`
    pub label: String,
    /// `xlink:role`
    pub role: Option<String>,
    /// `xml:lang`
    pub lang: Option<String>,
    /// Text content (label resources)
    pub text: String,
    /// Child element local names and their text (reference resources)
    pub parts: Vec<(String, String)>,
}

impl Resource {
    /// Text of the first child with the given local name, ignoring empty ones.
    #[must_use]
    pub fn part(&self, name: &str) -> Option<&str> {
        self.parts
            .iter()
            .find(|(part, _)| part == name)
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.is_empty())
    }
}

/// An arc from a locator label to a resource label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkArc {
    /// `xlink:from`
    pub from: String,
    /// `xlink:to`
    pub to: String,
    /// `xlink:arcrole`
    pub arcrole: Option<String>,
}

impl LinkArc {
    fn has_arcrole(&self, arcrole: &str) -> bool {
        self.arcrole.as_deref().map_or(true, |role| role == arcrole)
    }
}

impl ExtendedLink {
    /// Resolve arcs with the given arcrole into (locator, resource) pairs.
    ///
    /// Pairs come out in arc order; when a label is shared, in document
    /// order of the locators and resources carrying it. Arcs without an
    /// arcrole are included, arcs with another arcrole are skipped. An arc
    /// whose endpoints are not declared in this link is an error.
    pub fn relationships(
        &self,
        path: &Path,
        arcrole: &str,
    ) -> Result<Vec<(&Locator, &Resource)>> {
        let mut locators: HashMap<&str, Vec<&Locator>> = HashMap::new();
        for locator in &self.locators {
            locators.entry(locator.label.as_str()).or_default().push(locator);
        }

        let mut resources: HashMap<&str, Vec<&Resource>> = HashMap::new();
        for resource in &self.resources {
            resources.entry(resource.label.as_str()).or_default().push(resource);
        }

        let mut pairs = Vec::new();
        for arc in self.arcs.iter().filter(|arc| arc.has_arcrole(arcrole)) {
            let from = locators.get(arc.from.as_str()).ok_or_else(|| {
                TaxonomyError::schema(path, format!("arc from unknown locator '{}'", arc.from))
            })?;
            let to = resources.get(arc.to.as_str()).ok_or_else(|| {
                TaxonomyError::schema(path, format!("arc to unknown resource '{}'", arc.to))
            })?;

            for locator in from {
                for resource in to {
                    pairs.push((*locator, *resource));
                }
            }
        }

        Ok(pairs)
    }
}

/// Parse every extended link in a linkbase document.
pub fn parse_linkbase(path: &Path, xml: &str) -> Result<Vec<ExtendedLink>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut parser = LinkbaseParser::new(path);

    loop {
        let event = reader
            .read_event()
            .map_err(|e| TaxonomyError::xml(path, e))?;

        match event {
            Event::Start(e) => {
                parser.depth += 1;
                parser.open(&e)?;
            }
            Event::Empty(e) => {
                parser.depth += 1;
                parser.open(&e)?;
                parser.close();
                parser.depth -= 1;
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| TaxonomyError::xml(path, e))?;
                parser.text(&text);
            }
            Event::CData(c) => {
                let bytes = c.into_inner();
                parser.text(&String::from_utf8_lossy(&bytes));
            }
            Event::End(_) => {
                parser.close();
                parser.depth = parser.depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    debug!(
        path = %path.display(),
        links = parser.links.len(),
        "parsed linkbase"
    );

    Ok(parser.links)
}

/// Open node with the depth it was opened at.
struct Open<T> {
    depth: usize,
    node: T,
}

struct LinkbaseParser<'p> {
    path: &'p Path,
    depth: usize,
    links: Vec<ExtendedLink>,
    link: Option<Open<ExtendedLink>>,
    resource: Option<Open<Resource>>,
    part: Option<Open<(String, String)>>,
}

impl<'p> LinkbaseParser<'p> {
    fn new(path: &'p Path) -> Self {
        Self {
            path,
            depth: 0,
            links: Vec::new(),
            link: None,
            resource: None,
            part: None,
        }
    }

    fn open(&mut self, e: &BytesStart<'_>) -> Result<()> {
        let depth = self.depth;

        // Children of a resource are reference parts; anything deeper is
        // folded into the enclosing part.
        if self.resource.is_some() {
            if self.part.is_none() {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                self.part = Some(Open {
                    depth,
                    node: (name, String::new()),
                });
            }
            return Ok(());
        }

        let attrs = self.attributes(e)?;
        let get = |key: &str| attrs.get(key).cloned();

        match attrs.get("type").map(String::as_str) {
            Some("extended") => {
                if self.link.is_some() {
                    return Err(TaxonomyError::schema(self.path, "nested extended link"));
                }
                self.link = Some(Open {
                    depth,
                    node: ExtendedLink {
                        role: get("role"),
                        ..ExtendedLink::default()
                    },
                });
            }
            Some("locator") => {
                if self.link.is_none() {
                    return Ok(());
                }
                let label = self.required(&attrs, "label", "locator")?;
                let href = self.required(&attrs, "href", "locator")?;
                if let Some(link) = self.link.as_mut() {
                    link.node.locators.push(Locator { label, href });
                }
            }
            Some("resource") => {
                if self.link.is_none() {
                    return Ok(());
                }
                let label = self.required(&attrs, "label", "resource")?;
                self.resource = Some(Open {
                    depth,
                    node: Resource {
                        label,
                        role: get("role"),
                        lang: get("lang"),
                        ..Resource::default()
                    },
                });
            }
            Some("arc") => {
                if self.link.is_none() {
                    return Ok(());
                }
                let from = self.required(&attrs, "from", "arc")?;
                let to = self.required(&attrs, "to", "arc")?;
                if let Some(link) = self.link.as_mut() {
                    link.node.arcs.push(LinkArc {
                        from,
                        to,
                        arcrole: get("arcrole"),
                    });
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn close(&mut self) {
        let depth = self.depth;

        if self.part.as_ref().is_some_and(|open| open.depth == depth) {
            if let (Some(part), Some(resource)) = (self.part.take(), self.resource.as_mut()) {
                resource.node.parts.push(part.node);
            }
        } else if self.resource.as_ref().is_some_and(|open| open.depth == depth) {
            if let (Some(resource), Some(link)) = (self.resource.take(), self.link.as_mut()) {
                link.node.resources.push(resource.node);
            }
        } else if self.link.as_ref().is_some_and(|open| open.depth == depth) {
            if let Some(link) = self.link.take() {
                self.links.push(link.node);
            }
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(part) = self.part.as_mut() {
            part.node.1.push_str(text);
        } else if let Some(resource) = self.resource.as_mut() {
            resource.node.text.push_str(text);
        }
    }

    /// Attributes keyed by local name, namespace declarations excluded.
    fn attributes(&self, e: &BytesStart<'_>) -> Result<HashMap<String, String>> {
        let mut attrs = HashMap::new();

        for attr in e.attributes() {
            let attr = attr.map_err(|err| TaxonomyError::xml(self.path, err.into()))?;
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }

            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|err| TaxonomyError::xml(self.path, err))?
                .into_owned();
            attrs.insert(key, value);
        }

        Ok(attrs)
    }

    fn required(
        &self,
        attrs: &HashMap<String, String>,
        key: &str,
        node: &str,
    ) -> Result<String> {
        attrs
            .get(key)
            .filter(|value| !value.is_empty())
            .cloned()
            .ok_or_else(|| TaxonomyError::schema(self.path, format!("{node} without xlink:{key}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<link:linkbase xmlns:link="http://www.xbrl.org/2003/linkbase"
               xmlns:xlink="http://www.w3.org/1999/xlink"
               xmlns:xml="http://www.w3.org/XML/1998/namespace">
  <link:roleRef roleURI="http://www.xbrl.org/2009/role/negatedLabel" xlink:type="simple" xlink:href="x.xsd#negated"/>
  <link:labelLink xlink:type="extended" xlink:role="http://www.xbrl.org/2003/role/link">
    <link:loc xlink:type="locator" xlink:href="us-gaap-2025.xsd#us-gaap_Assets" xlink:label="Assets"/>
    <link:label xlink:type="resource" xlink:label="lab_Assets" xlink:role="http://www.xbrl.org/2003/role/label" xml:lang="en-US">Assets</link:label>
    <link:label xlink:type="resource" xlink:label="lab_Assets" xlink:role="http://www.xbrl.org/2003/role/terseLabel" xml:lang="en-US">Total &amp; Assets</link:label>
    <link:labelArc xlink:type="arc" xlink:arcrole="http://www.xbrl.org/2003/arcrole/concept-label" xlink:from="Assets" xlink:to="lab_Assets"/>
  </link:labelLink>
</link:linkbase>
"#;

    const REFERENCES: &str = r#"<link:linkbase xmlns:link="http://www.xbrl.org/2003/linkbase"
               xmlns:xlink="http://www.w3.org/1999/xlink"
               xmlns:ref="http://www.xbrl.org/2006/ref"
               xmlns:codification-part="http://fasb.org/codification-part/2025">
  <link:referenceLink xlink:type="extended" xlink:role="http://www.xbrl.org/2003/role/link">
    <link:loc xlink:type="locator" xlink:href="us-gaap-2025.xsd#us-gaap_Assets" xlink:label="Assets"/>
    <link:reference xlink:type="resource" xlink:label="Assets_ref" xlink:role="http://www.xbrl.org/2003/role/disclosureRef">
      <ref:Publisher>FASB</ref:Publisher>
      <codification-part:Topic>210</codification-part:Topic>
      <codification-part:SubTopic>10</codification-part:SubTopic>
      <ref:Section>S99</ref:Section>
      <ref:Paragraph>1</ref:Paragraph>
      <codification-part:URI><![CDATA[https://asc.fasb.org/1943274/2147481566/210-10-S99-1]]></codification-part:URI>
    </link:reference>
    <link:referenceArc xlink:type="arc" xlink:arcrole="http://www.xbrl.org/2003/arcrole/concept-reference" xlink:from="Assets" xlink:to="Assets_ref"/>
  </link:referenceLink>
</link:linkbase>
"#;

    fn parse(xml: &str) -> Result<Vec<ExtendedLink>> {
        parse_linkbase(Path::new("us-gaap-lab-2025.xml"), xml)
    }

    #[test]
    fn test_parse_label_link() {
        let links = parse(LABELS).expect("parse label linkbase");
        assert_eq!(links.len(), 1);

        let link = &links[0];
        assert_eq!(
            link.role.as_deref(),
            Some("http://www.xbrl.org/2003/role/link")
        );
        assert_eq!(link.locators.len(), 1);
        assert_eq!(link.locators[0].fragment(), Some("us-gaap_Assets"));
        assert_eq!(link.resources.len(), 2);
        assert_eq!(link.resources[0].text, "Assets");
        assert_eq!(link.resources[0].lang.as_deref(), Some("en-US"));
        assert_eq!(link.resources[1].text, "Total & Assets");
        assert_eq!(link.arcs.len(), 1);
    }

    #[test]
    fn test_relationships_follow_shared_labels() {
        let links = parse(LABELS).expect("parse label linkbase");
        let pairs = links[0]
            .relationships(Path::new("labels.xml"), CONCEPT_LABEL_ARCROLE)
            .expect("resolve arcs");

        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|(loc, _)| loc.label == "Assets"));
        assert_eq!(pairs[0].1.text, "Assets");
        assert_eq!(pairs[1].1.text, "Total & Assets");
    }

    #[test]
    fn test_parse_reference_parts() {
        let links = parse(REFERENCES).expect("parse reference linkbase");
        let resource = &links[0].resources[0];

        assert_eq!(resource.part("Publisher"), Some("FASB"));
        assert_eq!(resource.part("Topic"), Some("210"));
        assert_eq!(resource.part("SubTopic"), Some("10"));
        assert_eq!(resource.part("Section"), Some("S99"));
        assert_eq!(resource.part("Paragraph"), Some("1"));
        assert_eq!(
            resource.part("URI"),
            Some("https://asc.fasb.org/1943274/2147481566/210-10-S99-1")
        );
        assert_eq!(resource.part("Subparagraph"), None);
        assert!(resource.text.is_empty());
    }

    #[test]
    fn test_arc_to_unknown_resource_rejected() {
        let xml = r#"<link:linkbase xmlns:link="http://www.xbrl.org/2003/linkbase" xmlns:xlink="http://www.w3.org/1999/xlink">
  <link:labelLink xlink:type="extended">
    <link:loc xlink:type="locator" xlink:href="us-gaap-2025.xsd#us-gaap_Assets" xlink:label="Assets"/>
    <link:labelArc xlink:type="arc" xlink:from="Assets" xlink:to="missing"/>
  </link:labelLink>
</link:linkbase>"#;

        let links = parse(xml).expect("parse linkbase");
        let result = links[0].relationships(Path::new("labels.xml"), CONCEPT_LABEL_ARCROLE);
        assert!(matches!(result, Err(TaxonomyError::SchemaError { .. })));
    }

    #[test]
    fn test_locator_without_href_rejected() {
        let xml = r#"<link:linkbase xmlns:link="http://www.xbrl.org/2003/linkbase" xmlns:xlink="http://www.w3.org/1999/xlink">
  <link:labelLink xlink:type="extended">
    <link:loc xlink:type="locator" xlink:label="Assets"/>
  </link:labelLink>
</link:linkbase>"#;

        assert!(matches!(parse(xml), Err(TaxonomyError::SchemaError { .. })));
    }

    #[test]
    fn test_labels_scoped_per_extended_link() {
        let xml = r#"<link:linkbase xmlns:link="http://www.xbrl.org/2003/linkbase" xmlns:xlink="http://www.w3.org/1999/xlink">
  <link:labelLink xlink:type="extended">
    <link:loc xlink:type="locator" xlink:href="a.xsd#us-gaap_Assets" xlink:label="loc"/>
  </link:labelLink>
  <link:labelLink xlink:type="extended">
    <link:label xlink:type="resource" xlink:label="lab">Assets</link:label>
    <link:labelArc xlink:type="arc" xlink:from="loc" xlink:to="lab"/>
  </link:labelLink>
</link:linkbase>"#;

        let links = parse(xml).expect("parse linkbase");
        assert_eq!(links.len(), 2);
        assert!(links[1]
            .relationships(Path::new("labels.xml"), CONCEPT_LABEL_ARCROLE)
            .is_err());
    }

    #[test]
    fn test_empty_resource_has_no_text() {
        let xml = r#"<link:linkbase xmlns:link="http://www.xbrl.org/2003/linkbase" xmlns:xlink="http://www.w3.org/1999/xlink">
  <link:labelLink xlink:type="extended">
    <link:label xlink:type="resource" xlink:label="lab"/>
  </link:labelLink>
</link:linkbase>"#;

        let links = parse(xml).expect("parse linkbase");
        assert_eq!(links[0].resources.len(), 1);
        assert!(links[0].resources[0].text.is_empty());
    }

    #[test]
    fn test_locator_fragment() {
        let locator = Locator {
            label: "loc".to_string(),
            href: "us-gaap-2025.xsd".to_string(),
        };
        assert_eq!(locator.fragment(), None);
        assert_eq!(locator.document(), "us-gaap-2025.xsd");
    }

    #[test]
    fn test_locator_document_strips_path() {
        let locator = |href: &str| Locator {
            label: "loc".to_string(),
            href: href.to_string(),
        };

        assert_eq!(
            locator("../elts/us-gaap-2025.xsd#us-gaap_Assets").document(),
            "us-gaap-2025.xsd"
        );
        assert_eq!(
            locator("https://xbrl.fasb.org/us-gaap/2025/elts/us-gaap-2025.xsd#us-gaap_Assets")
                .document(),
            "us-gaap-2025.xsd"
        );
        assert_eq!(locator("#Assets").document(), "");
    }

    #[test]
    fn test_arcs_with_other_arcrole_are_skipped() {
        let xml = r#"<link:linkbase xmlns:link="http://www.xbrl.org/2003/linkbase" xmlns:xlink="http://www.w3.org/1999/xlink">
  <link:labelLink xlink:type="extended">
    <link:loc xlink:type="locator" xlink:href="us-gaap-2025.xsd#us-gaap_Assets" xlink:label="Assets"/>
    <link:label xlink:type="resource" xlink:label="lab_Assets">Assets</link:label>
    <link:labelArc xlink:type="arc" xlink:arcrole="http://www.xbrl.org/2003/arcrole/concept-label" xlink:from="Assets" xlink:to="lab_Assets"/>
    <link:labelArc xlink:type="arc" xlink:arcrole="http://example.com/arcrole/element-label" xlink:from="Assets" xlink:to="missing"/>
    <link:labelArc xlink:type="arc" xlink:from="Assets" xlink:to="lab_Assets"/>
  </link:labelLink>
</link:linkbase>"#;

        let links = parse(xml).expect("parse linkbase");
        let pairs = links[0]
            .relationships(Path::new("labels.xml"), CONCEPT_LABEL_ARCROLE)
            .expect("resolve arcs");
        assert_eq!(pairs.len(), 2);

        let pairs = links[0]
            .relationships(Path::new("labels.xml"), CONCEPT_REFERENCE_ARCROLE)
            .expect("resolve arcs");
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_arc_without_endpoint_rejected() {
        let xml = r#"<link:linkbase xmlns:link="http://www.xbrl.org/2003/linkbase" xmlns:xlink="http://www.w3.org/1999/xlink">
  <link:labelLink xlink:type="extended">
    <link:labelArc xlink:type="arc" xlink:from="Assets"/>
  </link:labelLink>
</link:linkbase>"#;

        assert!(matches!(
            parse(xml),
            Err(TaxonomyError::SchemaError { reason, .. }) if reason == "arc without xlink:to"
        ));
    }

    #[test]
    fn test_resource_without_label_rejected() {
        let xml = r#"<link:linkbase xmlns:link="http://www.xbrl.org/2003/linkbase" xmlns:xlink="http://www.w3.org/1999/xlink">
  <link:labelLink xlink:type="extended">
    <link:label xlink:type="resource" xml:lang="en-US">Assets</link:label>
  </link:labelLink>
</link:linkbase>"#;

        assert!(matches!(
            parse(xml),
            Err(TaxonomyError::SchemaError { reason, .. }) if reason == "resource without xlink:label"
        ));
    }
}
