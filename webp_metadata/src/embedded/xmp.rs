//! XMP packets.
//!
//! XMP is RDF serialized as XML. We don't interpret any schema here.
//! Instead, every property is flattened into a `(path, value)` pair:
//!
//! - simple properties (as attributes or elements) give `dc:format`,
//! - array items (`rdf:Bag`, `rdf:Seq`, `rdf:Alt`) give `dc:subject[1]`,
//!   counting from one,
//! - and struct fields give `xmpMM:DerivedFrom/stRef:documentID`.

use std::sync::Arc;

use webp_metadata_types::{Directory, DirectoryKind, TagValue, tags::xmp};
use xmltree::{AttributeName, Element};

use super::EmbeddedDecoder;

/// The `rdf:` namespace, used by XMP's containers and `rdf:Description`.
const RDF_NAMESPACE: &str = r"http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// The `x:` namespace. It's only used for `x:xmpmeta`.
const X_NAMESPACE: &str = r"adobe:ns:meta/";

/// The `xml:` prefix, used for `xml:lang` qualifiers.
const XML_PREFIX: &str = "xml";

/// This is an error that happened while we were parsing XMP.
#[derive(Clone, Debug)]
pub enum XmpError {
    /// `xmltree` failed to parse the XML.
    XmlParseError(
        // note: `Arc` allows us to impl `Clone`
        Arc<xmltree::ParseError>,
    ),

    /// No `rdf:RDF` element was found.
    NoRdfElement,

    /// We couldn't find any `rdf:Description` elements in the `rdf:RDF`
    /// element.
    NoDescriptionElements,
}

impl core::fmt::Display for XmpError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            XmpError::XmlParseError(e) => {
                write!(f, "Encountered error while parsing XML. err: {e}")
            }
            XmpError::NoRdfElement => {
                f.write_str("The XML is missing the `rdf:RDF` element, which is required.")
            }
            XmpError::NoDescriptionElements => f.write_str(
                "The `rdf:RDF` element has no `rdf:Description` elements. \
                    One or more are required.",
            ),
        }
    }
}

impl core::error::Error for XmpError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            XmpError::XmlParseError(e) => Some(e.as_ref()),
            XmpError::NoRdfElement | XmpError::NoDescriptionElements => None,
        }
    }
}

impl From<xmltree::ParseError> for XmpError {
    fn from(value: xmltree::ParseError) -> Self {
        XmpError::XmlParseError(value.into())
    }
}

/// The built-in XMP decoder.
#[derive(Clone, Copy, Debug, Default)]
pub struct XmpDecoder;

impl EmbeddedDecoder for XmpDecoder {
    fn extract(&self, payload: &[u8], start_offset: usize) -> Vec<Directory> {
        let packet = payload.get(start_offset..).unwrap_or_default();

        let directory = match parse_packet(packet) {
            Ok(properties) => Directory::new(DirectoryKind::Xmp)
                .with(xmp::XMP_VALUE_COUNT, TagValue::Int(properties.len() as i64))
                .with(xmp::XMP_PROPERTIES, TagValue::Pairs(properties)),
            Err(e) => {
                log::error!("Failed to parse XMP! err: {e}");
                Directory::error(DirectoryKind::Xmp, e.to_string())
            }
        };

        vec![directory]
    }
}

/// Parses an XMP packet into flattened `(path, value)` pairs.
///
/// The pairs are in document order.
pub fn parse_packet(packet: &[u8]) -> Result<Vec<(String, String)>, XmpError> {
    // some writers pad the chunk with NULs
    let end = packet.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    let document = Element::parse(&packet[..end])?;

    let descriptions = find_descriptions(&document)?;

    let mut properties = Vec::new();
    for description in descriptions {
        flatten_fields(description, None, &mut properties);
    }

    log::debug!("Found `{}` XMP properties.", properties.len());
    Ok(properties)
}

/// Finds the `rdf:Description` elements, going through `x:xmpmeta` and
/// `rdf:RDF`.
fn find_descriptions(document: &Element) -> Result<Vec<&Element>, XmpError> {
    // the first one is optional: `x:xmpmeta`
    let parent = document
        .get_child("xmpmeta")
        .and_then(|c| match c.namespace.as_deref()? {
            X_NAMESPACE => Some(c),
            other => {
                log::warn!(
                    "Found `xmpmeta` element, but with wrong namespace!
                        - expected: `{X_NAMESPACE}`
                        - got: `{other}`"
                );
                None
            }
        })
        .inspect(|_| log::debug!("Found an `x:xmpmeta` element."))
        .unwrap_or(document);

    // sometimes, the document's "root" is the `rdf:RDF` element
    let rdf = if parent.name == "RDF" {
        Some(parent)
    } else {
        parent.get_child("RDF")
    }
    .filter(|rdf| is_rdf(rdf, "RDF"))
    .ok_or_else(|| {
        log::error!("Couldn't find an `rdf:RDF` element in the document.");
        XmpError::NoRdfElement
    })?;

    let descriptions: Vec<&Element> = child_elements(rdf)
        .filter(|child| is_rdf(child, "Description"))
        .collect();

    if descriptions.is_empty() {
        log::warn!("No `rdf:Description` elements found in the `rdf:RDF` element.");
        return Err(XmpError::NoDescriptionElements);
    }

    Ok(descriptions)
}

/// Flattens the properties of a description (or struct) into `out`.
///
/// Each property's path is `parent/prefix:name`, or just `prefix:name` at
/// the top level.
fn flatten_fields(element: &Element, parent: Option<&str>, out: &mut Vec<(String, String)>) {
    let join = |name: String| match parent {
        Some(parent) => format!("{parent}/{name}"),
        None => name,
    };

    for (key, value) in element.attributes.iter() {
        if !is_field_attribute(key) {
            log::trace!("Skipping `{key}` attribute.");
            continue;
        }
        out.push((join(attribute_name(key)), value.clone()));
    }

    for child in child_elements(element) {
        // nested descriptions are a struct's fields in long form
        if is_rdf(child, "Description") {
            flatten_fields(child, parent, out);
            continue;
        }

        if child.namespace.is_none() {
            log::warn!("Element `{}` has no namespace. Skipping it.", child.name);
            continue;
        }

        flatten_property(child, &join(element_name(child)), out);
    }
}

/// Flattens one property element, which lives at `path`.
fn flatten_property(element: &Element, path: &str, out: &mut Vec<(String, String)>) {
    // arrays hold a `rdf:Bag`, `rdf:Seq`, or `rdf:Alt` of `rdf:li` items
    let array = child_elements(element)
        .find(|c| ["Bag", "Seq", "Alt"].iter().any(|kind| is_rdf(c, kind)));
    if let Some(array) = array {
        let items = child_elements(array).filter(|c| is_rdf(c, "li"));
        for (i, item) in items.enumerate() {
            flatten_value(item, &format!("{path}[{}]", i + 1), out);
        }
        return;
    }

    flatten_value(element, path, out);
}

/// Flattens a value: either simple text, a resource, or a struct.
fn flatten_value(element: &Element, path: &str, out: &mut Vec<(String, String)>) {
    if let Some(resource) = element
        .attributes
        .iter()
        .find(|(key, _)| is_rdf_attribute(key) && key.local_name == "resource")
        .map(|(_, value)| value)
    {
        out.push((path.to_string(), resource.clone()));
        return;
    }

    let is_struct = child_elements(element).next().is_some()
        || element
            .attributes
            .iter()
            .any(|(key, _)| is_field_attribute(key));

    if is_struct {
        flatten_fields(element, Some(path), out);
    } else {
        let text = element.get_text().unwrap_or_default();
        out.push((path.to_string(), text.trim().to_string()));
    }
}

/// Whether `element` is `rdf:<name>`.
fn is_rdf(element: &Element, name: &str) -> bool {
    element.name == name && element.namespace.as_deref() == Some(RDF_NAMESPACE)
}

fn is_rdf_attribute(key: &AttributeName) -> bool {
    key.namespace.as_deref() == Some(RDF_NAMESPACE)
}

/// Attributes other than RDF syntax and `xml:lang` are struct fields (or,
/// on `rdf:Description`, simple properties).
fn is_field_attribute(key: &AttributeName) -> bool {
    !is_rdf_attribute(key) && key.prefix.as_deref() != Some(XML_PREFIX)
}

fn child_elements(element: &Element) -> impl Iterator<Item = &Element> {
    element.children.iter().filter_map(|c| c.as_element())
}

fn element_name(element: &Element) -> String {
    qualified(element.prefix.as_deref(), &element.name)
}

fn attribute_name(key: &AttributeName) -> String {
    qualified(key.prefix.as_deref(), &key.local_name)
}

fn qualified(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}:{name}"),
        None => name.to_string(),
    }
}
