//! Minimal element tree for KML documents.
//!
//! Text is stored raw and escaped only when the tree is serialized.

use crate::error::ExportError;
use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

pub const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: &'static str,
    attributes: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// An element holding a single text node.
    pub fn text(name: &'static str, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.children.push(Node::Text(text.into()));
        element
    }

    #[must_use]
    pub fn attr(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((key, value.into()));
        self
    }

    #[must_use]
    pub fn child(mut self, child: Element) -> Self {
        self.push(child);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// First child element named `name`.
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    /// Concatenated text of the direct text children.
    pub fn inner_text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }
}

/// Serializes a complete UTF-8 KML document rooted at `root`.
pub fn to_xml_bytes(root: &Element) -> Result<Vec<u8>, ExportError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, root)?;
    Ok(writer.into_inner())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), ExportError> {
    let mut start = BytesStart::new(element.name);
    for (key, value) in &element.attributes {
        // Attribute values are escaped by quick-xml
        start.push_attribute((*key, value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for node in &element.children {
        match node {
            Node::Element(child) => write_element(writer, child)?,
            Node::Text(text) => {
                writer.write_event(Event::Text(BytesText::from_escaped(escape(text.as_str()))))?;
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_predefined_entities() {
        let root = Element::new("kml")
            .attr("xmlns", KML_NAMESPACE)
            .child(Element::text("name", r#"Tom & Jerry's <"cell">"#));
        let xml = String::from_utf8(to_xml_bytes(&root).unwrap()).unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<kml xmlns="http://www.opengis.net/kml/2.2">"#));
        assert!(xml.contains("<name>Tom &amp; Jerry&apos;s &lt;&quot;cell&quot;&gt;</name>"));
    }

    #[test]
    fn childless_elements_are_empty_tags() {
        let root = Element::new("Folder").child(Element::new("Document"));
        let xml = String::from_utf8(to_xml_bytes(&root).unwrap()).unwrap();
        assert!(xml.contains("<Document/>"));
        assert!(xml.trim_end().ends_with("</Folder>"));
    }

    #[test]
    fn tree_navigation() {
        let root = Element::new("Placemark")
            .child(Element::text("name", "a"))
            .child(Element::new("Point"));
        assert_eq!(root.find("name").unwrap().inner_text(), "a");
        assert_eq!(root.elements().count(), 2);
        assert!(root.find("Polygon").is_none());
    }
}
