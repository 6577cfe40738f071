//! The element model the checks read from.
//!
//! A [`Document`] is a flat, document-ordered list of [`Element`]s. It is
//! normally produced by parsing HTML with html5ever, but can also be built by
//! hand for callers that already hold a parsed tree.

pub(crate) mod style;
pub(crate) mod utils;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{NodeData, RcDom};
use serde::Serialize;

pub use self::style::{is_bold, resolve_font_size, FontSize, InlineStyle};
use self::utils::{is_void_element, walk_dom, NodeExt};
use crate::LoadError;

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    index: usize,
    tag_name: String,
    attributes: Vec<(String, String)>,
    style: InlineStyle,
    own_text: String,
    text: String,
}

impl Element {
    pub fn new(tag_name: &str) -> Self {
        Self {
            index: 0,
            tag_name: tag_name.to_ascii_lowercase(),
            attributes: Vec::new(),
            style: InlineStyle::default(),
            own_text: String::new(),
            text: String::new(),
        }
    }

    /// Sets an attribute, replacing an earlier value with the same name.
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        let name = name.to_ascii_lowercase();
        if name == "style" {
            self.style = InlineStyle::parse(value);
        }
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = value.to_string(),
            None => self.attributes.push((name, value.to_string())),
        }
        self
    }

    /// Sets both the element's own text and its full text content.
    pub fn with_text(mut self, text: &str) -> Self {
        self.own_text = utils::collapse_whitespace(text);
        self.text = self.own_text.clone();
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn style(&self) -> &InlineStyle {
        &self.style
    }

    /// Text from the element's direct text children, whitespace-collapsed.
    pub fn own_text(&self) -> &str {
        &self.own_text
    }

    /// All descendant text, whitespace-collapsed.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_text_bearing(&self) -> bool {
        !is_void_element(&self.tag_name) && !self.text.is_empty()
    }

    /// The start tag as it would appear in source, e.g. `<img src="x.png">`.
    pub fn source(&self) -> String {
        let attrs: String = self
            .attributes
            .iter()
            .map(|(name, value)| format!(" {}=\"{}\"", name, value))
            .collect();
        format!("<{}{}>", self.tag_name, attrs)
    }

    pub fn reference(&self) -> ElementRef {
        ElementRef {
            index: self.index,
            tag_name: self.tag_name.clone(),
            source: self.source(),
        }
    }
}

/// A lightweight pointer from a finding back to the element it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementRef {
    pub index: usize,
    pub tag_name: String,
    pub source: String,
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Vec<Element>,
}

impl Document {
    /// Builds a document from elements already in document order.
    pub fn from_elements(elements: Vec<Element>) -> Self {
        let elements = elements
            .into_iter()
            .enumerate()
            .map(|(index, mut element)| {
                element.index = index;
                element
            })
            .collect();
        Self { elements }
    }

    pub fn parse(html: &str) -> Result<Self, LoadError> {
        let dom = parse_document(RcDom::default(), ParseOpts::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())
            .map_err(|e| LoadError::Parse(e.to_string()))?;

        Ok(Self::from_dom(&dom))
    }

    fn from_dom(dom: &RcDom) -> Self {
        let mut elements = Vec::new();

        walk_dom(&dom.document, |node| {
            if let NodeData::Element { .. } = node.data {
                let Some(tag_name) = node.get_tag_name() else {
                    return;
                };
                let mut element = Element::new(&tag_name);
                for (name, value) in node.get_attributes() {
                    element = element.with_attr(&name, &value);
                }
                element.own_text = node.get_own_text();
                element.text = node.get_text_content();
                elements.push(element);
            }
        });

        Self::from_elements(elements)
    }

    /// The elements whose index is not in `skipped`, indices unchanged.
    pub(crate) fn without(&self, skipped: &[usize]) -> Self {
        let elements = self
            .elements
            .iter()
            .filter(|e| !skipped.contains(&e.index))
            .cloned()
            .collect();
        Self { elements }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn find_by_tag<'a>(&'a self, tag_name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements
            .iter()
            .filter(move |e| e.tag_name.eq_ignore_ascii_case(tag_name))
    }
}
