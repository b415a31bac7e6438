//! Markup data model

use indexmap::IndexMap;

/// Name given to the implicit element wrapping everything in a document
pub const DOCUMENT_ROOT: &str = "#document";

/// Parsed markup document
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub root: Element,
}

/// Markup element
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Content>,
}

/// Markup content node
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Content {
    Element(Element),
    Text(String),
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Child elements in document order, skipping text
    pub fn elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|child| match child {
            Content::Element(element) => Some(element),
            Content::Text(_) => None,
        })
    }

    pub fn has_elements(&self) -> bool {
        self.elements().next().is_some()
    }

    /// First child element with the given name (ASCII case-insensitive)
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.elements()
            .find(|element| element.name.eq_ignore_ascii_case(name))
    }

    /// Concatenated raw text of the direct text children
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                Content::Text(text) => Some(text.as_str()),
                Content::Element(_) => None,
            })
            .collect()
    }

    /// Append text, joining it onto a trailing text node if there is one
    pub(crate) fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.children.last_mut() {
            Some(Content::Text(existing)) => existing.push_str(text),
            _ => self.children.push(Content::Text(text.to_string())),
        }
    }
}

impl Drop for Element {
    // Descendants are moved onto a work list first, so dropping a deeply
    // nested tree does not recurse.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(child) = pending.pop() {
            if let Content::Element(mut element) = child {
                pending.append(&mut element.children);
            }
        }
    }
}

impl Document {
    /// The element data extraction starts from.
    ///
    /// An explicit `body` (at top level or inside a top-level `html`) wins,
    /// otherwise the implicit document root is used. Returns `None` when that
    /// element holds no child elements at all.
    pub fn content(&self) -> Option<&Element> {
        let container = self
            .root
            .child("body")
            .or_else(|| self.root.child("html").and_then(|html| html.child("body")))
            .unwrap_or(&self.root);

        container.has_elements().then_some(container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, text: &str) -> Element {
        let mut element = Element::new(name);
        element.push_text(text);
        element
    }

    #[test]
    fn test_text_concatenates_direct_text() {
        let mut element = Element::new("name");
        element.push_text("eth");
        element.children.push(Content::Element(Element::new("b")));
        element.push_text("0");
        assert_eq!(element.text(), "eth0");
        assert_eq!(element.children.len(), 3);
    }

    #[test]
    fn test_push_text_merges_adjacent() {
        let mut element = Element::new("a");
        element.push_text("x");
        element.push_text("y");
        element.push_text("");
        assert_eq!(element.children, vec![Content::Text("xy".to_string())]);
    }

    #[test]
    fn test_content_prefers_body() {
        let mut body = Element::new("BODY");
        body.children.push(Content::Element(leaf("foo", "bar")));
        let mut html = Element::new("html");
        html.children.push(Content::Element(body.clone()));
        let mut root = Element::new(DOCUMENT_ROOT);
        root.children.push(Content::Element(html));

        let doc = Document { root };
        assert_eq!(doc.content(), Some(&body));
    }

    #[test]
    fn test_content_falls_back_to_root() {
        let mut root = Element::new(DOCUMENT_ROOT);
        root.children.push(Content::Element(leaf("foo", "bar")));
        let doc = Document { root };
        assert_eq!(doc.content().map(|e| e.name.as_str()), Some(DOCUMENT_ROOT));
    }

    #[test]
    fn test_drop_deep_tree() {
        let mut element = Element::new("leaf");
        for _ in 0..100_000 {
            let mut parent = Element::new("a");
            parent.children.push(Content::Element(element));
            element = parent;
        }
        drop(element);
    }

    #[test]
    fn test_content_requires_elements() {
        let mut root = Element::new(DOCUMENT_ROOT);
        root.push_text("just text");
        assert_eq!(Document { root }.content(), None);
    }
}
