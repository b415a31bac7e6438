//! Markup-to-structure conversion
//!
//! Each element folds into a `(key, value)` pair:
//!
//! - `key` is the tag name with every `-` replaced by `_`
//! - a childless element's value is its raw text
//! - a list tag's value is the sequence of its children's values
//! - any other element's value is the merge of its children's pairs, where a
//!   repeated key keeps its first position but takes the *last* value
//! - attributes, when present, are added under [`ATTRS_KEY`]; for list tags
//!   the sequence is wrapped as `{ key: [..], _attrs: {..} }` so attributes
//!   never land inside the list

use std::borrow::Cow;
use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::markup::{self, Content, Document, Element};
use crate::sanitize::sanitize;
use crate::value::{Array, Object, Value};

/// Reserved key holding an element's attributes
pub const ATTRS_KEY: &str = "_attrs";

/// Tag names whose children fold into a sequence instead of a merged object.
///
/// Names are normalized on insertion, so `"ip-address"` and `"ip_address"`
/// designate the same tag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListTags(HashSet<String>);

impl ListTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tag name; returns false if it was already present
    pub fn insert(&mut self, tag: &str) -> bool {
        self.0.insert(normalize_tag(tag).into_owned())
    }

    /// Membership test on a tag name (normalized before lookup)
    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(normalize_tag(tag).as_ref())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ListTags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tags = Self::new();
        tags.extend(iter);
        tags
    }
}

impl<S: AsRef<str>> Extend<S> for ListTags {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for tag in iter {
            self.insert(tag.as_ref());
        }
    }
}

/// Replace hyphens with underscores
pub fn normalize_tag(name: &str) -> Cow<'_, str> {
    if name.contains('-') {
        Cow::Owned(name.replace('-', "_"))
    } else {
        Cow::Borrowed(name)
    }
}

/// Sanitize and parse markup text into a document
pub fn parse_document(markup_text: &str) -> Document {
    let sanitized = sanitize(markup_text);
    markup::parse(&sanitized)
}

/// The element data extraction starts from, or `MalformedInput`
pub fn content_container(document: &Document) -> Result<&Element> {
    document
        .content()
        .ok_or_else(|| Error::malformed("no content container found"))
}

/// Convert markup text into a structure.
///
/// The result is the folded content of the document's content container;
/// the container's own key is not part of it.
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] when the document holds no elements.
#[instrument(level = "debug", skip_all, fields(len = markup_text.len()))]
pub fn convert(markup_text: &str, list_tags: &ListTags) -> Result<Value> {
    let document = parse_document(markup_text);
    let container = content_container(&document)?;
    let (key, value) = fold_element(container, list_tags);
    debug!(container = %key, "folded markup");
    Ok(value)
}

/// Fold one element into its `(key, value)` pair.
///
/// The walk keeps its own stack of partially folded elements, so nesting
/// depth is bounded by memory rather than by the thread's stack.
pub fn fold_element(element: &Element, list_tags: &ListTags) -> (String, Value) {
    let mut current = Frame::new(element);
    let mut parents: Vec<Frame<'_>> = Vec::new();

    loop {
        match current.next_child() {
            Some(child) => parents.push(std::mem::replace(&mut current, Frame::new(child))),
            None => {
                let pair = current.finish(list_tags);
                match parents.pop() {
                    Some(parent) => {
                        current = parent;
                        current.folded.push(pair);
                    }
                    None => return pair,
                }
            }
        }
    }
}

/// An element whose children are being folded
struct Frame<'e> {
    element: &'e Element,
    children: std::slice::Iter<'e, Content>,
    folded: Vec<(String, Value)>,
}

impl<'e> Frame<'e> {
    fn new(element: &'e Element) -> Self {
        Self {
            element,
            children: element.children.iter(),
            folded: Vec::new(),
        }
    }

    fn next_child(&mut self) -> Option<&'e Element> {
        self.children.find_map(|child| match child {
            Content::Element(element) => Some(element),
            Content::Text(_) => None,
        })
    }

    /// Combine the folded children once every child has been visited
    fn finish(self, list_tags: &ListTags) -> (String, Value) {
        let element = self.element;
        let key = normalize_tag(&element.name).into_owned();

        if self.folded.is_empty() {
            return (key, Value::String(element.text()));
        }

        let value = if list_tags.contains(&key) {
            Value::Array(self.folded.into_iter().map(|(_, value)| value).collect::<Array>())
        } else {
            let mut merged = Object::new();
            for (child_key, child_value) in self.folded {
                merged.insert(child_key, child_value);
            }
            Value::Object(merged)
        };

        if element.attributes.is_empty() {
            return (key, value);
        }

        let attrs: Object = element
            .attributes
            .iter()
            .map(|(name, attr)| (name.clone(), Value::from(attr.as_str())))
            .collect();

        let value = match value {
            Value::Object(mut merged) => {
                merged.insert(ATTRS_KEY, attrs);
                Value::Object(merged)
            }
            list => {
                let mut wrapper = Object::single(key.clone(), list);
                wrapper.insert(ATTRS_KEY, attrs);
                Value::Object(wrapper)
            }
        };

        (key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(pairs: &[(&str, Value)]) -> Value {
        Value::Object(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
        )
    }

    fn s(text: &str) -> Value {
        Value::from(text)
    }

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag("link-type"), "link_type");
        assert_eq!(normalize_tag("a-b-c"), "a_b_c");
        assert!(matches!(normalize_tag("name"), Cow::Borrowed("name")));
    }

    #[test]
    fn test_list_tags_normalized() {
        let tags: ListTags = ["ip-address", "items"].into_iter().collect();
        assert!(tags.contains("ip_address"));
        assert!(tags.contains("ip-address"));
        assert!(!tags.contains("item"));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_leaf() -> Result<()> {
        let value = convert("<foo>bar</foo>", &ListTags::new())?;
        assert_eq!(value, object(&[("foo", s("bar"))]));
        Ok(())
    }

    #[test]
    fn test_empty_leaf_is_empty_string() -> Result<()> {
        let value = convert("<a><b></b></a>", &ListTags::new())?;
        assert_eq!(value, object(&[("a", object(&[("b", s(""))]))]));
        Ok(())
    }

    #[test]
    fn test_hyphenated_keys() -> Result<()> {
        let value = convert("<link-info><mtu>1500</mtu></link-info>", &ListTags::new())?;
        assert_eq!(value.pointer(["link_info", "mtu"]), Some(&s("1500")));
        Ok(())
    }

    #[test]
    fn test_list_with_attributes_wraps_list() -> Result<()> {
        let tags: ListTags = ["items"].into_iter().collect();
        let value = convert(
            r#"<items kind="a"><e>x</e><e>y</e></items>"#,
            &tags,
        )?;
        let expected = object(&[(
            "items",
            object(&[
                ("items", Value::from(vec![s("x"), s("y")])),
                (ATTRS_KEY, object(&[("kind", s("a"))])),
            ]),
        )]);
        assert_eq!(value, expected);
        Ok(())
    }

    #[test]
    fn test_leaf_attributes_dropped() -> Result<()> {
        let value = convert(r#"<a><b id="1">x</b></a>"#, &ListTags::new())?;
        assert_eq!(value, object(&[("a", object(&[("b", s("x"))]))]));
        Ok(())
    }

    #[test]
    fn test_mixed_text_ignored_for_parents() -> Result<()> {
        let value = convert("<a>\n  <b>1</b>\n  stray\n</a>", &ListTags::new())?;
        assert_eq!(value, object(&[("a", object(&[("b", s("1"))]))]));
        Ok(())
    }

    #[test]
    fn test_empty_self_closing_removed_before_fold() -> Result<()> {
        let value = convert("<a><up/><b>1</b></a>", &ListTags::new())?;
        assert_eq!(value, object(&[("a", object(&[("b", s("1"))]))]));
        Ok(())
    }

    #[test]
    fn test_explicit_body_container() -> Result<()> {
        let value = convert(
            "<html><head></head><body><a>1</a></body></html>",
            &ListTags::new(),
        )?;
        assert_eq!(value, object(&[("a", s("1"))]));
        Ok(())
    }

    #[test]
    fn test_deep_nesting_folds() -> Result<()> {
        const DEPTH: usize = 10_000;
        let markup = format!("{}x{}", "<a-b>".repeat(DEPTH), "</a-b>".repeat(DEPTH));
        let value = convert(&markup, &ListTags::new())?;

        let mut level = &value;
        for _ in 1..DEPTH {
            level = level.as_object().and_then(|o| o.get("a_b")).ok_or_else(|| {
                Error::malformed("nesting lost")
            })?;
        }
        assert_eq!(level.as_object().and_then(|o| o.get("a_b")), Some(&s("x")));
        Ok(())
    }

    #[test]
    fn test_deep_list_nesting_folds() -> Result<()> {
        const DEPTH: usize = 10_000;
        let tags: ListTags = ["l"].into_iter().collect();
        let markup = format!("{}x{}", "<l>".repeat(DEPTH), "</l>".repeat(DEPTH));
        let value = convert(&markup, &tags)?;
        assert!(value.pointer(["l"]).is_some_and(Value::is_array));
        Ok(())
    }

    #[test]
    fn test_no_container_is_malformed() {
        for input in ["", "   ", "plain text", "<!-- only a comment -->", "<a/>"] {
            let result = convert(input, &ListTags::new());
            assert!(
                matches!(result, Err(Error::MalformedInput(_))),
                "input: {input:?}"
            );
        }
    }
}
