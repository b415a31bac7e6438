//! netfold - fold network-configuration markup into plain structures
//!
//! The tool this crate wraps prints XML-ish output that strict parsers
//! reject. netfold strips the empty `<name/>` tags that break parsing, parses
//! the rest leniently, and folds the element tree into nested key/value
//! [`Value`]s.
//!
//! # Quick Start
//!
//! ```
//! use netfold::{convert, ListTags};
//! # fn main() -> Result<(), netfold::Error> {
//! let tags: ListTags = ["addresses"].into_iter().collect();
//! let value = convert(
//!     "<interface id=\"2\"><name>eth0</name><addresses><ip>10.0.0.1</ip><ip>10.0.0.2</ip></addresses><up/></interface>",
//!     &tags,
//! )?;
//! let name = value
//!     .pointer(["interface", "name"])
//!     .and_then(|v| v.as_string())
//!     .unwrap_or_default();
//! assert_eq!(name, "eth0");
//!
//! let addresses = value
//!     .pointer(["interface", "addresses"])
//!     .and_then(|v| v.as_array())
//!     .map(|a| a.len());
//! assert_eq!(addresses, Some(2));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, Result};

pub mod value;
pub use value::{Array, Object, Value};

pub mod markup;
pub use markup::{Content as MarkupContent, Document, Element, Parser as MarkupParser};

pub mod sanitize;
pub use sanitize::sanitize;

pub mod fold;
pub use fold::{convert, fold_element, normalize_tag, ListTags, ATTRS_KEY};

pub mod records;
pub use records::{first_record, records, wrap_records};

pub mod config;
pub use config::ToolConfig;

pub mod tool;
pub use tool::{Invocation, Runner, SystemRunner, Tool};

/// Convert with list tags given as plain names
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] when the text holds no elements.
pub fn convert_with_tags<I, S>(markup_text: &str, list_tags: I) -> Result<Value>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let tags: ListTags = list_tags.into_iter().collect();
    convert(markup_text, &tags)
}
