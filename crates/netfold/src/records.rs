//! Record extraction from tool output
//!
//! Tool output consists of one or more root elements whose children are the
//! records. Each record folds on its own, so sibling records never merge
//! into each other the way children of a non-list tag would. Output that
//! prints its records at top level goes through [`wrap_records`] first.

use tracing::debug;

use crate::error::Result;
use crate::fold::{content_container, fold_element, parse_document, ListTags};
use crate::value::Value;

/// Element name [`wrap_records`] puts around root-less output
pub const RECORDS_ROOT: &str = "netfold-records";

/// Fold every record (child of a root element) in document order
///
/// # Errors
///
/// Returns [`crate::Error::MalformedInput`] when the output holds no elements.
pub fn records(markup_text: &str, list_tags: &ListTags) -> Result<Vec<Value>> {
    let document = parse_document(markup_text);
    let container = content_container(&document)?;

    let records: Vec<Value> = container
        .elements()
        .flat_map(|root| root.elements())
        .map(|record| fold_element(record, list_tags).1)
        .collect();

    debug!(count = records.len(), "extracted records");
    Ok(records)
}

/// Fold only the first record, for single-interface lookups
///
/// # Errors
///
/// Returns [`crate::Error::MalformedInput`] when the output holds no elements.
pub fn first_record(markup_text: &str, list_tags: &ListTags) -> Result<Option<Value>> {
    let document = parse_document(markup_text);
    let container = content_container(&document)?;

    let first = container
        .elements()
        .flat_map(|root| root.elements())
        .next()
        .map(|record| fold_element(record, list_tags).1);
    Ok(first)
}

/// Wrap output that prints its records without a root element, so each
/// top-level element becomes one record
pub fn wrap_records(output: &str) -> String {
    format!("<{RECORDS_ROOT}>{output}</{RECORDS_ROOT}>")
}
