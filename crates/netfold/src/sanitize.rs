//! Removal of empty self-closing tags
//!
//! The upstream tool emits bare `<name/>` tags that trip up markup parsing
//! and carry no data. They are removed in a single left-to-right pass before
//! parsing; text that only becomes an empty tag after a removal is left
//! alone.

use std::borrow::Cow;

use tracing::debug;

use crate::markup::cursor::{is_name_char, is_name_start, is_whitespace};

/// Remove every `<name/>` occurrence from `input`.
///
/// Only attribute-less tags match; whitespace is allowed between the name
/// and `/>`. Returns the input unchanged (borrowed) when nothing matched.
pub fn sanitize(input: &str) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    let mut output: Option<String> = None;
    let mut copied = 0;
    let mut pos = 0;
    let mut removed = 0usize;

    while let Some(offset) = bytes
        .get(pos..)
        .and_then(|rest| rest.iter().position(|&b| b == b'<'))
    {
        let start = pos + offset;
        match bytes.get(start..).and_then(empty_tag_len) {
            Some(len) => {
                let buf = output.get_or_insert_with(|| String::with_capacity(input.len()));
                buf.push_str(input.get(copied..start).unwrap_or_default());
                pos = start + len;
                copied = pos;
                removed += 1;
            }
            None => pos = start + 1,
        }
    }

    match output {
        Some(mut buf) => {
            buf.push_str(input.get(copied..).unwrap_or_default());
            debug!(removed, "stripped empty self-closing tags");
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(input),
    }
}

/// Length of the `<name/>` tag at the start of `bytes`, if there is one
fn empty_tag_len(bytes: &[u8]) -> Option<usize> {
    let mut iter = bytes.iter().copied().enumerate().skip(1);
    let (_, first) = iter.next()?;
    if !is_name_start(first) {
        return None;
    }

    let mut seen_space = false;
    for (index, b) in iter {
        match b {
            b'/' => return (bytes.get(index + 1) == Some(&b'>')).then_some(index + 2),
            b if is_whitespace(b) => seen_space = true,
            b if is_name_char(b) && !seen_space => {}
            _ => return None,
        }
    }
    None
}
