//! Error-tolerant markup parser
//!
//! The parser never fails. Malformed input is repaired with the following
//! rules:
//!
//! - text outside any element belongs to the implicit document root
//! - comments, processing instructions and `<!...>` declarations are skipped;
//!   `<![CDATA[...]]>` contributes its raw text
//! - a `<` that cannot start a tag is literal text
//! - attributes may be double-quoted, single-quoted, unquoted or valueless
//!   (value `""`); the first of several same-named attributes wins
//! - a closing tag for an open ancestor closes everything opened after it
//! - a closing tag matching no open element is ignored
//! - end of input closes every open element; a tag or comment cut off by end
//!   of input is dropped
//! - unknown entities are left as written

use std::borrow::Cow;

use indexmap::IndexMap;
use tracing::trace;

use super::cursor::{is_name_char, is_name_start, is_whitespace, Cursor};
use super::model::{Content, Document, Element, DOCUMENT_ROOT};

/// Longest entity body (between `&` and `;`) worth decoding
const MAX_ENTITY_LEN: usize = 10;

/// Lenient markup parser
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    root: Element,
    open: Vec<Element>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            cursor: Cursor::new(input),
            root: Element::new(DOCUMENT_ROOT),
            open: Vec::new(),
        }
    }

    /// Parse the whole input into a document
    pub fn parse(mut self) -> Document {
        while !self.cursor.is_eof() {
            if self.cursor.current() == Some(b'<') {
                self.parse_markup();
            } else {
                self.parse_text();
            }
        }

        while !self.open.is_empty() {
            self.close_top();
        }
        Document { root: self.root }
    }

    fn parse_markup(&mut self) {
        match self.cursor.peek(1) {
            Some(b'/') => self.parse_closing_tag(),
            Some(b'!') => self.parse_bang(),
            Some(b'?') => {
                self.cursor.advance_by(2);
                if self.cursor.take_until("?>").is_none() {
                    trace!("unterminated processing instruction dropped");
                }
            }
            Some(b) if is_name_start(b) => self.parse_opening_tag(),
            _ => {
                self.cursor.advance();
                self.top().push_text("<");
            }
        }
    }

    fn parse_bang(&mut self) {
        if self.cursor.starts_with("<!--") {
            self.cursor.advance_by(4);
            if self.cursor.take_until("-->").is_none() {
                trace!("unterminated comment dropped");
            }
        } else if self.cursor.starts_with("<![CDATA[") {
            self.cursor.advance_by(9);
            let start = self.cursor.pos();
            let text = match self.cursor.take_until("]]>") {
                Some(text) => text,
                None => self.cursor.slice_from(start),
            };
            self.top().push_text(text);
        } else {
            self.cursor.advance_by(2);
            self.cursor.take_until(">");
        }
    }

    fn parse_opening_tag(&mut self) {
        let at = self.cursor.position();
        self.cursor.advance();
        let name = self.parse_name();
        let mut attributes = IndexMap::new();

        loop {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                None => {
                    trace!(%at, tag = name, "tag cut off by end of input");
                    return;
                }
                Some(b'>') => {
                    self.cursor.advance();
                    self.open.push(Element {
                        name: name.to_string(),
                        attributes,
                        children: Vec::new(),
                    });
                    return;
                }
                Some(b'/') if self.cursor.peek(1) == Some(b'>') => {
                    self.cursor.advance_by(2);
                    let element = Element {
                        name: name.to_string(),
                        attributes,
                        children: Vec::new(),
                    };
                    self.top().children.push(Content::Element(element));
                    return;
                }
                Some(_) => {
                    let Some((key, value)) = self.parse_attribute() else {
                        trace!(%at, tag = name, "tag cut off by end of input");
                        return;
                    };
                    if let Some(key) = key {
                        attributes.entry(key).or_insert(value);
                    }
                }
            }
        }
    }

    /// Parse one attribute. The outer `None` means end of input was reached
    /// inside a quoted value; a `None` key means a stray byte was skipped.
    fn parse_attribute(&mut self) -> Option<(Option<String>, String)> {
        let start = self.cursor.pos();
        self.cursor.advance_while(|b| {
            !is_whitespace(b) && !matches!(b, b'=' | b'>' | b'/' | b'"' | b'\'')
        });
        let key = self.cursor.slice_from(start);
        if key.is_empty() {
            self.cursor.advance();
            return Some((None, String::new()));
        }

        self.cursor.skip_whitespace();
        if !self.cursor.consume(b'=') {
            return Some((Some(key.to_string()), String::new()));
        }
        self.cursor.skip_whitespace();

        let value = match self.cursor.current() {
            Some(quote @ (b'"' | b'\'')) => {
                self.cursor.advance();
                let closing = if quote == b'"' { "\"" } else { "'" };
                self.cursor.take_until(closing)?
            }
            _ => {
                let start = self.cursor.pos();
                self.cursor
                    .advance_while(|b| !is_whitespace(b) && b != b'>');
                self.cursor.slice_from(start)
            }
        };

        Some((Some(key.to_string()), decode_entities(value).into_owned()))
    }

    fn parse_closing_tag(&mut self) {
        let at = self.cursor.position();
        self.cursor.advance_by(2);
        let name = self.parse_name();
        if self.cursor.take_until(">").is_none() {
            trace!(%at, tag = name, "closing tag cut off by end of input");
            return;
        }

        match self.open.iter().rposition(|element| element.name == name) {
            Some(index) => {
                while self.open.len() > index {
                    self.close_top();
                }
            }
            None => trace!(%at, tag = name, "stray closing tag ignored"),
        }
    }

    fn parse_text(&mut self) {
        let start = self.cursor.pos();
        self.cursor.advance_while(|b| b != b'<');
        let text = decode_entities(self.cursor.slice_from(start));
        self.top().push_text(&text);
    }

    fn parse_name(&mut self) -> &'a str {
        let start = self.cursor.pos();
        self.cursor.advance_while(is_name_char);
        self.cursor.slice_from(start)
    }

    /// Pop the innermost open element into its parent
    fn close_top(&mut self) {
        if let Some(element) = self.open.pop() {
            self.top().children.push(Content::Element(element));
        }
    }

    /// Innermost open element, or the implicit root
    fn top(&mut self) -> &mut Element {
        self.open.last_mut().unwrap_or(&mut self.root)
    }
}

/// Decode the predefined and numeric character references in `input`
pub fn decode_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        let (before, tail) = rest.split_at(amp);
        result.push_str(before);
        let after = tail.strip_prefix('&').unwrap_or(tail);

        let decoded = after
            .find(';')
            .filter(|&end| end <= MAX_ENTITY_LEN)
            .and_then(|end| {
                let (entity, remainder) = after.split_at(end);
                decode_entity(entity).map(|ch| (ch, remainder))
            });

        match decoded {
            Some((ch, remainder)) => {
                result.push(ch);
                rest = remainder.strip_prefix(';').unwrap_or(remainder);
            }
            None => {
                result.push('&');
                rest = after;
            }
        }
    }
    result.push_str(rest);

    Cow::Owned(result)
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                None
            }
        }
    }
}
