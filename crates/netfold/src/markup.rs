//! Lenient markup parsing

pub mod cursor;
pub mod model;
pub mod parser;

pub use cursor::Pos;
pub use model::{Content, Document, Element, DOCUMENT_ROOT};
pub use parser::{decode_entities, Parser};

/// Parse markup text into a document, repairing malformed input
pub fn parse(input: &str) -> Document {
    Parser::new(input).parse()
}
