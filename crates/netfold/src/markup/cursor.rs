//! Byte cursor for navigating markup text

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Cursor over the bytes of a `&str` with line/column tracking.
///
/// Every slice handed out ends on an ASCII delimiter or at end of input, so
/// slices always fall on `char` boundaries.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
    line: u32,
    col: u32,
}

impl<'a> Cursor<'a> {
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Get current byte without consuming
    pub fn current(&self) -> Option<u8> {
        self.peek(0)
    }

    /// Peek at byte ahead without consuming
    pub fn peek(&self, ahead: usize) -> Option<u8> {
        self.input
            .as_bytes()
            .get(self.pos.saturating_add(ahead))
            .copied()
    }

    /// True if the unconsumed input starts with `pattern`
    pub fn starts_with(&self, pattern: &str) -> bool {
        self.remaining().starts_with(pattern)
    }

    pub fn advance(&mut self) {
        if let Some(b) = self.current() {
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
                self.col = 1;
            } else if !is_continuation_byte(b) {
                self.col += 1;
            }
        }
    }

    pub fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            self.advance();
        }
    }

    /// Advance while `pred` holds for the current byte
    pub fn advance_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.current().is_some_and(&pred) {
            self.advance();
        }
    }

    pub fn skip_whitespace(&mut self) {
        self.advance_while(is_whitespace);
    }

    /// Consume byte if it matches
    pub fn consume(&mut self, expected: u8) -> bool {
        if self.current() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Advance past the next occurrence of `pattern`.
    ///
    /// Returns the text skipped over (excluding the pattern), or `None` with
    /// the cursor at end of input when the pattern never occurs.
    pub fn take_until(&mut self, pattern: &str) -> Option<&'a str> {
        let start = self.pos;
        match self.remaining().find(pattern) {
            Some(offset) => {
                self.advance_by(offset);
                let taken = self.slice_from(start);
                self.advance_by(pattern.len());
                Some(taken)
            }
            None => {
                self.advance_by(self.input.len().saturating_sub(self.pos));
                None
            }
        }
    }

    pub const fn position(&self) -> Pos {
        Pos {
            offset: self.pos,
            line: self.line,
            col: self.col,
        }
    }

    pub const fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn remaining(&self) -> &'a str {
        self.input.get(self.pos..).unwrap_or_default()
    }

    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Get slice from start to current position
    pub fn slice_from(&self, start: usize) -> &'a str {
        self.input.get(start..self.pos).unwrap_or_default()
    }
}

pub(crate) const fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

/// Tag names may contain any non-ASCII byte, so multi-byte names are kept whole.
pub(crate) const fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

pub(crate) const fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

const fn is_continuation_byte(b: u8) -> bool {
    b & 0xC0 == 0x80
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_basic() {
        let mut cursor = Cursor::new("hello");
        assert_eq!(cursor.current(), Some(b'h'));
        assert_eq!(cursor.peek(1), Some(b'e'));
        cursor.advance();
        assert_eq!(cursor.current(), Some(b'e'));
    }

    #[test]
    fn test_cursor_whitespace() {
        let mut cursor = Cursor::new("  \t\nhello");
        cursor.skip_whitespace();
        assert_eq!(cursor.current(), Some(b'h'));
        assert_eq!(cursor.position().line, 2);
        assert_eq!(cursor.position().col, 1);
    }

    #[test]
    fn test_cursor_take_until() {
        let mut cursor = Cursor::new("comment -->rest");
        assert_eq!(cursor.take_until("-->"), Some("comment "));
        assert_eq!(cursor.remaining(), "rest");

        assert_eq!(cursor.take_until("-->"), None);
        assert!(cursor.is_eof());
    }

    #[test]
    fn test_cursor_columns_count_chars() {
        let mut cursor = Cursor::new("äb");
        cursor.advance_by(2);
        assert_eq!(cursor.current(), Some(b'b'));
        assert_eq!(cursor.position().col, 2);
    }

    #[test]
    fn test_cursor_slice() {
        let mut cursor = Cursor::new("hello world");
        let start = cursor.pos();
        cursor.advance_while(|b| b != b' ');
        assert_eq!(cursor.slice_from(start), "hello");
        assert!(cursor.consume(b' '));
        assert!(cursor.starts_with("world"));
    }
}
