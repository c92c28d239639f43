//! A character-level cursor over source text.

use std::ops::Range;

/// A cheap, cloneable cursor over a string slice.
///
/// The cursor always sits on a UTF-8 character boundary. All offsets handed
/// out and accepted by this type are byte offsets into the scanned string.
#[derive(Clone, Debug)]
pub struct Scanner<'s> {
    /// The string to scan.
    string: &'s str,
    /// The current byte offset.
    cursor: usize,
}

impl<'s> Scanner<'s> {
    /// Creates a new scanner starting at the beginning of the string.
    #[inline]
    #[must_use]
    pub fn new(string: &'s str) -> Self {
        Self { string, cursor: 0 }
    }

    /// The current byte offset.
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The character at the cursor, if any.
    #[inline]
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.string[self.cursor..].chars().next()
    }

    /// Whether the character at the cursor satisfies the predicate.
    ///
    /// Returns `false` at the end of the string.
    #[inline]
    pub fn at(&self, pred: impl Fn(char) -> bool) -> bool {
        self.peek().is_some_and(pred)
    }

    /// Consumes and returns the character at the cursor.
    #[inline]
    pub fn eat(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += c.len_utf8();
        Some(c)
    }

    /// Consumes the character at the cursor if it equals `c`.
    #[inline]
    pub fn eat_if(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.cursor += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consumes characters while the predicate holds.
    pub fn eat_while(&mut self, mut pred: impl FnMut(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.cursor += c.len_utf8();
        }
    }

    /// Consumes characters until the predicate holds.
    ///
    /// The character that satisfied the predicate is not consumed.
    pub fn eat_until(&mut self, mut pred: impl FnMut(char) -> bool) {
        self.eat_while(|c| !pred(c));
    }

    /// The text in the given byte range.
    ///
    /// # Panics
    /// Panics if the range is out of bounds or not on character boundaries.
    #[inline]
    #[must_use]
    pub fn get(&self, range: Range<usize>) -> &'s str {
        &self.string[range]
    }

    /// The text from the given offset up to the cursor.
    #[inline]
    #[must_use]
    pub fn from(&self, start: usize) -> &'s str {
        self.get(start..self.cursor)
    }
}
