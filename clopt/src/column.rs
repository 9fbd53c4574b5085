//! Column-tracking writer used to lay out the help screen.

use std::io::{self, Write};
use std::ops::Range;

use unicode_width::UnicodeWidthStr;

/// The C `isspace` set.
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Locate the next whitespace-separated word at or after byte `start`.
///
/// Returns an empty range positioned at the end of `text` when no word
/// remains.
pub fn find_word(text: &str, start: usize) -> Range<usize> {
    let bytes = text.as_bytes();
    let mut begin = start.min(bytes.len());
    while begin < bytes.len() && is_space(bytes[begin]) {
        begin += 1;
    }
    let mut end = begin;
    while end < bytes.len() && !is_space(bytes[end]) {
        end += 1;
    }
    begin..end
}

/// Writer that knows which screen column the cursor is on.
///
/// Text passed to `write_str` must not contain line breaks; use `newline`.
pub struct ColumnWriter<W> {
    out: W,
    column: usize,
}

impl<W: Write> ColumnWriter<W> {
    pub fn new(out: W) -> Self {
        ColumnWriter { out, column: 0 }
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Pad with spaces up to `target`, starting a new line first when the
    /// cursor is already past it (or exactly on it, with `force_newline`).
    pub fn advance_to(&mut self, target: usize, force_newline: bool) -> io::Result<()> {
        if self.column > target || (force_newline && self.column == target) {
            self.newline()?;
        }
        if self.column < target {
            write!(self.out, "{:width$}", "", width = target - self.column)?;
            self.column = target;
        }
        Ok(())
    }

    pub fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.column += text.width();
        Ok(())
    }

    pub fn newline(&mut self) -> io::Result<()> {
        self.out.write_all(b"\n")?;
        self.column = 0;
        Ok(())
    }

    /// Print `text` word by word starting at `indent`, breaking lines so that
    /// no word is appended once it would reach `wrap`. The first word of each
    /// line is always printed.
    pub fn write_wrapped(&mut self, text: &str, indent: usize, wrap: usize) -> io::Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.advance_to(indent, true)?;

        let mut word = find_word(text, 0);
        while !word.is_empty() {
            self.write_str(&text[word.clone()])?;
            word = find_word(text, word.end);

            while !word.is_empty() && self.column + 1 + text[word.clone()].width() < wrap {
                self.write_str(" ")?;
                self.write_str(&text[word.clone()])?;
                word = find_word(text, word.end);
            }

            if !word.is_empty() {
                self.advance_to(indent, true)?;
            }
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
