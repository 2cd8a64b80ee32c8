use std::fmt;

use serde::Serialize;

/// Zero-based line/character pair. `character` counts UTF-16 code units, which is
/// what editors speak over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.character + 1)
    }
}

/// Half-open `[start, end)` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn on_line(line: u32, start: u32, end: u32) -> Self {
        Self {
            start: Position::new(line, start),
            end: Position::new(line, end),
        }
    }

    /// Range covering the whole of `text`, which is line `line` of a document.
    pub fn whole_line(line: u32, text: &str) -> Self {
        Self::on_line(line, 0, utf16_len(text))
    }

    /// Range of the byte span `start..end` of `text`, which is line `line`.
    pub fn of_bytes(line: u32, text: &str, start: usize, end: usize) -> Self {
        Self::on_line(line, utf16_col(text, start), utf16_col(text, end))
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(f, "{}-{}", self.start, self.end.character + 1)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

pub(crate) fn utf16_len(text: &str) -> u32 {
    text.encode_utf16().count() as u32
}

/// UTF-16 column of byte offset `byte` within `line`.
pub(crate) fn utf16_col(line: &str, byte: usize) -> u32 {
    let byte = byte.min(line.len());
    if line.is_ascii() {
        return byte as u32;
    }
    line.get(..byte).map(utf16_len).unwrap_or_else(|| utf16_len(line))
}

/// Byte offset within `line` of UTF-16 column `col`, clamped to the end of the line.
pub(crate) fn byte_of_utf16(line: &str, col: u32) -> usize {
    if line.is_ascii() {
        return (col as usize).min(line.len());
    }
    let target = col as usize;
    let mut seen = 0usize;
    for (idx, ch) in line.char_indices() {
        if seen >= target {
            return idx;
        }
        seen += ch.len_utf16();
    }
    line.len()
}

/// Splits document text into lines the way editors number them: `\n` and `\r\n`
/// both terminate a line, and a trailing newline yields a final empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l)).collect()
}
