//! Rope bookkeeping for incremental document sync.
//!
//! The rope is built without ropey's `unicode_lines` and `cr_lines`, so it only
//! breaks lines on `\n` (with an optional `\r` before it). That is the same
//! numbering the engine's `split_lines` uses and the one editors send.

use ropey::Rope;
use tower_lsp::lsp_types::{Position, TextDocumentContentChangeEvent};

/// Char index of an LSP position (UTF-16 column), clamped to the end of its
/// line. Positions past the last line map to the end of the document.
pub(crate) fn char_offset(rope: &Rope, pos: Position) -> usize {
    let Some(line) = rope.get_line(pos.line as usize) else {
        return rope.len_chars();
    };
    let mut units = 0usize;
    let column = line
        .chars()
        .take_while(|&ch| {
            if matches!(ch, '\n' | '\r') {
                return false;
            }
            units += ch.len_utf16();
            units <= pos.character as usize
        })
        .count();
    rope.line_to_char(pos.line as usize) + column
}

/// Applies one content change. A change without a range replaces the buffer.
pub(crate) fn apply_change(rope: &mut Rope, change: &TextDocumentContentChangeEvent) {
    let Some(range) = change.range else {
        *rope = Rope::from_str(&change.text);
        return;
    };
    let a = char_offset(rope, range.start);
    let b = char_offset(rope, range.end);
    let at = a.min(b);
    rope.remove(at..a.max(b));
    rope.insert(at, &change.text);
}
