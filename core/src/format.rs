//! Indentation-only formatting.
//!
//! The formatter keeps its own nesting counter and never consults the validator's
//! block stack, so on malformed input the two can disagree. It never touches
//! anything but leading whitespace.

use serde::Serialize;

use crate::position::{Range, split_lines, utf16_col};
use crate::scanner::CommentTracker;
use crate::syntax;

const DEFAULT_INDENT_WIDTH: usize = 4;
const MAX_INDENT_WIDTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    pub indent_width: usize,
    pub use_tabs: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
            use_tabs: false,
        }
    }
}

impl FormatOptions {
    pub fn new(indent_width: usize, use_tabs: bool) -> Self {
        Self {
            indent_width: indent_width.clamp(1, MAX_INDENT_WIDTH),
            use_tabs,
        }
    }

    fn unit(&self) -> String {
        if self.use_tabs {
            "\t".to_string()
        } else {
            " ".repeat(self.indent_width.clamp(1, MAX_INDENT_WIDTH))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    pub range: Range,
    pub new_text: String,
}

/// Indentation decision for one line that the formatter looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LinePlan {
    line: usize,
    /// Byte length of the current leading whitespace.
    current_len: usize,
    depth: usize,
}

fn plan(lines: &[&str]) -> Vec<LinePlan> {
    let mut comments = CommentTracker::new();
    let mut depth = 0usize;
    let mut plans = Vec::new();

    for (idx, line) in lines.iter().copied().enumerate() {
        let scan = comments.scan_line(idx as u32, line);
        if scan.starts_in_comment {
            continue;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let code = scan.code.as_str();
        let continues = syntax::continuation(code).is_some();
        if continues || syntax::starts_with_terminator(code) {
            depth = depth.saturating_sub(1);
        }

        plans.push(LinePlan {
            line: idx,
            current_len: line.len() - line.trim_start().len(),
            depth,
        });

        let closes_here = syntax::closes_on_same_line(code);
        if closes_here {
            continue;
        }
        if continues || syntax::block_opener(code).is_some() {
            depth += 1;
        }
        if continues && syntax::opener_after_continuation(code).is_some() {
            depth += 1;
        }
    }

    plans
}

/// Nesting depth the formatter assigns to each line, `None` for lines it skips
/// (blank lines, comments).
pub fn indent_levels(text: &str) -> Vec<Option<usize>> {
    let lines = split_lines(text);
    let mut levels = vec![None; lines.len()];
    for p in plan(&lines) {
        levels[p.line] = Some(p.depth);
    }
    levels
}

/// Minimal whitespace edits that bring every line to its expected indentation.
pub fn format_edits(text: &str, options: &FormatOptions) -> Vec<TextEdit> {
    let lines = split_lines(text);
    let unit = options.unit();

    plan(&lines)
        .into_iter()
        .filter_map(|p| {
            let line = lines[p.line];
            let current = &line[..p.current_len];
            let expected = unit.repeat(p.depth);
            if current == expected {
                return None;
            }
            let row = p.line as u32;
            Some(TextEdit {
                range: Range::on_line(row, 0, utf16_col(line, p.current_len)),
                new_text: expected,
            })
        })
        .collect()
}

/// The document with every indentation edit applied. Line endings are kept.
pub fn format_text(text: &str, options: &FormatOptions) -> String {
    let lines = split_lines(text);
    let unit = options.unit();
    let mut expected: Vec<Option<(usize, String)>> = vec![None; lines.len()];
    for p in plan(&lines) {
        expected[p.line] = Some((p.current_len, unit.repeat(p.depth)));
    }

    let mut out = String::with_capacity(text.len());
    for (idx, segment) in text.split('\n').enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        match expected.get(idx).and_then(Option::as_ref) {
            Some((current_len, indent)) => {
                out.push_str(indent);
                out.push_str(&segment[*current_len..]);
            }
            None => out.push_str(segment),
        }
    }
    out
}
