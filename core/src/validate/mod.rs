//! The validation pass: per-line string, naming and block checks, followed by
//! the whole-document checks (unclosed blocks, unclosed comments, bracket
//! balance). Every pass starts from scratch and returns the complete set.

mod blocks;
mod naming;

use serde::Serialize;
use tracing::debug;

use crate::balance::check_balance;
use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::position::{Range, split_lines};
use crate::scanner::CommentTracker;
use crate::syntax::BLOCK_COMMENT_CLOSE;

pub use blocks::{BlockFrame, BlockStack};

/// Which optional checks a validation pass runs. String and block-structure
/// checks always run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationOptions {
    pub naming_conventions: bool,
    pub bracket_balance: bool,
    /// Report `]#` without an open comment and comments left open at the end.
    pub comment_nesting: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            naming_conventions: true,
            bracket_balance: true,
            comment_nesting: true,
        }
    }
}

/// State carried from line to line within one pass.
#[derive(Debug, Clone, Default)]
pub struct ScanState {
    pub comments: CommentTracker,
    /// Inside an `enum` body; bare constants there may use any case.
    pub in_enum_block: bool,
}

impl ScanState {
    pub fn block_comment_depth(&self) -> usize {
        self.comments.depth()
    }
}

pub fn validate(text: &str, options: &ValidationOptions) -> Vec<Diagnostic> {
    let lines = split_lines(text);
    let mut state = ScanState::default();
    let mut blocks = BlockStack::new();
    let mut diagnostics = Vec::new();

    for (idx, line) in lines.iter().copied().enumerate() {
        let line_no = idx as u32;
        let scan = state.comments.scan_line(line_no, line);

        if options.comment_nesting {
            if let Some(at) = scan.stray_close_at {
                diagnostics.push(stray_close(line_no, line, at));
            }
        }
        if scan.in_comment {
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(quote) = scan.unterminated {
            diagnostics.push(Diagnostic::error(
                DiagnosticCode::UnclosedString,
                Range::whole_line(line_no, line),
                format!("Unclosed string literal ({})", quote.describe()),
            ));
        }

        if options.naming_conventions {
            naming::check_line(line_no, line, &scan.code, state.in_enum_block, &mut diagnostics);
        }

        blocks.track_line(line_no, line, &scan.code, &mut state, &mut diagnostics);
    }

    blocks.finish(&lines, &mut diagnostics);

    if options.comment_nesting {
        if let Some(open_line) = state.comments.unclosed_since() {
            let text = lines.get(open_line as usize).copied().unwrap_or_default();
            diagnostics.push(Diagnostic::warning(
                DiagnosticCode::UnclosedComment,
                Range::whole_line(open_line, text),
                "Unclosed block comment",
            ));
        }
    }

    if options.bracket_balance {
        let first_line = lines.first().copied().unwrap_or_default();
        diagnostics.extend(check_balance(text, first_line));
    }

    debug!(lines = lines.len(), diagnostics = diagnostics.len(), "validation pass");
    diagnostics
}

fn stray_close(line_no: u32, line: &str, start: usize) -> Diagnostic {
    let range = Range::of_bytes(line_no, line, start, start + BLOCK_COMMENT_CLOSE.len());
    Diagnostic::warning(
        DiagnosticCode::StrayCommentClose,
        range,
        "Block comment terminator \"]#\" has no matching \"#[\"",
    )
}
