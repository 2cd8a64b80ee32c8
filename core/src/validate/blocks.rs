use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::position::Range;
use crate::syntax::{self, ENUM_KEYWORD, TERMINATOR};

use super::ScanState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockFrame {
    pub keyword: String,
    pub open_line: u32,
}

/// Open-block stack for one validation pass. Frames are ordered outermost first.
#[derive(Debug, Default)]
pub struct BlockStack {
    frames: Vec<BlockFrame>,
}

impl BlockStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> &[BlockFrame] {
        &self.frames
    }

    /// Feeds one non-comment line to the stack machine.
    ///
    /// `code` is the line's code view; `line` is the raw text, used only to
    /// size diagnostic ranges.
    pub fn track_line(
        &mut self,
        line_no: u32,
        line: &str,
        code: &str,
        state: &mut ScanState,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let closes_here = syntax::closes_on_same_line(code);

        if syntax::starts_with_terminator(code) {
            self.close(line_no, line, TERMINATOR, state, diagnostics);
            // `end.each do |x|` closes one block and opens another
            if !closes_here {
                if let Some(keyword) = syntax::block_opener(code) {
                    self.open(line_no, keyword, state);
                }
            }
            return;
        }

        if let Some(keyword) = syntax::continuation(code) {
            if self.frames.is_empty() {
                diagnostics.push(orphaned(line_no, line, keyword));
            } else if closes_here {
                self.close(line_no, line, TERMINATOR, state, diagnostics);
            }
            // `when 1 then items.each do |i|` keeps the branch and opens a block
            if !closes_here {
                if let Some(opener) = syntax::opener_after_continuation(code) {
                    self.open(line_no, opener, state);
                }
            }
            return;
        }

        if closes_here {
            return;
        }
        if let Some(keyword) = syntax::block_opener(code) {
            self.open(line_no, keyword, state);
        }
    }

    /// Reports every frame left open, outermost first.
    pub fn finish(self, lines: &[&str], diagnostics: &mut Vec<Diagnostic>) {
        for frame in self.frames {
            let text = lines.get(frame.open_line as usize).copied().unwrap_or_default();
            diagnostics.push(Diagnostic::error(
                DiagnosticCode::UnclosedBlock,
                Range::whole_line(frame.open_line, text),
                format!("Unclosed \"{}\" block", frame.keyword),
            ));
        }
    }

    fn open(&mut self, line_no: u32, keyword: &str, state: &mut ScanState) {
        if keyword == ENUM_KEYWORD {
            state.in_enum_block = true;
        }
        self.frames.push(BlockFrame {
            keyword: keyword.to_string(),
            open_line: line_no,
        });
    }

    fn close(
        &mut self,
        line_no: u32,
        line: &str,
        keyword: &str,
        state: &mut ScanState,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        match self.frames.pop() {
            Some(frame) => {
                if frame.keyword == ENUM_KEYWORD {
                    // only the outermost enum frame ends suppression
                    state.in_enum_block = self.frames.iter().any(|f| f.keyword == ENUM_KEYWORD);
                }
            }
            None => diagnostics.push(orphaned(line_no, line, keyword)),
        }
    }
}

fn orphaned(line_no: u32, line: &str, keyword: &str) -> Diagnostic {
    Diagnostic::error(
        DiagnosticCode::OrphanedTerminator,
        Range::whole_line(line_no, line),
        format!("Unexpected \"{keyword}\" without matching block start"),
    )
}
