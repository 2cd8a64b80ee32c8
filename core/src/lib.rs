//! Lexical analysis engine for Dragonstone source.
//!
//! Everything here works line by line on plain text with regular expressions
//! and small character automata; there is no syntax tree. Every entry point
//! re-scans the whole document and never fails.

pub mod balance;
pub mod classify;
pub mod completion;
pub mod diagnostic;
pub mod format;
pub mod position;
pub mod resolve;
pub mod scanner;
pub mod symbols;
pub mod syntax;
pub mod validate;

use serde::Serialize;

pub use completion::{Candidate, CandidateKind, complete};
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use format::{FormatOptions, TextEdit, format_edits, format_text};
pub use position::{Position, Range};
pub use resolve::{hover_markdown, symbol_at};
pub use symbols::{SymbolKind, SymbolRecord, collect_symbols};
pub use validate::{ValidationOptions, validate};

/// Diagnostics and symbols of one document, computed together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub diagnostics: Vec<Diagnostic>,
    pub symbols: Vec<SymbolRecord>,
}

impl Analysis {
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }
}

pub fn analyze(text: &str, options: &ValidationOptions) -> Analysis {
    Analysis {
        diagnostics: validate(text, options),
        symbols: collect_symbols(text),
    }
}
