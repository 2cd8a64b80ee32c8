use serde::Serialize;

use crate::classify::{Construct, classify_line};
use crate::position::{Range, split_lines};
use crate::scanner::CommentTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Type,
    /// A type introduced by `enum`.
    Enum,
    Module,
    Method,
    Function,
    Constant,
    Variable,
}

impl SymbolKind {
    fn of(construct: &Construct<'_>) -> Self {
        match construct {
            Construct::TypeDef { keyword: "enum", .. } => SymbolKind::Enum,
            Construct::TypeDef { .. } => SymbolKind::Type,
            Construct::ModuleDef { .. } => SymbolKind::Module,
            Construct::MethodDef { .. } => SymbolKind::Method,
            Construct::FunctionDef { .. } => SymbolKind::Function,
            Construct::ConstDef { .. } => SymbolKind::Constant,
            Construct::VarDef { .. } => SymbolKind::Variable,
        }
    }
}

/// One defining construct found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolRecord {
    pub name: String,
    pub kind: SymbolKind,
    pub line: u32,
    /// Spans the whole defining line.
    pub range: Range,
    pub detail: Option<String>,
}

/// Collects every recognised construct in source order.
///
/// Lines that begin inside a block comment are skipped; everything else goes
/// through [`classify_line`] unchanged.
pub fn collect_symbols(text: &str) -> Vec<SymbolRecord> {
    let mut comments = CommentTracker::new();
    let mut symbols = Vec::new();

    for (idx, line) in split_lines(text).into_iter().enumerate() {
        let line_no = idx as u32;
        if comments.scan_line(line_no, line).starts_in_comment {
            continue;
        }
        if let Some(construct) = classify_line(line) {
            symbols.push(SymbolRecord {
                name: construct.symbol_name().into_owned(),
                kind: SymbolKind::of(&construct),
                line: line_no,
                range: Range::whole_line(line_no, line),
                detail: Some(construct.detail()),
            });
        }
    }

    symbols
}
