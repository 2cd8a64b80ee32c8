//! Engine types to protocol types.

use dragonstone_core as ds;
use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, Diagnostic, DiagnosticSeverity, DocumentSymbol, FormattingOptions,
    InsertTextFormat, NumberOrString, Position, Range, SymbolKind, TextEdit,
};

pub(crate) fn to_core_position(position: Position) -> ds::Position {
    ds::Position::new(position.line, position.character)
}

pub(crate) fn position(position: ds::Position) -> Position {
    Position::new(position.line, position.character)
}

pub(crate) fn range(range: ds::Range) -> Range {
    Range::new(position(range.start), position(range.end))
}

pub(crate) fn diagnostic(diagnostic: &ds::Diagnostic) -> Diagnostic {
    let severity = match diagnostic.severity {
        ds::Severity::Error => DiagnosticSeverity::ERROR,
        ds::Severity::Warning => DiagnosticSeverity::WARNING,
    };
    Diagnostic {
        range: range(diagnostic.range),
        severity: Some(severity),
        code: Some(NumberOrString::String(diagnostic.code.as_str().to_string())),
        source: Some(diagnostic.source.to_string()),
        message: diagnostic.message.clone(),
        ..Default::default()
    }
}

fn symbol_kind(kind: ds::SymbolKind) -> SymbolKind {
    match kind {
        ds::SymbolKind::Type => SymbolKind::CLASS,
        ds::SymbolKind::Enum => SymbolKind::ENUM,
        ds::SymbolKind::Module => SymbolKind::MODULE,
        ds::SymbolKind::Method => SymbolKind::METHOD,
        ds::SymbolKind::Function => SymbolKind::FUNCTION,
        ds::SymbolKind::Constant => SymbolKind::CONSTANT,
        ds::SymbolKind::Variable => SymbolKind::VARIABLE,
    }
}

#[allow(deprecated)]
pub(crate) fn document_symbol(symbol: ds::SymbolRecord) -> DocumentSymbol {
    let range = range(symbol.range);
    DocumentSymbol {
        name: symbol.name,
        detail: symbol.detail,
        kind: symbol_kind(symbol.kind),
        tags: None,
        deprecated: None,
        range,
        selection_range: range,
        children: None,
    }
}

pub(crate) fn text_edit(edit: ds::TextEdit) -> TextEdit {
    TextEdit {
        range: range(edit.range),
        new_text: edit.new_text,
    }
}

pub(crate) fn format_options(options: &FormattingOptions) -> ds::FormatOptions {
    ds::FormatOptions::new(options.tab_size as usize, !options.insert_spaces)
}

pub(crate) fn completion_item(candidate: ds::Candidate) -> CompletionItem {
    let kind = match candidate.kind {
        ds::CandidateKind::Keyword => CompletionItemKind::KEYWORD,
        ds::CandidateKind::Class => CompletionItemKind::CLASS,
        ds::CandidateKind::Function => CompletionItemKind::FUNCTION,
        ds::CandidateKind::Method => CompletionItemKind::METHOD,
        ds::CandidateKind::Constant => CompletionItemKind::CONSTANT,
        ds::CandidateKind::Variable => CompletionItemKind::VARIABLE,
        ds::CandidateKind::Module => CompletionItemKind::MODULE,
    };
    CompletionItem {
        label: candidate.label.into_owned(),
        kind: Some(kind),
        detail: candidate.detail.map(|d| d.into_owned()),
        insert_text: candidate.snippet.map(str::to_string),
        insert_text_format: candidate.snippet.map(|_| InsertTextFormat::SNIPPET),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dragonstone_core::{DiagnosticCode, ValidationOptions};

    #[test]
    fn diagnostics_carry_code_and_source() {
        let diags = ds::validate("MaxSize = 1", &ValidationOptions::default());
        let lsp = diagnostic(&diags[0]);
        assert_eq!(lsp.severity, Some(DiagnosticSeverity::WARNING));
        assert_eq!(
            lsp.code,
            Some(NumberOrString::String(DiagnosticCode::ConstantNameCase.as_str().to_string()))
        );
        assert_eq!(lsp.source.as_deref(), Some("dragonstone"));
        assert_eq!(lsp.range, Range::new(Position::new(0, 0), Position::new(0, 7)));
    }

    #[test]
    fn enum_symbols_keep_their_icon() {
        let symbols = ds::collect_symbols("enum Color\nend");
        let lsp = document_symbol(symbols[0].clone());
        assert_eq!(lsp.kind, SymbolKind::ENUM);
        assert_eq!(lsp.selection_range, lsp.range);
    }

    #[test]
    fn snippets_are_marked() {
        let def = ds::complete("", ds::Position::new(0, 0))
            .into_iter()
            .find(|c| c.label == "def")
            .unwrap();
        let item = completion_item(def);
        assert_eq!(item.insert_text_format, Some(InsertTextFormat::SNIPPET));
        assert!(item.insert_text.unwrap().starts_with("def ${1:method_name}"));
    }

    #[test]
    fn tab_size_maps_to_indent_width() {
        let opts = FormattingOptions {
            tab_size: 2,
            insert_spaces: true,
            ..Default::default()
        };
        assert_eq!(format_options(&opts), ds::FormatOptions::new(2, false));
    }
}
