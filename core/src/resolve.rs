use once_cell::sync::Lazy;
use regex::Regex;

use crate::position::{Position, byte_of_utf16, split_lines};
use crate::symbols::{SymbolRecord, collect_symbols};

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z_]\w*[?!=]?").expect("word pattern"));

/// Byte span of the identifier-like token touching `character` (a UTF-16
/// column). A cursor right after the last character still touches the word.
pub fn word_at(line: &str, character: u32) -> Option<(usize, usize)> {
    let cursor = byte_of_utf16(line, character);
    WORD.find_iter(line)
        .find(|m| m.start() <= cursor && cursor <= m.end())
        .map(|m| (m.start(), m.end()))
}

/// First symbol whose name is `word`, `<receiver>.word`, or `word` with a
/// `?`, `!` or `=` suffix.
pub fn find_symbol<'a>(symbols: &'a [SymbolRecord], word: &str) -> Option<&'a SymbolRecord> {
    symbols.iter().find(|symbol| {
        let name = symbol.name.as_str();
        name == word
            || name.strip_suffix(word).is_some_and(|head| head.ends_with('.'))
            || name
                .strip_prefix(word)
                .is_some_and(|tail| matches!(tail, "?" | "!" | "="))
    })
}

/// Resolves the token under `position` against a fresh symbol table.
pub fn symbol_at(text: &str, position: Position) -> Option<SymbolRecord> {
    let lines = split_lines(text);
    let line = lines.get(position.line as usize)?;
    let (start, end) = word_at(line, position.character)?;
    let symbols = collect_symbols(text);
    find_symbol(&symbols, &line[start..end]).cloned()
}

/// Markdown hover body for a resolved symbol.
pub fn hover_markdown(symbol: &SymbolRecord) -> String {
    let shown = symbol.detail.as_deref().unwrap_or(&symbol.name);
    format!("```dragonstone\n{}\n```\nDefined at line {}", shown, symbol.line + 1)
}
