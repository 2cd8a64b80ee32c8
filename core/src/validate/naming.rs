use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::position::Range;
use crate::syntax::is_screaming_snake_case;

static LOWERCASE_TYPE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:abstract\s+|abs\s+)?(class|cls|struct|module|mod|enum|record|annotation|anno)\s+([a-z]\w*)")
        .expect("lowercase type name pattern")
});
// Modifiers (`private def`, `abstract fun`) fail the anchor on purpose: those
// forms are exempt.
static UPPERCASE_METHOD_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(define|def|function|fun)\s+([A-Z]\w*)(\.)?").expect("uppercase method name pattern")
});
static BARE_CONSTANT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Z][a-z]\w*)\s*=(?:[^=~>]|$)").expect("bare constant pattern"));
static DECLARATION_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:let|var|fix|con)\b").expect("declaration keyword pattern"));

/// Applies the naming-convention checks to one code line.
pub fn check_line(line_no: u32, line: &str, code: &str, in_enum_block: bool, diagnostics: &mut Vec<Diagnostic>) {
    if let Some(caps) = LOWERCASE_TYPE_NAME.captures(code) {
        if let (Some(keyword), Some(name)) = (caps.get(1), caps.get(2)) {
            diagnostics.push(Diagnostic::error(
                DiagnosticCode::TypeNameCase,
                Range::of_bytes(line_no, line, name.start(), name.end()),
                format!("{} name must start with a capital letter", keyword.as_str()),
            ));
        }
    }

    if let Some(caps) = UPPERCASE_METHOD_NAME.captures(code) {
        // `def Point.origin`: the capitalised word is a receiver, not the name
        let is_receiver = caps.get(3).is_some();
        if let (Some(keyword), Some(name), false) = (caps.get(1), caps.get(2), is_receiver) {
            diagnostics.push(Diagnostic::error(
                DiagnosticCode::MethodNameCase,
                Range::of_bytes(line_no, line, name.start(), name.end()),
                format!("{} name must start with a lowercase letter", keyword.as_str()),
            ));
        }
    }

    if in_enum_block || DECLARATION_KEYWORD.is_match(code) {
        return;
    }
    if let Some(name) = BARE_CONSTANT.captures(code).and_then(|caps| caps.get(1)) {
        if !is_screaming_snake_case(name.as_str()) {
            diagnostics.push(Diagnostic::warning(
                DiagnosticCode::ConstantNameCase,
                Range::of_bytes(line_no, line, name.start(), name.end()),
                "Constants without keyword should be in SCREAMING_SNAKE_CASE",
            ));
        }
    }
}
