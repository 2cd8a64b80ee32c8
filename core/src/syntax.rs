//! Keyword vocabulary shared by the validator, the formatter and the classifier.
//!
//! Every matcher here expects a *code view* of a line (see [`crate::scanner`]), so
//! keywords that only appear inside strings or comments never count.

use once_cell::sync::Lazy;
use regex::Regex;

pub const BLOCK_COMMENT_OPEN: &str = "#[";
pub const BLOCK_COMMENT_CLOSE: &str = "]#";
pub const LINE_COMMENT: char = '#';

/// Keywords that open a block when they lead a line (after an optional modifier).
pub const BLOCK_KEYWORDS: &[&str] = &[
    "class", "cls", "struct", "module", "mod", "def", "define", "fun", "function", "if", "unless", "case", "select",
    "begin", "while", "with", "enum", "record", "annotation", "anno",
];

/// Keywords that close the current branch and open the next one.
pub const CONTINUATION_KEYWORDS: &[&str] = &["elsif", "elseif", "else", "when", "rescue", "ensure"];

pub const TERMINATOR: &str = "end";

/// Keyword that opens an enumerated-constant block.
pub const ENUM_KEYWORD: &str = "enum";

static LEADING_OPENER: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(
        r"^\s*(?:(?:public|private|protected|abstract|abs)\s+)?({})\b",
        BLOCK_KEYWORDS.join("|")
    );
    Regex::new(&pattern).expect("leading opener pattern")
});
static ANONYMOUS_LAMBDA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(fun|function)\s*\(").expect("anonymous lambda pattern"));
static DO_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bdo\b").expect("do block pattern"));
static LEADING_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^\s*{TERMINATOR}\b")).expect("leading end pattern"));
static TRAILING_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"\b{TERMINATOR}\s*$")).expect("trailing end pattern"));
static LEADING_CONTINUATION: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(r"^\s*({})\b", CONTINUATION_KEYWORDS.join("|"));
    Regex::new(&pattern).expect("continuation pattern")
});

/// Keyword of the block this line opens, if any: a leading block keyword first,
/// then an anonymous `fun(`/`function(`, then a `do` anywhere on the line.
///
/// Does not look at whether the same line also closes the block; callers combine
/// this with [`closes_on_same_line`].
pub fn block_opener(code: &str) -> Option<&str> {
    if let Some(caps) = LEADING_OPENER.captures(code) {
        return caps.get(1).map(|m| m.as_str());
    }
    if let Some(caps) = ANONYMOUS_LAMBDA.captures(code) {
        return caps.get(1).map(|m| m.as_str());
    }
    DO_BLOCK.find(code).map(|m| m.as_str())
}

/// `true` when the line ends with the `end` terminator.
pub fn closes_on_same_line(code: &str) -> bool {
    TRAILING_END.is_match(code)
}

/// `true` when the line begins with the `end` terminator.
pub fn starts_with_terminator(code: &str) -> bool {
    LEADING_END.is_match(code)
}

/// Continuation keyword leading this line (`else`, `when`, `rescue`, ...).
pub fn continuation(code: &str) -> Option<&str> {
    LEADING_CONTINUATION
        .captures(code)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Block opened by the rest of a continuation line, as in
/// `when 1 then items.each do |i|` or `else list.map do |v|`.
pub fn opener_after_continuation(code: &str) -> Option<&str> {
    let keyword = LEADING_CONTINUATION.find(code)?;
    block_opener(&code[keyword.end()..])
}

/// `^[A-Z][A-Z0-9_]*$`
pub fn is_screaming_snake_case(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_keywords_open_blocks() {
        assert_eq!(block_opener("class Point"), Some("class"));
        assert_eq!(block_opener("  private def secret"), Some("def"));
        assert_eq!(block_opener("abstract class Shape"), Some("class"));
        assert_eq!(block_opener("with resource"), Some("with"));
        assert_eq!(block_opener("ending = 1"), None);
    }

    #[test]
    fn anonymous_forms_open_blocks() {
        assert_eq!(block_opener("handler = fun(x)"), Some("fun"));
        assert_eq!(block_opener("cb = function (a, b)"), Some("function"));
        assert_eq!(block_opener("items.each do |item|"), Some("do"));
        assert_eq!(block_opener("do_work()"), None);
    }

    #[test]
    fn terminators_and_continuations() {
        assert!(starts_with_terminator("  end"));
        assert!(starts_with_terminator("end.each do |x|"));
        assert!(!starts_with_terminator("end_time = 3"));
        assert!(closes_on_same_line("if x then y end   "));
        assert!(!closes_on_same_line("legend = 1"));
        assert_eq!(continuation("  elsif x > 1"), Some("elsif"));
        assert_eq!(continuation("elsewhere()"), None);
    }

    #[test]
    fn continuation_lines_can_open_blocks() {
        assert_eq!(opener_after_continuation("when 1 then items.each do |i|"), Some("do"));
        assert_eq!(opener_after_continuation("  else list.map do |v|"), Some("do"));
        assert_eq!(opener_after_continuation("rescue cb = fun(e)"), Some("fun"));
        assert_eq!(opener_after_continuation("else"), None);
        assert_eq!(opener_after_continuation("when 2 then 3"), None);
        assert_eq!(opener_after_continuation("items.each do |i|"), None);
    }

    #[test]
    fn screaming_snake_case() {
        assert!(is_screaming_snake_case("MAX_SIZE"));
        assert!(is_screaming_snake_case("X1"));
        assert!(!is_screaming_snake_case("MaxSize"));
        assert!(!is_screaming_snake_case("_MAX"));
    }
}
