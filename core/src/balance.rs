//! Whole-document bracket balance.
//!
//! Strings and comments are stripped with an explicit index-driven scan; what is
//! left is counted per delimiter kind. The result is deliberately coarse: one
//! warning on the first line, no attempt to locate the culprit.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::position::Range;
use crate::scanner::QuoteKind;

static BRACKETED_INVOCATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bas\s*\[").expect("bracketed invocation pattern"));

const LAMBDA_ARROW: &str = "->";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StripState {
    Code,
    Str(QuoteKind),
    BlockComment(usize),
    LineComment,
}

/// Outcome of one step of the stripping scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Step {
    emit: Option<char>,
    next: usize,
    state: StripState,
}

impl Step {
    fn new(emit: Option<char>, next: usize, state: StripState) -> Self {
        Self { emit, next, state }
    }
}

/// Consumes the character(s) at `i` and says what, if anything, survives.
fn strip_step(chars: &[char], i: usize, state: StripState) -> Step {
    let ch = chars[i];
    let next = chars.get(i + 1).copied();

    match state {
        StripState::Code => match (ch, next) {
            ('#', Some('[')) => Step::new(None, i + 2, StripState::BlockComment(1)),
            // stray close: drop the marker, nothing to unwind
            (']', Some('#')) => Step::new(None, i + 2, StripState::Code),
            ('#', _) => Step::new(None, i + 1, StripState::LineComment),
            _ => match QuoteKind::from_char(ch) {
                Some(quote) => Step::new(Some(ch), i + 1, StripState::Str(quote)),
                None => Step::new(Some(ch), i + 1, StripState::Code),
            },
        },
        StripState::Str(quote) => match ch {
            '\\' if next.is_some_and(|n| n != '\n') => Step::new(None, i + 2, state),
            '\n' => Step::new(Some('\n'), i + 1, StripState::Code),
            c if c == quote.as_char() => Step::new(Some(c), i + 1, StripState::Code),
            _ => Step::new(None, i + 1, state),
        },
        StripState::BlockComment(depth) => match (ch, next) {
            ('#', Some('[')) => Step::new(None, i + 2, StripState::BlockComment(depth + 1)),
            (']', Some('#')) if depth <= 1 => Step::new(None, i + 2, StripState::Code),
            (']', Some('#')) => Step::new(None, i + 2, StripState::BlockComment(depth - 1)),
            ('\n', _) => Step::new(Some('\n'), i + 1, state),
            _ => Step::new(None, i + 1, state),
        },
        StripState::LineComment => match ch {
            '\n' => Step::new(Some('\n'), i + 1, StripState::Code),
            _ => Step::new(None, i + 1, state),
        },
    }
}

/// Removes string bodies (keeping an empty pair of quotes), nested block
/// comments and line comments. Newlines survive so line structure is kept.
/// Strings do not span lines: an unterminated one ends at the newline.
pub fn strip_strings_and_comments(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut state = StripState::Code;
    let mut i = 0;

    while i < chars.len() {
        let step = strip_step(&chars, i, state);
        if let Some(c) = step.emit {
            out.push(c);
        }
        state = step.state;
        i = step.next;
    }

    out
}

/// Net open-minus-close counts for `()`, `[]` and `{}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Imbalance {
    pub parens: i64,
    pub brackets: i64,
    pub braces: i64,
}

impl Imbalance {
    pub fn is_balanced(&self) -> bool {
        self.parens == 0 && self.brackets == 0 && self.braces == 0
    }
}

/// Counts delimiters in already-stripped text.
pub fn count_delimiters(stripped: &str) -> Imbalance {
    stripped.chars().fold(Imbalance::default(), |mut acc, c| {
        match c {
            '(' => acc.parens += 1,
            ')' => acc.parens -= 1,
            '[' => acc.brackets += 1,
            ']' => acc.brackets -= 1,
            '{' => acc.braces += 1,
            '}' => acc.braces -= 1,
            _ => {}
        }
        acc
    })
}

/// `true` when the document uses an idiom known to confuse bracket counting.
fn uses_exempt_idiom(stripped: &str) -> bool {
    stripped.contains(LAMBDA_ARROW) || BRACKETED_INVOCATION.is_match(stripped)
}

/// Whole-document balance check. `first_line` sizes the warning's range.
pub fn check_balance(text: &str, first_line: &str) -> Option<Diagnostic> {
    let stripped = strip_strings_and_comments(text);
    if uses_exempt_idiom(&stripped) {
        return None;
    }

    let imbalance = count_delimiters(&stripped);
    if imbalance.is_balanced() {
        return None;
    }

    Some(Diagnostic::warning(
        DiagnosticCode::BracketImbalance,
        Range::whole_line(0, first_line),
        format!(
            "Document has mismatched brackets: {} unclosed (), {} unclosed [], {} unclosed {{}}",
            imbalance.parens, imbalance.brackets, imbalance.braces
        ),
    ))
}
