//! Character-level scanning of one line at a time.
//!
//! The block-comment depth is the only state that survives from one line to the
//! next; everything else (quote state, escapes) is reset per line.

use serde::Serialize;

use crate::syntax::{BLOCK_COMMENT_CLOSE, BLOCK_COMMENT_OPEN, LINE_COMMENT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteKind {
    Double,
    Single,
    Backtick,
}

impl QuoteKind {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '"' => Some(QuoteKind::Double),
            '\'' => Some(QuoteKind::Single),
            '`' => Some(QuoteKind::Backtick),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            QuoteKind::Double => '"',
            QuoteKind::Single => '\'',
            QuoteKind::Backtick => '`',
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            QuoteKind::Double => "double quote (\")",
            QuoteKind::Single => "single quote (')",
            QuoteKind::Backtick => "backtick (`)",
        }
    }
}

/// What the scanner learned about one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineScan {
    /// The line began inside a block comment opened on an earlier line.
    pub starts_in_comment: bool,
    /// The line is still inside a block comment when it ends, or closes one.
    /// Such lines get no string or keyword analysis.
    pub in_comment: bool,
    /// Quote left open at end of line. Always `None` for comment lines.
    pub unterminated: Option<QuoteKind>,
    /// Number of `]#` markers outside quoted literals that had no open
    /// comment to close.
    pub stray_closes: usize,
    /// Byte offset of the last such marker.
    pub stray_close_at: Option<usize>,
    /// The line with string bodies and any trailing line comment blanked out.
    /// Byte offsets match the original line. Empty when the line starts inside
    /// a block comment.
    pub code: String,
}

/// Tracks nested `#[ ... ]#` comments across the lines of one document.
///
/// Two depths are kept. `depth` counts every marker literally and decides which
/// lines are comment lines. `lexical_depth` ignores markers inside quoted
/// literals and only feeds the stray and unclosed comment reports, so
/// `pattern = "]#"` is not mistaken for a misplaced terminator.
#[derive(Debug, Clone, Default)]
pub struct CommentTracker {
    depth: usize,
    lexical_depth: usize,
    opened_on: Option<u32>,
}

impl CommentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Line on which the outermost still-open block comment began.
    pub fn unclosed_since(&self) -> Option<u32> {
        self.opened_on.filter(|_| self.lexical_depth > 0)
    }

    pub fn scan_line(&mut self, line_no: u32, line: &str) -> LineScan {
        let starts_in_comment = self.depth > 0;
        let opens = line.matches(BLOCK_COMMENT_OPEN).count();
        let closes = line.matches(BLOCK_COMMENT_CLOSE).count();

        self.depth = (self.depth + opens).saturating_sub(closes);

        let was_open = self.lexical_depth > 0;
        let markers = scan_markers(line, self.lexical_depth);
        self.lexical_depth = markers.depth;
        if self.lexical_depth == 0 {
            self.opened_on = None;
        } else if !was_open || self.opened_on.is_none() {
            self.opened_on = Some(line_no);
        }

        let in_comment = self.depth > 0 || closes > 0;
        let (unterminated, code) = if starts_in_comment {
            (None, String::new())
        } else {
            scan_code(line)
        };

        LineScan {
            starts_in_comment,
            in_comment,
            unterminated: if in_comment { None } else { unterminated },
            stray_closes: markers.strays,
            stray_close_at: markers.last_stray,
            code,
        }
    }
}

/// Comment markers of one line as the language sees them: markers inside a
/// quoted literal are text, and a bare `#` ends the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Markers {
    depth: usize,
    strays: usize,
    last_stray: Option<usize>,
}

fn scan_markers(line: &str, depth: usize) -> Markers {
    let bytes = line.as_bytes();
    let mut out = Markers {
        depth,
        strays: 0,
        last_stray: None,
    };
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 1;
            } else if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match (b, bytes.get(i + 1).copied()) {
            (b'#', Some(b'[')) => {
                out.depth += 1;
                i += 2;
                continue;
            }
            (b']', Some(b'#')) => {
                if out.depth > 0 {
                    out.depth -= 1;
                } else {
                    out.strays += 1;
                    out.last_stray = Some(i);
                }
                i += 2;
                continue;
            }
            _ => {}
        }
        if out.depth == 0 {
            match b {
                b'#' => break,
                b'"' | b'\'' | b'`' => quote = Some(b),
                _ => {}
            }
        }
        i += 1;
    }

    out
}

/// Runs the quote automaton over `line`. All three quote kinds share one state
/// machine, so a quote of another kind inside a string is an ordinary character.
/// A `#` outside any string ends the code part of the line.
pub fn scan_code(line: &str) -> (Option<QuoteKind>, String) {
    let mut code = String::with_capacity(line.len());
    let mut open: Option<QuoteKind> = None;
    let mut escaped = false;

    for (idx, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            push_char(&mut code, ch, open.is_some());
            continue;
        }
        if ch == '\\' {
            escaped = true;
            push_char(&mut code, ch, open.is_some());
            continue;
        }

        match (open, QuoteKind::from_char(ch)) {
            (None, Some(quote)) => {
                open = Some(quote);
                code.push(ch);
            }
            (Some(current), Some(quote)) if current == quote => {
                open = None;
                code.push(ch);
            }
            (Some(_), _) => push_char(&mut code, ch, true),
            (None, None) if ch == LINE_COMMENT => {
                blank(&mut code, &line[idx..]);
                break;
            }
            (None, None) => code.push(ch),
        }
    }

    (open, code)
}

fn push_char(code: &mut String, ch: char, masked: bool) {
    if masked {
        code.extend(std::iter::repeat_n(' ', ch.len_utf8()));
    } else {
        code.push(ch);
    }
}

fn blank(code: &mut String, rest: &str) {
    code.extend(std::iter::repeat_n(' ', rest.len()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(line: &str) -> LineScan {
        CommentTracker::new().scan_line(0, line)
    }

    #[test]
    fn closed_strings_are_blanked() {
        let s = scan(r#"puts "do it" if ok"#);
        assert_eq!(s.unterminated, None);
        assert_eq!(s.code, r#"puts "     " if ok"#);
    }

    #[test]
    fn apostrophe_inside_double_quotes_is_inert() {
        assert_eq!(scan(r#"x = "don't""#).unterminated, None);
    }

    #[test]
    fn escaped_quote_does_not_close() {
        assert_eq!(scan(r#"x = "say \"hi"#).unterminated, Some(QuoteKind::Double));
        assert_eq!(scan(r#"x = "say \"hi\"""#).unterminated, None);
    }

    #[test]
    fn unterminated_quote_kinds() {
        assert_eq!(scan("x = 'abc").unterminated, Some(QuoteKind::Single));
        assert_eq!(scan("x = `ls").unterminated, Some(QuoteKind::Backtick));
    }

    #[test]
    fn trailing_line_comment_is_not_code() {
        let s = scan("x = 1 # don't");
        assert_eq!(s.unterminated, None);
        assert_eq!(s.code.trim_end(), "x = 1");
        assert_eq!(s.code.len(), "x = 1 # don't".len());
    }

    #[test]
    fn multibyte_string_bodies_keep_byte_offsets() {
        let line = "s = \"héllo\" + Name";
        let s = scan(line);
        assert_eq!(s.code.len(), line.len());
        assert_eq!(s.code.find("Name"), line.find("Name"));
    }

    #[test]
    fn nested_block_comments_track_depth() {
        let mut tracker = CommentTracker::new();
        let first = tracker.scan_line(0, "#[ outer #[ inner");
        assert!(first.in_comment);
        assert!(!first.starts_in_comment);
        assert_eq!(tracker.depth(), 2);

        let second = tracker.scan_line(1, "still ]# comment");
        assert!(second.starts_in_comment);
        assert!(second.in_comment);
        assert_eq!(tracker.depth(), 1);
        assert_eq!(tracker.unclosed_since(), Some(0));

        let third = tracker.scan_line(2, "]#");
        assert!(third.in_comment);
        assert_eq!(tracker.depth(), 0);
        assert_eq!(tracker.unclosed_since(), None);

        let fourth = tracker.scan_line(3, "x = 1");
        assert!(!fourth.in_comment);
    }

    #[test]
    fn over_closing_clamps_and_counts_strays() {
        let mut tracker = CommentTracker::new();
        let s = tracker.scan_line(0, "x = 1 ]# ]#");
        assert_eq!(tracker.depth(), 0);
        assert_eq!(s.stray_closes, 2);
        assert!(s.in_comment);
    }

    #[test]
    fn markers_inside_strings_are_not_strays() {
        let s = scan("pattern = \"]#\"");
        assert!(s.in_comment, "literal counting still skips the line");
        assert_eq!(s.stray_closes, 0);
        assert_eq!(s.stray_close_at, None);

        let s = scan("x = ']#' ]#");
        assert_eq!(s.stray_closes, 1);
        assert_eq!(s.stray_close_at, Some(9));
    }

    #[test]
    fn opener_inside_string_leaves_nothing_unclosed() {
        let mut tracker = CommentTracker::new();
        tracker.scan_line(0, "s = \"#[\"");
        assert_eq!(tracker.depth(), 1);
        assert_eq!(tracker.unclosed_since(), None);

        tracker.scan_line(1, "#[ real");
        assert_eq!(tracker.unclosed_since(), Some(1));
    }

    #[test]
    fn comment_lines_skip_string_analysis() {
        let mut tracker = CommentTracker::new();
        let s = tracker.scan_line(0, "#[ it's open");
        assert!(s.in_comment);
        assert_eq!(s.unterminated, None);
    }
}
