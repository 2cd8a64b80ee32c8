//! Completion candidates: fixed language tables plus the symbols of the current
//! document. No ranking or de-duplication happens here; editors filter.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::position::{Position, byte_of_utf16, split_lines};
use crate::symbols::{SymbolKind, collect_symbols};

/// Characters that make editors ask for completions.
pub const TRIGGER_CHARACTERS: &[&str] = &[".", ":", "@", "%", "$"];

static TYPE_CONTEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?::|->)\s*\w*$").expect("type context pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    Keyword,
    Class,
    Function,
    Method,
    Constant,
    Variable,
    Module,
}

impl From<SymbolKind> for CandidateKind {
    fn from(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Type | SymbolKind::Enum => CandidateKind::Class,
            SymbolKind::Module => CandidateKind::Module,
            SymbolKind::Method => CandidateKind::Method,
            SymbolKind::Function => CandidateKind::Function,
            SymbolKind::Constant => CandidateKind::Constant,
            SymbolKind::Variable => CandidateKind::Variable,
        }
    }
}

/// One row of a static completion table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionEntry {
    pub label: &'static str,
    pub kind: CandidateKind,
    pub detail: &'static str,
    /// Snippet body in the editor's `$1`/`$0` placeholder syntax.
    pub snippet: Option<&'static str>,
}

const fn entry(label: &'static str, kind: CandidateKind, detail: &'static str) -> CompletionEntry {
    CompletionEntry {
        label,
        kind,
        detail,
        snippet: None,
    }
}

const fn keyword(label: &'static str, detail: &'static str) -> CompletionEntry {
    entry(label, CandidateKind::Keyword, detail)
}

const fn snippet(label: &'static str, kind: CandidateKind, detail: &'static str, body: &'static str) -> CompletionEntry {
    CompletionEntry {
        label,
        kind,
        detail,
        snippet: Some(body),
    }
}

pub const KEYWORDS: &[CompletionEntry] = &[
    keyword("class", "Define a class"),
    keyword("cls", "Define a class (short)"),
    keyword("struct", "Define a struct"),
    keyword("module", "Define a module"),
    keyword("mod", "Define a module (short)"),
    keyword("enum", "Define an enum"),
    keyword("record", "Define a record"),
    keyword("annotation", "Define an annotation"),
    keyword("anno", "Define an annotation (short)"),
    snippet("def", CandidateKind::Keyword, "Define a method", "def ${1:method_name}($2)\n    $0\nend"),
    snippet("define", CandidateKind::Keyword, "Define a method", "define ${1:method_name}($2)\n    $0\nend"),
    snippet(
        "fun",
        CandidateKind::Keyword,
        "Define a function",
        "fun ${1:function_name}($2) -> ${3:return_type}\n    $0\nend",
    ),
    snippet(
        "function",
        CandidateKind::Keyword,
        "Define a function",
        "function ${1:function_name}($2) -> ${3:return_type}\n    $0\nend",
    ),
    snippet("if", CandidateKind::Keyword, "Conditional statement", "if ${1:condition}\n    $0\nend"),
    snippet("unless", CandidateKind::Keyword, "Negative conditional", "unless ${1:condition}\n    $0\nend"),
    keyword("elsif", "Else if clause"),
    keyword("elseif", "Else if clause"),
    keyword("else", "Else clause"),
    snippet("case", CandidateKind::Keyword, "Case statement", "case ${1:value}\nwhen ${2:pattern}\n    $0\nend"),
    snippet("select", CandidateKind::Keyword, "Select statement", "select ${1:value}\nwhen ${2:pattern}\n    $0\nend"),
    keyword("when", "When clause"),
    snippet("while", CandidateKind::Keyword, "While loop", "while ${1:condition}\n    $0\nend"),
    snippet("begin", CandidateKind::Keyword, "Begin block", "begin\n    $0\nend"),
    keyword("rescue", "Rescue clause"),
    keyword("ensure", "Ensure clause"),
    keyword("end", "End block"),
    keyword("return", "Return statement"),
    keyword("yield", "Yield to block"),
    keyword("break", "Break loop"),
    keyword("next", "Next iteration"),
    keyword("con", "Define a constant variable"),
    keyword("let", "Define an immutable variable"),
    keyword("var", "Define a mutable variable"),
    keyword("fix", "Define a fixed variable"),
    keyword("use", "Import/use module"),
    keyword("from", "Import from module"),
    keyword("as", "Alias import"),
    keyword("abstract", "Abstract modifier"),
    keyword("abs", "Abstract modifier (short)"),
    keyword("public", "Public visibility"),
    keyword("private", "Private visibility"),
    keyword("protected", "Protected visibility"),
    snippet("with", CandidateKind::Keyword, "With statement", "with ${1:expression}\n    $0\nend"),
];

pub const TYPES: &[CompletionEntry] = &[
    entry("str", CandidateKind::Class, "String type"),
    entry("int", CandidateKind::Class, "Integer type"),
    entry("int8", CandidateKind::Class, "8-bit integer"),
    entry("int16", CandidateKind::Class, "16-bit integer"),
    entry("int32", CandidateKind::Class, "32-bit integer"),
    entry("int64", CandidateKind::Class, "64-bit integer"),
    entry("int128", CandidateKind::Class, "128-bit integer"),
    entry("float", CandidateKind::Class, "Float type"),
    entry("float8", CandidateKind::Class, "8-bit float"),
    entry("float16", CandidateKind::Class, "16-bit float"),
    entry("float32", CandidateKind::Class, "32-bit float"),
    entry("float64", CandidateKind::Class, "64-bit float"),
    entry("float128", CandidateKind::Class, "128-bit float"),
    entry("bool", CandidateKind::Class, "Boolean type"),
    entry("char", CandidateKind::Class, "Character type"),
    entry("nil", CandidateKind::Class, "Nil type"),
    entry("sym", CandidateKind::Class, "Symbol type"),
    entry("arr", CandidateKind::Class, "Array type"),
    entry("array", CandidateKind::Class, "Array type"),
    entry("map", CandidateKind::Class, "Map/Hash type"),
    entry("range", CandidateKind::Class, "Range type"),
    entry("tuple", CandidateKind::Class, "Tuple type"),
    entry("para", CandidateKind::Class, "Parameter type"),
];

pub const BUILTINS: &[CompletionEntry] = &[
    entry("echo", CandidateKind::Function, "Print to stdout"),
    entry("eecho", CandidateKind::Function, "Print to stderr"),
    entry("e!", CandidateKind::Function, "Print to stdout (short)"),
    entry("ee!", CandidateKind::Function, "Print to stderr (short)"),
    entry("abort", CandidateKind::Function, "Abort execution"),
    entry("exit", CandidateKind::Function, "Exit program"),
    entry("gets", CandidateKind::Function, "Get input"),
    entry("read_line", CandidateKind::Function, "Read line from input"),
    entry("sleep", CandidateKind::Function, "Sleep for duration"),
    entry("spawn", CandidateKind::Function, "Spawn fiber/thread"),
    entry("thread", CandidateKind::Function, "Create thread"),
    entry("channel", CandidateKind::Function, "Create channel"),
    entry("fiber", CandidateKind::Function, "Create fiber"),
    entry("raise", CandidateKind::Function, "Raise exception"),
    entry("rand", CandidateKind::Function, "Random number"),
    entry("sprintf", CandidateKind::Function, "Format string"),
    entry("system", CandidateKind::Function, "Execute system command"),
    entry("typeof", CandidateKind::Function, "Get type of value"),
];

pub const CONSTANTS: &[CompletionEntry] = &[
    entry("true", CandidateKind::Constant, "Boolean true"),
    entry("false", CandidateKind::Constant, "Boolean false"),
    entry("nil", CandidateKind::Constant, "Nil value"),
    entry("null", CandidateKind::Constant, "Null value"),
    entry("self", CandidateKind::Constant, "Current instance"),
    entry("__FILE__", CandidateKind::Constant, "Current file path"),
    entry("__DIR__", CandidateKind::Constant, "Current directory"),
    entry("__LINE__", CandidateKind::Constant, "Current line number"),
    entry("__END_LINE__", CandidateKind::Constant, "End line number"),
];

pub const SPECIAL_METHODS: &[CompletionEntry] = &[
    entry("getter", CandidateKind::Method, "Define getter method"),
    entry("setter", CandidateKind::Method, "Define setter method"),
    entry("property", CandidateKind::Method, "Define property"),
    snippet("bag", CandidateKind::Method, "Create bag type", "bag($0)"),
    snippet("para", CandidateKind::Method, "Define parameter", "para($0)"),
];

/// A completion suggestion, either from a static table or from the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub label: Cow<'static, str>,
    pub kind: CandidateKind,
    pub detail: Option<Cow<'static, str>>,
    pub snippet: Option<&'static str>,
}

impl From<&CompletionEntry> for Candidate {
    fn from(entry: &CompletionEntry) -> Self {
        Self {
            label: Cow::Borrowed(entry.label),
            kind: entry.kind,
            detail: Some(Cow::Borrowed(entry.detail)),
            snippet: entry.snippet,
        }
    }
}

/// `true` when the text before the cursor asks for a type name
/// (after `:` or `->`, possibly with a partial identifier).
pub fn wants_type_names(prefix: &str) -> bool {
    TYPE_CONTEXT.is_match(prefix)
}

/// Assembles every candidate for a cursor at `position` in `text`.
pub fn complete(text: &str, position: Position) -> Vec<Candidate> {
    let lines = split_lines(text);
    let prefix = lines
        .get(position.line as usize)
        .map(|line| &line[..byte_of_utf16(line, position.character)])
        .unwrap_or_default();

    let mut candidates: Vec<Candidate> = KEYWORDS
        .iter()
        .chain(BUILTINS)
        .chain(CONSTANTS)
        .chain(SPECIAL_METHODS)
        .map(Candidate::from)
        .collect();

    if wants_type_names(prefix) {
        candidates.extend(TYPES.iter().map(Candidate::from));
    }

    candidates.extend(collect_symbols(text).into_iter().map(|symbol| Candidate {
        label: Cow::Owned(symbol.name),
        kind: symbol.kind.into(),
        detail: symbol.detail.map(Cow::Owned),
        snippet: None,
    }));

    candidates
}
