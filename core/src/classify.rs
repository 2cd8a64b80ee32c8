//! Single-line construct classification.
//!
//! [`classify_line`] tries the construct patterns in a fixed priority order and
//! returns the first hit:
//!
//! 1. type definition (`class`, `cls`, `struct`, `record`, `anno`, `annotation`, `enum`)
//! 2. module (`module`, `mod`)
//! 3. method (`def`, `define`, optionally on a receiver)
//! 4. function (`fun`, `function`)
//! 5. constant (`NAME = ...`)
//! 6. variable (`con`, `let`, `var`, `fix`)
//!
//! The order is part of the contract: `def Point.new` is a method even though a
//! later pattern might also accept the line.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

static TYPE_DEF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:abstract\s+|abs\s+)?(class|cls|struct|record|annotation|anno|enum)\s+([A-Z]\w*)")
        .expect("type definition pattern")
});
static MODULE_DEF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(module|mod)\s+([A-Z]\w*)").expect("module definition pattern"));
static METHOD_DEF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:(?:public|private|protected|abstract|abs)\s+)?(define|def)\s+(?:(self|[A-Za-z_]\w*)\.)?([A-Za-z_]\w*[?!=]?)\s*(?:\(([^)]*)\))?",
    )
    .expect("method definition pattern")
});
static FUNCTION_DEF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:(?:public|private|protected|abstract|abs)\s+)?(function|fun)\s+([a-z_]\w*[?!=]?)\s*(?:\(([^)]*)\))?",
    )
    .expect("function definition pattern")
});
static CONST_DEF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Z][A-Z_0-9]*)\s*=(?:[^=~>]|$)").expect("constant definition pattern"));
static VAR_DEF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(con|let|var|fix)\s+([a-z_]\w*)\s*(?::\s*([A-Z]\w*|str|int|bool|char|float|nil))?")
        .expect("variable definition pattern")
});

/// A recognised defining construct, borrowing from the classified line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct<'a> {
    TypeDef {
        keyword: &'a str,
        name: &'a str,
    },
    ModuleDef {
        keyword: &'a str,
        name: &'a str,
    },
    MethodDef {
        keyword: &'a str,
        receiver: Option<&'a str>,
        name: &'a str,
        params: Option<&'a str>,
    },
    FunctionDef {
        keyword: &'a str,
        name: &'a str,
        params: Option<&'a str>,
    },
    ConstDef {
        name: &'a str,
    },
    VarDef {
        keyword: &'a str,
        name: &'a str,
        type_annotation: Option<&'a str>,
    },
}

impl<'a> Construct<'a> {
    /// Name as it appears in outlines and lookups; singleton methods carry their
    /// receiver (`self.build`).
    pub fn symbol_name(&self) -> Cow<'a, str> {
        match *self {
            Construct::MethodDef {
                receiver: Some(receiver),
                name,
                ..
            } => Cow::Owned(format!("{receiver}.{name}")),
            Construct::TypeDef { name, .. }
            | Construct::ModuleDef { name, .. }
            | Construct::MethodDef { name, .. }
            | Construct::FunctionDef { name, .. }
            | Construct::ConstDef { name }
            | Construct::VarDef { name, .. } => Cow::Borrowed(name),
        }
    }

    /// Human-readable one-liner used for outline details and hovers.
    pub fn detail(&self) -> String {
        let name = self.symbol_name();
        match *self {
            Construct::TypeDef { keyword, .. } => format!("{keyword} {name}"),
            Construct::ModuleDef { .. } => format!("module {name}"),
            Construct::MethodDef { receiver, params, .. } => {
                let flavour = if receiver.is_some() { "singleton method" } else { "method" };
                match non_empty(params) {
                    Some(params) => format!("{flavour} {name}({params})"),
                    None => format!("{flavour} {name}"),
                }
            }
            Construct::FunctionDef { params, .. } => match non_empty(params) {
                Some(params) => format!("fun {name}({params})"),
                None => format!("fun {name}"),
            },
            Construct::ConstDef { .. } => format!("constant {name}"),
            Construct::VarDef {
                keyword,
                type_annotation,
                ..
            } => match type_annotation {
                Some(ty) => format!("{keyword} {name}: {ty}"),
                None => format!("{keyword} {name}"),
            },
        }
    }
}

fn non_empty(params: Option<&str>) -> Option<&str> {
    params.filter(|p| !p.is_empty())
}

/// Classifies one source line. Returns `None` when no construct pattern matches.
pub fn classify_line(line: &str) -> Option<Construct<'_>> {
    if let Some(caps) = TYPE_DEF.captures(line) {
        return Some(Construct::TypeDef {
            keyword: caps.get(1)?.as_str(),
            name: caps.get(2)?.as_str(),
        });
    }
    if let Some(caps) = MODULE_DEF.captures(line) {
        return Some(Construct::ModuleDef {
            keyword: caps.get(1)?.as_str(),
            name: caps.get(2)?.as_str(),
        });
    }
    if let Some(caps) = METHOD_DEF.captures(line) {
        return Some(Construct::MethodDef {
            keyword: caps.get(1)?.as_str(),
            receiver: caps.get(2).map(|m| m.as_str()),
            name: caps.get(3)?.as_str(),
            params: caps.get(4).map(|m| m.as_str()),
        });
    }
    if let Some(caps) = FUNCTION_DEF.captures(line) {
        return Some(Construct::FunctionDef {
            keyword: caps.get(1)?.as_str(),
            name: caps.get(2)?.as_str(),
            params: caps.get(3).map(|m| m.as_str()),
        });
    }
    if let Some(caps) = CONST_DEF.captures(line) {
        return Some(Construct::ConstDef {
            name: caps.get(1)?.as_str(),
        });
    }
    if let Some(caps) = VAR_DEF.captures(line) {
        return Some(Construct::VarDef {
            keyword: caps.get(1)?.as_str(),
            name: caps.get(2)?.as_str(),
            type_annotation: caps.get(3).map(|m| m.as_str()),
        });
    }
    None
}
