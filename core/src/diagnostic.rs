use serde::Serialize;

use crate::position::Range;

/// Source tag attached to every diagnostic the engine produces.
pub const SOURCE: &str = "dragonstone";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Stable identifier for each kind of finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticCode {
    UnclosedString,
    TypeNameCase,
    MethodNameCase,
    ConstantNameCase,
    OrphanedTerminator,
    UnclosedBlock,
    StrayCommentClose,
    UnclosedComment,
    BracketImbalance,
}

impl DiagnosticCode {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::UnclosedString => "unclosed-string",
            DiagnosticCode::TypeNameCase => "type-name-case",
            DiagnosticCode::MethodNameCase => "method-name-case",
            DiagnosticCode::ConstantNameCase => "constant-name-case",
            DiagnosticCode::OrphanedTerminator => "orphaned-terminator",
            DiagnosticCode::UnclosedBlock => "unclosed-block",
            DiagnosticCode::StrayCommentClose => "stray-comment-close",
            DiagnosticCode::UnclosedComment => "unclosed-comment",
            DiagnosticCode::BracketImbalance => "bracket-imbalance",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub range: Range,
    pub message: String,
    pub code: DiagnosticCode,
    pub source: &'static str,
}

impl Diagnostic {
    pub fn error(code: DiagnosticCode, range: Range, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            range,
            message: message.into(),
            code,
            source: SOURCE,
        }
    }

    pub fn warning(code: DiagnosticCode, range: Range, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            range,
            message: message.into(),
            code,
            source: SOURCE,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
